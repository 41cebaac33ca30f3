mod command;
mod post_list;
mod terminal;

pub use command::{parse_command, UiEvent, HELP};
pub use terminal::Terminal;

use async_trait::async_trait;

use crate::state::AppState;

/// The user-facing side of the app: input, dialogs and the post listing.
#[async_trait]
pub trait Frontend: Send {
    /// Next line of user input, `None` once input is closed.
    async fn next_input(&mut self) -> std::io::Result<Option<String>>;

    /// Yes/no question. Anything but an explicit yes is a no.
    async fn confirm(&mut self, message: &str) -> bool;

    fn alert(&mut self, message: &str);

    fn show_status(&mut self, message: &str);

    fn render(&mut self, state: &AppState);
}
