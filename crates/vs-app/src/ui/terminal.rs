use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::state::AppState;
use crate::ui::post_list::render_state;
use crate::ui::Frontend;

/// Line-oriented front-end on stdin/stdout.
pub struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl Frontend for Terminal {
    async fn next_input(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }

    async fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        let _ = std::io::stdout().flush();

        match self.lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }

    fn alert(&mut self, message: &str) {
        println!("{message}");
    }

    fn show_status(&mut self, message: &str) {
        println!("  … {message}");
    }

    fn render(&mut self, state: &AppState) {
        println!("{}", render_state(state));
    }
}
