mod app;
mod config;
mod error;
mod events;
mod generator;
mod state;
mod ui;

#[cfg(test)]
mod testing;

use crate::app::App;
use crate::config::AppConfig;
use crate::generator::Generator;
use crate::ui::Terminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the terminal front-end
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = AppConfig::load()?;
    let generator = Generator::new(&config)?;

    let app = App::new(generator, Box::new(Terminal::new()));
    app.run().await
}
