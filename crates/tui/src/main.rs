mod app;
mod config;
mod error;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // Logging goes to stderr so the alternate screen stays clean; off by
    // default, enabled through config or --log-level.
    if let Some(level) = config.log_level.as_deref() {
        tracing_subscriber::fmt()
            .with_env_filter(format!("taskdeck_tui={level},client={level}"))
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
