use anyhow::{Context, Result};
use vexconsole::app::{plain_transcript, App};
use vexconsole::config::Config;
use vexconsole::{logging, terminal};

const PLAIN_WIDTH: usize = 100;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    config.validate()?;
    logging::init();

    if !terminal::is_interactive() {
        tracing::info!("stdout is not a terminal; printing transcript");
        print!("{}", plain_transcript(&config, PLAIN_WIDTH));
        return Ok(());
    }

    let mut app = App::new(config);
    app.run().await?;

    Ok(())
}
