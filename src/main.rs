use anyhow::Result;
use framer_alt_text::utils::logging;
use framer_alt_text::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // configuration
    let config = Config::load()?;

    // logging
    logging::init(config.verbose_logging);

    // run
    App::initialize(config).await?.run().await?;

    Ok(())
}
