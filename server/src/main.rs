use env_logger::Env;
use log::error;

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;

    if let Err(e) = server::run(config).await {
        error!("server failed: {e}");
        return Err(e.into());
    }

    Ok(())
}
