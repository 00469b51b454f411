mod logging;

use anyhow::Context;
use clap::Parser;
use fanflux_database::basic_db::{InnerDatabase, SafeDatabase};
use fanflux_net::{build_server, ServerConfig};
use fanflux_service::Fanflux;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();
    logging::init_logging(&config)?;

    let database = InnerDatabase::new(&config.db_path)
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;
    let store = Fanflux::new(database);

    if config.seed {
        store.initialize_mock_data().context("failed to seed demo data")?;
    }

    tracing::info!(db = %config.db_path.display(), "starting fanflux");
    build_server(store, &config).await.context("server error")?;

    Ok(())
}
