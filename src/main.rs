use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use leadserver::config::AppConfig;
use leadserver::leads::run_migrations;
use leadserver::server::run_server;
use leadserver::shared::state::AppState;
use leadserver::shared::utils::create_conn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::load()?;
    let pool = create_conn(&config.database)?;
    run_migrations(&pool)?;
    info!("Database ready");

    let port = config.server.port;
    let state = Arc::new(AppState { conn: pool, config });

    run_server(state, port).await?;
    Ok(())
}
