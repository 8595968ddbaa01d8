//! Payroll engine HTTP server.
//!
//! Loads one tenant from `NOMINA_CONFIG_DIR` (default `./config/colombia`)
//! into an in-memory store and serves the API on `NOMINA_BIND_ADDR`
//! (default `0.0.0.0:3000`).

use nomina_engine::api::{AppState, create_router};
use nomina_engine::config::ConfigLoader;
use nomina_engine::logging;
use nomina_engine::store::MemoryStore;
use tracing::info;

const DEFAULT_CONFIG_DIR: &str = "./config/colombia";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config_dir =
        std::env::var("NOMINA_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr =
        std::env::var("NOMINA_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let seed = ConfigLoader::load(&config_dir)?.into_seed();
    let tenant_id = seed.tenant_id;
    let store = MemoryStore::new();
    store.seed(seed).await?;

    let app = create_router(AppState::from_store(store));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, tenant_id = %tenant_id, config_dir = %config_dir, "Payroll engine listening");
    axum::serve(listener, app).await?;
    Ok(())
}
