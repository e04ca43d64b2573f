use std::sync::Arc;

use viewbridge_api::{init_tracing, setup, state::AppState};
use viewbridge_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    // Build shared state (queue, platform client, viewer client)
    let state = Arc::new(AppState::from_config(config.clone())?);

    // Start the server
    let router = setup::routes::setup_routes(&config, state.clone())?;
    setup::server::start_server(&config, router, state.queue.clone()).await?;

    Ok(())
}
