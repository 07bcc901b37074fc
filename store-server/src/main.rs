use store_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("Store server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. State (database pool + migrations)
    let state = ServerState::initialize(&config)
        .await
        .map_err(|e| anyhow::anyhow!("initialization failed: {e}"))?;

    // 4. HTTP server
    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(anyhow::anyhow!("server error: {e}"));
    }

    Ok(())
}
