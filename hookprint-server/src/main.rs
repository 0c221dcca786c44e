use hookprint_server::{Config, Server, init_logger, print_banner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and config
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // 2. Logging
    init_logger(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;
    print_banner();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "🧾 Hookprint starting..."
    );

    // 3. Serve until ctrl-c
    let server = Server::new(config)?;
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
