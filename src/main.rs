use clap::Parser;
use invoice_pay::app::build_state;
use invoice_pay::app::config::Config;
use invoice_pay::app::logging::init_logging;
use invoice_pay::interfaces::http::build_router;
use miette::{IntoDiagnostic, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.verbose);

    let state = build_state(&config).into_diagnostic()?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .into_diagnostic()?;
    info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
