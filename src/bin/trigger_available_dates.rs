//! Pokes the "update available dates" endpoint once and logs what it says.

use clap::Parser;
use invoice_pay::app::logging::init_logging;
use miette::{IntoDiagnostic, Result, miette};
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Endpoint to POST to
    #[arg(
        long,
        env = "UPDATE_AVAILABLE_DATES_URL",
        default_value = "http://localhost:3001/api/update-available-dates"
    )]
    url: String,

    /// Request timeout, in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()
        .into_diagnostic()?;

    let response = match client
        .post(&cli.url)
        .json(&serde_json::json!({}))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!(url = %cli.url, "Update request failed: {}", e);
            return Err(e).into_diagnostic();
        }
    };

    let status = response.status();
    let body = response.text().await.into_diagnostic()?;
    if !status.is_success() {
        error!(%status, %body, "Update rejected");
        return Err(miette!("update endpoint returned {status}"));
    }

    info!(%status, "Update result: {}", body);
    Ok(())
}
