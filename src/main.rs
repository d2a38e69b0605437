use std::error::Error;
use std::io::Read;

use review_engine::budget::ApproxTokenCounter;
use review_engine::config::ReviewOptions;
use review_engine::{review_diff, telemetry};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Review prompt without hunks; only its size matters here.
const BASE_PROMPT: &str = "You are a code reviewer. For each <new_hunk> below, reply with JSON \
{\"reviews\":[{\"line_start\":int,\"line_end\":int,\"comment\":string,\"lgtm\":bool}]} \
using the line numbers shown in the new hunks.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Optional .env next to the binary.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::DEBUG))
        .with(telemetry::layer())
        .try_init()?;

    let opts = ReviewOptions::from_env()?;

    let diff = match std::env::var("REVIEW_DIFF_PATH") {
        Ok(path) => tokio::fs::read_to_string(&path).await?,
        Err(_) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let report = review_diff(&diff, &opts, &ApproxTokenCounter, BASE_PROMPT);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
