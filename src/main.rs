use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wolt_history::application::pipeline;
use wolt_history::config::AppConfig;
use wolt_history::infrastructure::wolt_client::WoltClient;

/// Extract the bearer token, the program's only argument
///
/// Returns the usage line when the argument count is wrong.
fn token_from_args(args: &[String]) -> Result<&str, String> {
    match args {
        [_, token] => Ok(token.as_str()),
        _ => {
            let program = args.first().map(String::as_str).unwrap_or("wolt-history");
            Err(format!("usage: {} <TOKEN>", program))
        }
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let token = match token_from_args(&args) {
        Ok(token) => token,
        Err(usage) => {
            println!("{}", usage);
            std::process::exit(1);
        }
    };

    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wolt_history=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    let client = match WoltClient::from_config(&config, token) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Wolt client: {}", e);
            std::process::exit(1);
        }
    };

    match pipeline::run(&config, &client, Utc::now().date_naive()).await {
        Ok(summary) => info!(
            "✓ Report ready at {} ({} orders, {} venues)",
            config.report_path.display(),
            summary.orders,
            summary.venues
        ),
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
