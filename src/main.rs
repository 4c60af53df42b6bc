mod account;
mod api;
mod config;
mod conversations;
mod error;
mod history;
mod models;
mod records;
mod report;
mod summary;
mod time;

use api::elevenlabs::ElevenLabsClient;
use clap::Parser;
use config::{Cli, Config, API_KEY_VAR};
use error::ReportError;
use report::{build_report, summary_block, write_report};
use time::format_timestamp;
use tracing::info;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the summary and the JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if let ReportError::MissingCredential { .. } = e {
            eprintln!(
                "Please set your API key: export {}='your-api-key-here'",
                API_KEY_VAR
            );
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ReportError> {
    let config = Config::from_env(cli)?;

    println!(
        "Analyzing ElevenLabs usage from {} to {}",
        format_timestamp(config.window.start_ms),
        format_timestamp(config.window.end_ms)
    );
    println!("Using API key: {}", config.masked_key());
    println!(
        "Output will be saved to: {}",
        config.auto_output_path().display()
    );
    println!();

    let client = ElevenLabsClient::new(&config.api_key, &config.base_url)?;
    info!(base_url = %config.base_url, "Connected to ElevenLabs API");

    let report = build_report(&client, &config).await;
    println!("\n{}", summary_block(&report.summary));

    let json = report.to_json(config.pretty)?;
    let paths = write_report(&config, &json)?;

    println!();
    for (i, path) in paths.iter().enumerate() {
        if i == 0 {
            println!("Results automatically saved to {}", path.display());
        } else {
            println!("Results also saved to {}", path.display());
        }
    }

    println!("\n{}", "=".repeat(80));
    println!("{}", json);
    Ok(())
}
