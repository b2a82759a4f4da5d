use std::path::Path;
use std::process::ExitCode;

use stayscout::config::AppConfig;
use stayscout::{PipelineResult, logging, pipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: stayscout <preferences_file>");
        return ExitCode::FAILURE;
    }

    let dotenv = dotenvy::dotenv();

    let config = AppConfig::load();
    let logging_config = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if let Err(e) = logging::init(&logging_config) {
        eprintln!("{e:#}");
    }

    // a missing .env is fine, an unreadable one is not
    if let Err(e) = dotenv
        && !e.not_found()
    {
        tracing::warn!("Failed to load .env file: {}", e);
    }

    let result = match config {
        Ok(config) => pipeline::run(&config, Path::new(&args[1])).await,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            PipelineResult::error(format!("{e:#}"))
        }
    };

    println!("{}", result.to_pretty_json());
    ExitCode::SUCCESS
}
