use conveyor::{ConveyorConfig, convert_lines, logging, user_agent};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match ConveyorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("conveyor: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.logging);
    tracing::info!("Starting {}", user_agent());
    if let Some(interval) = config.schedule.packages_interval() {
        tracing::debug!("Package sync interval: {:?}", interval);
    }

    match convert_lines(io::stdin().lock(), io::stdout().lock(), &config.warehouse) {
        Ok(summary) => {
            tracing::info!(
                converted = summary.converted,
                failed = summary.failed,
                "Conversion finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Conversion aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
