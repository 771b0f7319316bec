use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use climascope::cli::{Cli, Command};
use climascope::presentation::{ErrorView, LookupView};
use climascope::{ClimascopeConfig, LiveOrchestrator, logging, web};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = ClimascopeConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Lookup { query, json } => {
            let orchestrator = LiveOrchestrator::from_config(&config)?;
            let input = Command::query_text(&query);

            match orchestrator.lookup(&input).await {
                Ok(result) => {
                    let view = LookupView::from_result(&result);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    } else {
                        println!("{view}");
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!("Lookup failed: {}", e);
                    let view = ErrorView::from_error(&e);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    } else {
                        eprintln!("{view}");
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            info!("Starting climascope {} on port {}", climascope::VERSION, port);
            web::run(&config, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
