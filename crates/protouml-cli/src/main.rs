//! Protouml CLI - Draw UML class diagrams from compiled protobuf schemas

mod cli;

use clap::Parser;
use protouml::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Environment variables take precedence over the CLI flags
    let level = std::env::var("PROTOUML_LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| cli_args.log_level.as_str().to_string());
    let format = std::env::var("PROTOUML_LOG_FORMAT")
        .ok()
        .unwrap_or_else(|| cli_args.log_format.as_str().to_string());

    if let Err(e) = init_logging(Some(level.as_str()), Some(format.as_str())) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::ProtoumlApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
