use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use tracing_subscriber::{self, filter::EnvFilter};

use abracadabra::{config::ServiceConfig, refactoring_service::RefactoringService};

/// Abracadabra MCP Server - JavaScript and TypeScript refactorings
#[derive(Parser, Debug)]
#[command(name = "abracadabra-mcp")]
#[command(about = "Model Context Protocol server for JavaScript/TypeScript refactorings")]
#[command(version)]
struct Args {
    /// Configuration file (YAML)
    #[arg(
        short = 'c',
        long = "config",
        help = "Configuration file (default: <config dir>/abracadabra/config.yaml when present)",
        value_name = "PATH"
    )]
    config: Option<PathBuf>,

    /// Language assumed when a request does not name one
    #[arg(
        long = "default-language",
        help = "Language assumed when a request does not name one (javascript, typescript, tsx)",
        value_name = "LANGUAGE"
    )]
    default_language: Option<String>,

    /// Name proposed for extracted variables
    #[arg(
        long = "variable-name",
        help = "Name proposed for extracted variables",
        value_name = "NAME"
    )]
    extracted_variable_name: Option<String>,

    /// Largest buffer accepted (in bytes)
    #[arg(
        long = "max-code-size",
        help = "Largest code buffer accepted, in bytes"
    )]
    max_code_size: Option<usize>,
}

#[tokio::main]
#[tracing::instrument]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the MCP transport, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting MCP server with args: {:?}", args);

    let config = create_config_from_args(args)?;
    tracing::debug!("Effective configuration: {:?}", config);

    let service = RefactoringService::with_config(config)?
        .serve(stdio())
        .await?;

    tracing::info!("Service started, waiting for connections");
    service.waiting().await?;
    Ok(())
}

/// Load the configuration file, then apply command line overrides
fn create_config_from_args(args: Args) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::load(args.config.as_deref())?;

    if let Some(language) = args.default_language {
        config.default_language = language;
    }
    if let Some(name) = args.extracted_variable_name {
        config.extracted_variable_name = name;
    }
    if let Some(size) = args.max_code_size {
        config.max_code_size = size;
    }

    Ok(config)
}
