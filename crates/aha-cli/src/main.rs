//! aha-mcp - MCP server and command-line client for Aha!.

use std::sync::Arc;

use aha_api::AhaClient;
use aha_core::{AhaConfig, DEFAULT_SEARCHABLE_TYPE};
use aha_mcp::{tools, McpServer, ToolHandler};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aha-mcp")]
#[command(author, version, about = "MCP server for Aha! records, pages and features", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdin/stdout (default)
    Serve,

    /// Fetch a feature or requirement by reference number
    Record {
        /// Reference number (e.g., DEVELOP-123 or ADT-123-1)
        reference: String,
    },

    /// Fetch a note page by reference number
    Page {
        /// Reference number (e.g., ABC-N-213)
        reference: String,

        /// Include the parent page
        #[arg(long)]
        include_parent: bool,
    },

    /// Search documents
    Search {
        /// Search query
        query: String,

        /// Document type to search for
        #[arg(short = 't', long = "type", default_value = DEFAULT_SEARCHABLE_TYPE)]
        searchable_type: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries protocol traffic, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AhaConfig::from_env().inspect_err(|e| tracing::error!("{}", e))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let client = AhaClient::new(&config)?;
            tracing::info!("Starting MCP server for {}", config.endpoint());

            let mut server = McpServer::new(Arc::new(client));
            server.run().await?;

            // The stdin reader runs on a blocking thread that cannot be
            // cancelled, so leave without waiting for runtime shutdown.
            std::process::exit(0);
        }
        Commands::Record { reference } => {
            run_tool(&config, tools::GET_RECORD, json!({ "reference": reference })).await?;
        }
        Commands::Page {
            reference,
            include_parent,
        } => {
            run_tool(
                &config,
                tools::GET_PAGE,
                json!({ "reference": reference, "includeParent": include_parent }),
            )
            .await?;
        }
        Commands::Search {
            query,
            searchable_type,
        } => {
            run_tool(
                &config,
                tools::SEARCH_DOCUMENTS,
                json!({ "query": query, "searchableType": searchable_type }),
            )
            .await?;
        }
        Commands::Config {
            command: ConfigCommands::Show,
        } => {
            println!("Domain:   {}", config.domain);
            println!("Endpoint: {}", config.endpoint());
            println!("Token:    {}", config.redacted_token());
        }
    }

    Ok(())
}

/// Run a single tool call and print its text to stdout.
async fn run_tool(config: &AhaConfig, name: &str, arguments: Value) -> anyhow::Result<()> {
    let client = AhaClient::new(config)?;
    let handler = ToolHandler::new(Arc::new(client));

    let result = handler.execute(name, Some(arguments)).await?;
    if let Some(text) = result.first_text() {
        println!("{}", text);
    }
    Ok(())
}
