//! tmdl-er - ER diagrams and documentation requests from Power BI semantic models

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tmdl_er_sdk::SdkConfig;
use tmdl_er_sdk::cli::commands::decode::handle_decode;
use tmdl_er_sdk::cli::commands::diagram::{DiagramArgs, handle_diagram};
use tmdl_er_sdk::cli::commands::prompt::{PromptArgs, handle_prompt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tmdl-er")]
#[command(author, version, about = "ER diagrams and documentation requests from TMDL semantic models", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tables and relationships and write a Graphviz ER diagram
    Diagram {
        /// TMDL files or semantic model directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output DOT file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a captured streaming completion response
    Decode {
        /// Capture file, or - for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Print the documentation request body for a report
    Prompt {
        /// Project directories or files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Additional context for the documentation
        #[arg(long)]
        context: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tmdl_er_sdk=info,tmdl_er=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SdkConfig::from_file(path)?,
        None => SdkConfig::default(),
    };

    match cli.command {
        Commands::Diagram { paths, output } => {
            handle_diagram(&DiagramArgs { paths, output }, &config)?;
        }
        Commands::Decode { input } => {
            handle_decode(&input, &config.stream)?;
        }
        Commands::Prompt { paths, context } => {
            handle_prompt(&PromptArgs { paths, context }, &config)?;
        }
    }

    Ok(())
}
