//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod chat;
mod check;
mod extract;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lexdraft::Config;

#[derive(Parser)]
#[command(name = "lexdraft")]
#[command(about = "Draft legal documents from PDFs with OCR and a language model")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "LEXDRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the text of a PDF (embedded text, OCR for scanned pages)
    Extract {
        /// PDF file
        pdf: PathBuf,
        /// Write the text to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one drafting request over a document
    Run {
        /// Request kind: summary, appeal, review, lawsuit, lawsuit_response,
        /// contract_analysis or chat
        kind: String,
        /// PDF file (or plain text with --text)
        input: PathBuf,
        /// Treat the input as already-extracted plain text
        #[arg(long)]
        text: bool,
        /// Question for chat requests
        #[arg(short, long)]
        question: Option<String>,
        /// Artifact directory (default: output.dir from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: ask questions and run requests over loaded PDFs
    Chat {
        /// PDF files to load
        #[arg(required = true)]
        pdfs: Vec<PathBuf>,
    },

    /// Check external tools and show the effective configuration
    Check {
        /// Also contact the LLM endpoint
        #[arg(long)]
        ping: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Extract { pdf, output } => extract::cmd_extract(&config, &pdf, output).await,
        Commands::Run {
            kind,
            input,
            text,
            question,
            output_dir,
            json,
        } => {
            run::cmd_run(
                &config,
                &kind,
                &input,
                text,
                question.as_deref(),
                output_dir,
                json,
            )
            .await
        }
        Commands::Chat { pdfs } => chat::cmd_chat(&config, &pdfs).await,
        Commands::Check { ping } => check::cmd_check(&config, ping).await,
    }
}
