//! Single request command.

use std::path::{Path, PathBuf};

use console::style;

use lexdraft::artifact::write_artifact;
use lexdraft::{AgentResult, Config, RequestKind};

use crate::cli::helpers::{build_dispatcher, build_extractor, document_id, load_text, spinner};

pub async fn cmd_run(
    config: &Config,
    kind: &str,
    input: &Path,
    as_text: bool,
    question: Option<&str>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    // Reject unknown kinds before touching the document
    let kind: RequestKind = kind.parse()?;
    if kind.is_chat() && question.is_none() {
        eprintln!("{} chat without --question sends an empty question", style("!").yellow());
    }

    let extractor = build_extractor(config);
    let dispatcher = build_dispatcher(config)?;

    let doc_name = document_id(input);
    let text = load_text(&extractor, input, as_text).await?;

    let pb = spinner(format!("{} for {}", kind.display_name(), doc_name))?;
    let result = dispatcher.run(&text, kind, question).await;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    match result {
        AgentResult::Success(output) => {
            if !json {
                println!("{}", output);
            }
            let dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
            let path = write_artifact(&dir, kind, &doc_name, &output)?;
            eprintln!("{} Saved {}", style("✓").green(), path.display());
            Ok(())
        }
        AgentResult::Failure(message) => {
            if !json {
                eprintln!("{} {}", style("✗").red(), message);
            }
            std::process::exit(1);
        }
    }
}
