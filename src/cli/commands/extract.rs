//! Text extraction command.

use std::path::{Path, PathBuf};

use console::style;

use lexdraft::Config;

use crate::cli::helpers::{build_extractor, load_text};

pub async fn cmd_extract(config: &Config, pdf: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let extractor = build_extractor(config);
    let text = load_text(&extractor, pdf, false).await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &text).await?;
            eprintln!(
                "{} Wrote {} characters to {}",
                style("✓").green(),
                text.chars().count(),
                path.display()
            );
        }
        None => println!("{}", text),
    }
    Ok(())
}
