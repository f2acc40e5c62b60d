//! Tool availability and configuration check command.

use console::style;

use lexdraft::llm::LlmClient;
use lexdraft::ocr::check_tools;
use lexdraft::Config;

use crate::cli::helpers::build_extractor;

pub async fn cmd_check(config: &Config, ping: bool) -> anyhow::Result<()> {
    println!("\n{}", style("Tool Status").bold());
    println!("{}", "-".repeat(50));

    let mut all_found = true;
    for (tool, available) in check_tools() {
        let status = if available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    let extractor = build_extractor(config);
    let ocr = extractor.ocr_backend();
    if !ocr.is_available() {
        println!("                  {}", style(ocr.availability_hint()).dim());
    }

    println!("\n{}", style("Configuration:").cyan());
    match &config.source_path {
        Some(path) => println!("  {:<15} {}", "file", path.display()),
        None => println!("  {:<15} {}", "file", style("none (defaults)").dim()),
    }
    println!("  {:<15} {}", "ocr language", config.ocr.language);
    println!("  {:<15} {}", "render dpi", config.ocr.render_dpi);
    if let Some(dir) = &config.ocr.tessdata_dir {
        println!("  {:<15} {}", "tessdata", dir.display());
    }
    println!("  {:<15} {}", "chunk size", config.dispatch.chunk_size);
    if !config.dispatch.prompts.is_empty() {
        let mut names: Vec<&str> = config.dispatch.prompts.keys().map(String::as_str).collect();
        names.sort_unstable();
        println!("  {:<15} {}", "prompt overrides", names.join(", "));
    }
    println!("  {:<15} {}", "output dir", config.output.dir.display());

    println!("\n{}", style("LLM:").cyan());
    println!("  {:<15} {}", "provider", config.llm.provider.as_str());
    println!("  {:<15} {}", "endpoint", config.llm.endpoint);
    println!("  {:<15} {}", "model", config.llm.model);
    let key_status = if config.llm.has_credentials() {
        style("✓ configured").green()
    } else {
        style("✗ missing").red()
    };
    println!("  {:<15} {}", "credentials", key_status);
    if !config.llm.enabled {
        println!("  {}", style("LLM calls are disabled (llm.enabled = false)").yellow());
    }

    if ping {
        let client = LlmClient::new(config.llm.clone())?;
        let status = if client.is_available().await {
            style("✓ reachable").green()
        } else {
            style("✗ unreachable").red()
        };
        println!("  {:<15} {}", "endpoint", status);
    }

    println!();
    if all_found {
        println!("{} Extraction tools are available", style("✓").green());
    } else {
        println!(
            "{} Some tools are missing. Install them for full extraction support:",
            style("!").yellow()
        );
        println!("  - pdftotext, pdftoppm, pdfinfo: poppler-utils package");
        println!("  - tesseract: tesseract-ocr package (plus the srp language data)");
    }

    Ok(())
}
