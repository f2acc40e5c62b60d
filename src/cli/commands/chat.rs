//! Interactive document session.

use std::io::Write;
use std::path::{Path, PathBuf};

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use lexdraft::artifact::write_artifact;
use lexdraft::session::Role;
use lexdraft::{AgentResult, Config, Dispatcher, DocumentSession, RequestKind, TextExtractor};

use crate::cli::helpers::{build_dispatcher, build_extractor, document_id, load_text, spinner};

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Question(&'a str),
    Use(&'a str),
    Load(&'a str),
    Run(&'a str),
    Docs,
    Clear,
    New,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Question(line);
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match (name, arg) {
        ("use", id) if !id.is_empty() => Input::Use(id),
        ("load", path) if !path.is_empty() => Input::Load(path),
        ("run", kind) if !kind.is_empty() => Input::Run(kind),
        ("docs", _) => Input::Docs,
        ("clear", _) => Input::Clear,
        ("new", _) => Input::New,
        ("help", _) => Input::Help,
        ("quit" | "exit", _) => Input::Quit,
        _ => Input::Unknown(line),
    }
}

struct ChatState<'a> {
    config: &'a Config,
    extractor: std::sync::Arc<TextExtractor>,
    dispatcher: Dispatcher,
    session: DocumentSession,
}

impl ChatState<'_> {
    async fn load(&mut self, path: &Path) {
        let id = document_id(path);
        match load_text(&self.extractor, path, false).await {
            Ok(text) => {
                println!(
                    "{} Loaded {} ({} characters)",
                    style("✓").green(),
                    id,
                    text.chars().count()
                );
                self.session.insert(id, text);
            }
            Err(e) => eprintln!("{} {}: {}", style("✗").red(), id, e),
        }
    }

    async fn ask(&mut self, question: &str) -> anyhow::Result<()> {
        let text = self.session.current_text()?.to_string();
        self.session.push_message(Role::User, question);

        let pb = spinner("Thinking")?;
        let result = self.dispatcher.run(&text, RequestKind::Chat, Some(question)).await;
        pb.finish_and_clear();

        match result {
            AgentResult::Success(answer) => {
                println!("{}\n", answer);
                self.session.push_message(Role::Assistant, answer);
            }
            AgentResult::Failure(message) => eprintln!("{} {}", style("✗").red(), message),
        }
        Ok(())
    }

    async fn run_request(&mut self, kind: &str) -> anyhow::Result<()> {
        let kind: RequestKind = kind.parse()?;
        let doc_name = self
            .session
            .current()
            .map(str::to_string)
            .ok_or(lexdraft::SessionError::NoCurrentDocument)?;
        let text = self.session.current_text()?.to_string();

        let pb = spinner(format!("{} for {}", kind.display_name(), doc_name))?;
        let result = self.dispatcher.run(&text, kind, None).await;
        pb.finish_and_clear();

        match result {
            AgentResult::Success(output) => {
                println!("{}\n", output);
                let path = write_artifact(&self.config.output.dir, kind, &doc_name, &output)?;
                println!("{} Saved {}", style("✓").green(), path.display());
            }
            AgentResult::Failure(message) => eprintln!("{} {}", style("✗").red(), message),
        }
        Ok(())
    }

    fn list_documents(&self) {
        let ids = self.session.document_ids();
        if ids.is_empty() {
            println!("{}", style("No documents loaded").dim());
        }
        for id in ids {
            let marker = if self.session.current() == Some(id) {
                style("→").green()
            } else {
                style(" ").dim()
            };
            println!("  {} {}", marker, id);
        }
    }

    /// Handle one line. Returns false when the session should end.
    async fn handle(&mut self, line: &str) -> anyhow::Result<bool> {
        match parse_input(line) {
            Input::Empty => {}
            Input::Question(q) => self.ask(q).await?,
            Input::Use(id) => {
                self.session.select(id)?;
                println!("{} Using {}", style("→").green(), id);
            }
            Input::Load(path) => self.load(&PathBuf::from(path)).await,
            Input::Run(kind) => self.run_request(kind).await?,
            Input::Docs => self.list_documents(),
            Input::Clear => {
                self.session.clear_chat();
                println!("{}", style("Chat history cleared").dim());
            }
            Input::New => {
                self.session.reset();
                println!("{}", style("New session; /load a document to continue").dim());
            }
            Input::Help => print_help(),
            Input::Quit => return Ok(false),
            Input::Unknown(cmd) => {
                eprintln!("{} Unknown command: {} (try /help)", style("!").yellow(), cmd)
            }
        }
        Ok(true)
    }
}

fn print_help() {
    println!("{}", style("Commands:").cyan());
    println!("  {:<18} {}", "<question>", "ask about the current document");
    println!("  {:<18} {}", "/use <id>", "switch the current document");
    println!("  {:<18} {}", "/load <pdf>", "extract and add a document");
    println!("  {:<18} {}", "/run <kind>", "draft from the current document");
    println!("  {:<18} {}", "/docs", "list loaded documents");
    println!("  {:<18} {}", "/clear", "forget the chat history");
    println!("  {:<18} {}", "/new", "drop all documents and history");
    println!("  {:<18} {}", "/quit", "leave");
}

pub async fn cmd_chat(config: &Config, pdfs: &[PathBuf]) -> anyhow::Result<()> {
    let mut state = ChatState {
        config,
        extractor: build_extractor(config),
        dispatcher: build_dispatcher(config)?,
        session: DocumentSession::new(),
    };

    for pdf in pdfs {
        state.load(pdf).await;
    }
    state.list_documents();
    println!("{}", style("Type a question, or /help for commands").dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").cyan());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match state.handle(&line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{} {}", style("✗").red(), e),
        }
    }
    Ok(())
}
