//! CLI binary for docchat.
//!
//! Loads one document, then answers questions about it until `exit`,
//! `quit` or end of input.

use anyhow::{Context, Result};
use clap::Parser;
use docchat::{ChatConfig, DocChat, DocumentLoader, LlmClient, Settings};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Chat with a PDF
  docchat --doc report.pdf

  # Any supported format
  docchat -d notes.md

ENVIRONMENT VARIABLES (a .env file in the working directory is honoured):
  OPENROUTER_API_KEY   API key (required)
  OPENROUTER_MODEL     Model ID (default: mistralai/mistral-7b-instruct)
  OPENROUTER_API_BASE  Endpoint base URL (default: https://openrouter.ai/api/v1)
  SITE_URL             Sent as HTTP-Referer (default: http://localhost)
  SITE_NAME            Sent as X-Title (default: OpenRouterDocChat)
  RUST_LOG             Log filter (default: warn)
"#;

/// Ask questions about a document using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "docchat",
    version,
    about = "Ask questions about a PDF, text, DOCX or Markdown document using an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the document (.pdf, .txt, .docx, .md, .markdown).
    #[arg(short, long)]
    doc: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let loader = DocumentLoader::new();
    let doc = match tokio::task::block_in_place(|| loader.load(&cli.doc)) {
        Ok(doc) => doc,
        Err(e) => {
            println!("Error loading document: {e}");
            return Ok(());
        }
    };

    let settings = Settings::from_env();
    let config = ChatConfig::default();
    let client = LlmClient::from_settings(&settings, &config).context("Failed to configure LLM client")?;
    let chat = DocChat::new(client, config);

    println!("Document loaded successfully!");
    println!("File type: {}", doc.format);
    println!("Supported formats: {}", loader.supported_extensions().join(", "));
    println!("Text length: {} characters", doc.char_len());
    println!("You can now ask questions. Type 'exit' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nQuestion> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let spinner = thinking_spinner();
        let result = chat.ask_with_doc(&doc.text, question).await;
        spinner.finish_and_clear();

        match result {
            Ok(answer) => println!("\nAnswer:\n{answer}"),
            Err(e) => println!("LLM error: {e}"),
        }
    }

    Ok(())
}

fn thinking_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message("Thinking…");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
