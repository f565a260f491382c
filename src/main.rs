//! Agent Stack command line entry point
//!
//! Answers one message with a saved stack (or the built-in default) and
//! prints the response as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use agent_stack::utils::logging;
use agent_stack::{load_config, ChatRequest, ChatService, Dispatcher, ErrorResponse, LogFormat};
use agent_stack_core::{JsonDirStore, RawTurn};

/// Run a chat message through an agent stack.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The message to answer
    message: String,

    /// Saved stack to use. Omit for the built-in default stack
    #[arg(short, long)]
    stack: Option<String>,

    /// Session whose stored history is sent along
    #[arg(long)]
    session: Option<String>,

    /// JSON file with prior turns, used instead of the session history
    #[arg(long)]
    history: Option<PathBuf>,

    /// Store directory holding `stacks/` and `sessions/`
    #[arg(short, long, env = "AGENT_STACK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file with credentials and defaults
    #[arg(short, long, env = "AGENT_STACK_CONFIG")]
    config: Option<PathBuf>,

    /// Leave the execution trace out of the output
    #[arg(long, action)]
    no_trace: bool,

    /// Emit logs as JSON lines
    #[arg(long, action)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("loading configuration")?;
    if args.json_logs {
        config.log_format = LogFormat::Json;
    }
    logging::init(config.log_format, &config.log_level)?;

    let history = match &args.history {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading history file {}", path.display()))?;
            let turns: Vec<RawTurn> = serde_json::from_str(&text)
                .with_context(|| format!("parsing history file {}", path.display()))?;
            Some(turns)
        }
        None => None,
    };

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("data"));
    tracing::debug!("Using store at {}", data_dir.display());
    let store = Arc::new(JsonDirStore::new(data_dir));

    let dispatcher = Dispatcher::new(config.provider_defaults(), config.tool_defaults());
    let service = ChatService::new(dispatcher, store.clone())
        .with_histories(store)
        .with_trace(config.include_trace && !args.no_trace);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    let request = ChatRequest {
        stack_id: args.stack,
        session_id: args.session,
        message: args.message,
        history,
    };

    match service.handle_with_cancel(&request, &cancel).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&err))?);
            std::process::exit(1);
        }
    }
}
