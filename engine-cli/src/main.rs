//! Runs one prompt through an engine adapter and prints the result as JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cli_engine_copilot::{CopilotAdapter, CopilotConfig};
use cli_engine_core::{Engine, InvocationRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine to dispatch to
    #[arg(long, value_enum, default_value_t = EngineKind::Copilot)]
    engine: EngineKind,

    /// Prompt text; omit or pass `-` to read it from stdin
    prompt: Option<String>,

    /// Working directory for the engine (defaults to the current directory)
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Model override passed to the engine
    #[arg(long)]
    model: Option<String>,

    /// Path to the engine executable (skips discovery)
    #[arg(long)]
    bin: Option<PathBuf>,

    /// Wall-clock limit for the run
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    /// Log the diagnostic trace to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Extra arguments appended verbatim after `--`
    #[arg(last = true)]
    extra: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineKind {
    /// GitHub Copilot CLI
    Copilot,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // stdout carries only the JSON result
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let prompt = match cli.prompt.as_deref() {
        Some(p) if p != "-" => p.to_string(),
        _ => read_stdin().await?,
    };
    let work_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let mut request = InvocationRequest::new(prompt, work_dir).with_extra_args(cli.extra);
    request.model = cli.model;

    let engine: Box<dyn Engine> = match cli.engine {
        EngineKind::Copilot => {
            let config = CopilotConfig {
                binary_path: cli.bin,
                timeout: Duration::from_secs(cli.timeout_secs),
                ..CopilotConfig::default()
            };
            match CopilotAdapter::discover(config.clone()) {
                Ok(adapter) => Box::new(adapter),
                Err(e) => {
                    tracing::warn!("{e}; falling back to `copilot` on PATH");
                    Box::new(path_fallback(config))
                }
            }
        }
    };

    tracing::info!(engine = engine.name(), "Dispatching prompt");
    let result = engine.execute(&request).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Adapter that resolves the bare `copilot` name at spawn time.
fn path_fallback(config: CopilotConfig) -> CopilotAdapter {
    CopilotAdapter::new(CopilotConfig {
        binary_path: None,
        ..config
    })
}

async fn read_stdin() -> Result<String> {
    let mut prompt = String::new();
    tokio::io::stdin()
        .read_to_string(&mut prompt)
        .await
        .context("Failed to read prompt from stdin")?;
    Ok(prompt)
}
