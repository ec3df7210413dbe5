//! sqlconsole – interactive natural-language console over the query gateway.
//!
//! Startup order:
//! 1. Load `.env`, parse flags, resolve configuration.
//! 2. Initialise tracing on stderr so it never interleaves with results.
//! 3. Build the orchestrator (language model + HTTP gateway client).
//! 4. Answer one `--question`, or run the line-oriented REPL.

mod command;
mod config;
mod render;

use std::io::Write;

use clap::Parser;
use colored::Colorize;
use sqlconsole_core::{HttpGateway, LanguageModel, OpenAiClient, Orchestrator, QueryGateway};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::command::{Command, HELP, result_turn};
use crate::config::{Cli, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let cfg = Config::from_env(&cli);

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| cfg.log_level.parse::<tracing_subscriber::EnvFilter>())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), ".env loaded"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to read .env"),
    }
    if cfg.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; every question will fail");
    }

    // ── 3. Orchestrator ────────────────────────────────────────────────────────
    let llm = OpenAiClient::new(cfg.llm_base_url.clone(), cfg.api_key.clone());
    let gateway = HttpGateway::new(cfg.api_url.clone());
    let mut console = Orchestrator::new(llm, gateway, cfg.model.clone());

    // ── 4. One-shot or interactive ─────────────────────────────────────────────
    match cli.question.as_deref() {
        Some(question) => one_shot(&mut console, question, cli.analyze).await,
        None => repl(&mut console, &cfg).await,
    }
}

async fn one_shot<L: LanguageModel, G: QueryGateway>(
    console: &mut Orchestrator<L, G>,
    question: &str,
    analyze: bool,
) -> anyhow::Result<()> {
    if ask(console, question).await {
        anyhow::bail!("the question could not be answered");
    }
    if analyze && analyze_result(console, None).await {
        anyhow::bail!("the result could not be analysed");
    }
    Ok(())
}

async fn repl<L: LanguageModel, G: QueryGateway>(
    console: &mut Orchestrator<L, G>,
    cfg: &Config,
) -> anyhow::Result<()> {
    println!("{}\n", render::banner(console.model(), &cfg.api_url));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "sql›".bold().cyan());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Ask(question) => {
                ask(console, &question).await;
            }
            Command::Analyze(n) => {
                analyze_result(console, n).await;
            }
            Command::History => {
                if console.session().is_empty() {
                    println!("{}", "(no conversation yet)".dimmed());
                } else {
                    println!("{}", render::render_session(console.session()));
                }
            }
            Command::Clear => {
                console.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(input) => {
                println!("{} {input}  (try /help)", "unknown command:".yellow());
            }
        }
        println!();
    }

    Ok(())
}

/// Runs one question and prints the turns it produced. Returns `true` when
/// the exchange ended in an error turn.
async fn ask<L: LanguageModel, G: QueryGateway>(
    console: &mut Orchestrator<L, G>,
    question: &str,
) -> bool {
    eprintln!("{}", "Generating SQL...".dimmed());
    let start = console.session().len();
    let failed = console.ask(question).await.iter().any(|t| t.is_error());
    // Skip the user turn; it is already on screen.
    println!("{}", render::render_from(console.session(), start + 1));
    failed
}

/// Analyses result `n` (1-based display number) or the latest result.
/// Returns `true` when no analysis was produced.
async fn analyze_result<L: LanguageModel, G: QueryGateway>(
    console: &mut Orchestrator<L, G>,
    n: Option<usize>,
) -> bool {
    let Some(index) = result_turn(&console.session().result_indices(), n) else {
        println!("{}", "No query result to analyse yet.".yellow());
        return true;
    };

    eprintln!("{}", "AI analyzing result...".dimmed());
    let start = console.session().len();
    match console.analyze(index).await {
        Ok(turn) => {
            let failed = turn.is_error();
            println!("{}", render::render_from(console.session(), start));
            failed
        }
        Err(e) => {
            println!("{} {e}", "⚠".red());
            true
        }
    }
}
