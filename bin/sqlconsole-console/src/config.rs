//! Console configuration: environment first, command-line flags on top.

use clap::Parser;
use sqlconsole_core::gateway::DEFAULT_GATEWAY_URL;
use sqlconsole_core::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Ask SQL Server questions in plain language.
#[derive(Debug, Parser)]
#[command(name = "sqlconsole", version, about)]
pub struct Cli {
    /// Query gateway endpoint (overrides SQL_API_URL).
    #[arg(long)]
    pub api_url: Option<String>,

    /// OpenAI-compatible API root (overrides LLM_BASE_URL).
    #[arg(long)]
    pub llm_base_url: Option<String>,

    /// Model identifier (overrides LLM_MODEL).
    #[arg(long)]
    pub model: Option<String>,

    /// Ask a single question, print the result and exit.
    #[arg(long, short = 'q')]
    pub question: Option<String>,

    /// With --question: also analyse the result.
    #[arg(long, requires = "question")]
    pub analyze: bool,
}

/// Resolved console configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub llm_base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// `tracing` filter; logs go to stderr.
    pub log_level: String,
}

impl Config {
    pub fn from_env(cli: &Cli) -> Self {
        Self::from_lookup(cli, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        Self {
            api_url: cli.api_url.clone().unwrap_or_else(|| env_or("SQL_API_URL", DEFAULT_GATEWAY_URL)),
            llm_base_url: cli
                .llm_base_url
                .clone()
                .unwrap_or_else(|| env_or("LLM_BASE_URL", DEFAULT_BASE_URL)),
            model: cli.model.clone().unwrap_or_else(|| env_or("LLM_MODEL", DEFAULT_MODEL)),
            api_key: lookup("GROQ_API_KEY").filter(|v| !v.trim().is_empty()),
            log_level: env_or("SQLCONSOLE_LOG", "warn"),
        }
    }
}
