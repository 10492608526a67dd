use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::llm::prompt_builder::AdviceMode;
use crate::llm::Provider;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "commitmentor",
    version,
    about = "LLM-assisted review of your pending Git commit message"
)]
#[command(group(
    ArgGroup::new("context_group")
        .args(["context", "no_context"])
        .multiple(false)
))]
pub struct Cli {
    /// What to ask the model for
    #[arg(long, value_enum)]
    pub mode: Option<AdviceMode>,

    /// JSON file with [{"title": ..., "snippet": ...}] documents to send as context
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Ignore any configured context file
    #[arg(long)]
    pub no_context: bool,

    /// Free-text feedback preferences (e.g. "avoid jargon, no passive voice")
    #[arg(long)]
    pub preferences: Option<String>,

    /// In rewrite/rephrase mode, write the suggestion back into the commit message file
    #[arg(long)]
    pub apply: bool,

    /// Commit convention to check against (see `commitmentor templates`)
    #[arg(long, global = true)]
    pub template: Option<String>,

    /// Commit message file; defaults to COMMIT_EDITMSG in the git dir
    #[arg(long, global = true)]
    pub message_file: Option<PathBuf>,

    /// Which chat API to call
    #[arg(long, value_enum, global = true)]
    pub provider: Option<Provider>,

    /// Model name to use (e.g. command-r, gpt-4o-mini)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API key (otherwise uses COHERE_API_KEY or OPENAI_API_KEY, per provider)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Override the provider's API base URL
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Upper bound on generated tokens
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Retries after a failed request (0 disables retrying)
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand (e.g. 'lint')
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands, e.g. `commitmentor lint`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the commit message locally against the template, without calling a model
    Lint,

    /// List the built-in commit templates
    Templates,
}
