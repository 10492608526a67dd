mod cli_args;
mod config;
mod context;
mod error;
mod git;
mod llm;
mod logging;
mod reporter;
mod setup;
mod templates;
mod workflow;

use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::process::ExitCode;

use crate::cli_args::{Cli, Command};
use crate::config::Config;
use crate::error::{AdvisorError, AdvisorResult};
use crate::templates::{Severity, TEMPLATES};

/// Advise mode: ask the model about the pending commit message.
fn run_advise(cfg: &Config, out: &mut dyn Write) -> AdvisorResult<()> {
    let advice = workflow::run(cfg, setup::http_transport, true)?;
    reporter::report(&Ok(advice), out)?;
    Ok(())
}

/// Lint mode: local template and wording checks, no model involved.
fn run_lint(cfg: &Config, out: &mut dyn Write) -> AdvisorResult<()> {
    let template = templates::select_template(cfg.template.as_deref())?;
    let path = cfg.commit_message_path();
    let message = git::read_commit_message(&path)?;

    let findings = templates::lint(template, &message)
        .map_err(|e| AdvisorError::Format(format!("{e:#}")))?;

    if findings.is_empty() {
        writeln!(
            out,
            "{} No issues found against the {} template.",
            "ok".green().bold(),
            template.name
        )?;
        return Ok(());
    }

    for finding in &findings {
        let label = match finding.severity {
            Severity::Warning => finding.severity.as_str().yellow().bold(),
            Severity::Info => finding.severity.as_str().cyan(),
        };
        writeln!(
            out,
            "{label} {}:{}: {}",
            path.display(),
            finding.line,
            finding.message
        )?;
    }
    Ok(())
}

/// List built-in templates, marking the selected one.
fn run_templates(cfg: &Config, out: &mut dyn Write) -> AdvisorResult<()> {
    let current = templates::select_template(cfg.template.as_deref())?;

    for t in TEMPLATES {
        let marker = if t == current { "*" } else { " " };
        writeln!(out, "{marker} {} ({})", t.name.bold(), t.description)?;
        writeln!(out, "    {}", t.pattern.bright_black())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let cfg = Config::from_sources(&cli);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let outcome = match &cli.command {
        Some(Command::Lint) => run_lint(&cfg, &mut out),
        Some(Command::Templates) => run_templates(&cfg, &mut out),
        None => run_advise(&cfg, &mut out),
    };

    let Err(err) = outcome else {
        return ExitCode::SUCCESS;
    };

    match reporter::report(&Err(err), &mut out) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("failed to write to stdout: {e}");
            ExitCode::FAILURE
        }
    }
}
