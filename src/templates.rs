use anyhow::Result;
use regex::{Regex, RegexBuilder};

use crate::error::{AdvisorError, AdvisorResult};

/// A named commit-message convention.
///
/// `pattern` describes the expected summary line. The advisor only quotes
/// it to the model; the local `lint` command is the one place it is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub pattern: &'static str,
}

pub const TEMPLATES: &[CommitTemplate] = &[
    CommitTemplate {
        name: "Conventional Commits",
        description: "type(scope): subject",
        pattern: r"^(feat|fix|docs|style|refactor|test|chore)(\([a-z ]+\))?: .{1,50}$",
    },
    CommitTemplate {
        name: "Angular",
        description: "type(scope): subject",
        pattern: r"^(build|ci|docs|feat|fix|perf|refactor|style|test)(\([a-z ]+\))?: .{1,50}$",
    },
];

const WEAK_VERBS: &[&str] = &["use", "utilize", "perform", "implement"];
const MAX_SUMMARY_LEN: usize = 72;

/// Pick the current template by name (case-insensitive); first one by default.
pub fn select_template(name: Option<&str>) -> AdvisorResult<&'static CommitTemplate> {
    let Some(name) = name else {
        return Ok(&TEMPLATES[0]);
    };

    TEMPLATES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| {
            let known: Vec<&str> = TEMPLATES.iter().map(|t| t.name).collect();
            AdvisorError::Configuration(format!(
                "unknown commit template {name:?} (available: {})",
                known.join(", ")
            ))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// One local observation about a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    /// 1-based line the finding points at.
    pub line: usize,
    pub message: String,
}

/// Check a commit message against a template without calling any model.
pub fn lint(template: &CommitTemplate, message: &str) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    let summary = message.lines().next().unwrap_or("");

    let pattern = Regex::new(template.pattern)?;
    if !pattern.is_match(summary) {
        findings.push(Finding {
            severity: Severity::Warning,
            line: 1,
            message: format!(
                "Commit message does not follow the {} template: {}",
                template.name, template.description
            ),
        });
    }

    for verb in WEAK_VERBS {
        let re = RegexBuilder::new(&format!(r"\b{verb}\b"))
            .case_insensitive(true)
            .build()?;
        for m in re.find_iter(message) {
            findings.push(Finding {
                severity: Severity::Info,
                line: line_of(message, m.start()),
                message: format!("Consider using a stronger verb instead of \"{verb}\""),
            });
        }
    }

    if summary.chars().count() > MAX_SUMMARY_LEN {
        findings.push(Finding {
            severity: Severity::Info,
            line: 1,
            message: format!(
                "Commit message is too long. Consider keeping it under {MAX_SUMMARY_LEN} characters."
            ),
        });
    }

    Ok(findings)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
