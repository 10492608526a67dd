use clap::ValueEnum;
use serde::Deserialize;

use crate::llm::prompts;
use crate::templates::CommitTemplate;

/// What we want the model to do with the commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceMode {
    /// Critique clarity, structure and adherence to the template
    #[default]
    Critique,
    /// Suggest a rewrite that follows the template
    Rewrite,
    /// Rephrase the message more concisely
    Rephrase,
}

impl AdviceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceMode::Critique => "critique",
            AdviceMode::Rewrite => "rewrite",
            AdviceMode::Rephrase => "rephrase",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            AdviceMode::Critique => prompts::CRITIQUE,
            AdviceMode::Rewrite => prompts::REWRITE,
            AdviceMode::Rephrase => prompts::REPHRASE,
        }
    }

    fn answer_label(&self) -> &'static str {
        match self {
            AdviceMode::Critique => "Feedback:",
            AdviceMode::Rewrite => "Rewritten message:",
            AdviceMode::Rephrase => "Rephrased message:",
        }
    }
}

/// Compose the user prompt. The commit message is embedded verbatim.
pub fn build_prompt(
    template: &CommitTemplate,
    commit_message: &str,
    mode: AdviceMode,
    preferences: Option<&str>,
) -> String {
    let mut prompt = mode
        .instruction()
        .replace("{template}", template.name)
        .replace("{description}", template.description);

    if let Some(prefs) = preferences.map(str::trim).filter(|p| !p.is_empty()) {
        prompt.push(' ');
        prompt.push_str(&prompts::PREFERENCES.replace("{preferences}", prefs));
    }

    prompt.push(' ');
    prompt.push_str(prompts::MESSAGE_INTRO);
    prompt.push_str("\n\n");
    prompt.push_str(commit_message);
    prompt.push_str("\n\n");
    prompt.push_str(mode.answer_label());

    prompt
}
