use anyhow::Result;

use crate::config::Config;
use crate::context;
use crate::error::{AdvisorError, AdvisorResult};
use crate::git;
use crate::llm::prompt_builder::{build_prompt, AdviceMode};
use crate::llm::{prompts, AdvisoryClient, AdvisoryRequest, Transport};
use crate::setup;
use crate::templates::{self, CommitTemplate};

/// Full advise run: configure, then read → context → prompt → model.
///
/// Configuration problems surface before any file is read or request sent.
pub fn run<F>(cfg: &Config, make_transport: F, progress: bool) -> AdvisorResult<String>
where
    F: FnOnce(&Config) -> Result<Box<dyn Transport>>,
{
    let template = templates::select_template(cfg.template.as_deref())?;
    let client = setup::build_advisory_client(cfg, make_transport)?.with_progress(progress);
    advise(cfg, template, &client)
}

pub fn advise(
    cfg: &Config,
    template: &CommitTemplate,
    client: &AdvisoryClient,
) -> AdvisorResult<String> {
    let path = cfg.commit_message_path();
    let message = git::read_commit_message(&path)?;
    if message.is_empty() {
        return Err(AdvisorError::NotFound(format!(
            "no commit message to review: {} is empty",
            path.display()
        )));
    }

    let documents = context::resolve_context(cfg.context_path.as_deref())?;

    log::info!(
        "Asking for a {} against the {} template",
        cfg.mode.as_str(),
        template.name
    );
    let prompt = build_prompt(template, &message, cfg.mode, cfg.preferences.as_deref());
    let request =
        AdvisoryRequest::new(prompt, documents, cfg.options)?.with_preamble(prompts::PREAMBLE);

    let advice = client.request_advice(&request)?;

    if cfg.apply {
        if cfg.mode == AdviceMode::Critique {
            log::warn!(
                "--apply only applies to rewrite and rephrase modes; leaving {} untouched",
                path.display()
            );
        } else if let Err(e) = git::write_commit_editmsg(&path, &advice) {
            log::error!("{e:#}");
        } else {
            log::info!("Wrote suggestion to {}", path.display());
        }
    }

    Ok(advice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use crate::cli_args::Cli;
    use crate::llm::client::tests::{no_wait, StubTransport};
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(dir: &Path, key: Option<&str>, extra: &[&str]) -> Config {
        let message_file = dir.join("COMMIT_EDITMSG");
        let mut argv = vec![
            "commitmentor".to_string(),
            "--message-file".to_string(),
            message_file.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        let cli = Cli::try_parse_from(argv).unwrap();

        let key = key.map(str::to_string);
        let mut cfg = Config::resolve(&cli, FileConfig::default(), move |name| {
            (name == "COHERE_API_KEY").then(|| key.clone()).flatten()
        });
        cfg.retry = no_wait(cfg.retry.max_retries);
        cfg
    }

    fn stubbed(stub: &StubTransport) -> impl FnOnce(&Config) -> Result<Box<dyn Transport>> + '_ {
        move |_: &Config| -> Result<Box<dyn Transport>> { Ok(Box::new(stub.clone())) }
    }

    #[test]
    fn missing_credential_makes_no_network_calls() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COMMIT_EDITMSG"), "fix: correct typo\n").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "unused"}"#);

        for key in [None, Some(""), Some("   ")] {
            let cfg = config(dir.path(), key, &[]);
            let err = run(&cfg, stubbed(&stub), false).unwrap_err();
            assert!(matches!(err, AdvisorError::Configuration(_)), "{err}");
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn unknown_template_makes_no_network_calls() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COMMIT_EDITMSG"), "fix: correct typo\n").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "unused"}"#);

        let cfg = config(dir.path(), Some("k"), &["--template", "gitmoji"]);
        let err = run(&cfg, stubbed(&stub), false).unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn happy_path_sends_the_real_message() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COMMIT_EDITMSG"), "  add refresh of tokens \n").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "feat(auth): add token refresh"}"#);

        let cfg = config(dir.path(), Some("secret"), &["--mode", "rewrite"]);
        let advice = run(&cfg, stubbed(&stub), false).unwrap();

        assert_eq!(advice, "feat(auth): add token refresh");
        assert_eq!(stub.call_count(), 1);

        let calls = stub.calls.borrow();
        let body = &calls[0].1;
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("\n\nadd refresh of tokens\n\n"));
        assert!(message.contains("Conventional Commits"));
        assert_eq!(body["model"], "command-r");
        assert!(body["preamble"].as_str().unwrap().contains("commit message mentor"));
        assert!(body.get("documents").is_none());
    }

    #[test]
    fn missing_commit_message_is_not_found_without_network() {
        let dir = TempDir::new().unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "unused"}"#);

        let cfg = config(dir.path(), Some("secret"), &[]);
        let err = run(&cfg, stubbed(&stub), false).unwrap_err();

        assert!(matches!(err, AdvisorError::NotFound(_)));
        assert!(!err.is_fatal());
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn empty_commit_message_is_not_sent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COMMIT_EDITMSG"), "\n  \n").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "unused"}"#);

        let cfg = config(dir.path(), Some("secret"), &[]);
        let err = run(&cfg, stubbed(&stub), false).unwrap_err();

        assert!(err.to_string().contains("is empty"));
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn context_documents_are_sent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COMMIT_EDITMSG"), "fix: correct typo").unwrap();
        let docs = dir.path().join("docs.json");
        fs::write(&docs, r#"[{"title": "Scopes", "snippet": "auth, api"}]"#).unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "Looks good."}"#);

        let docs_arg = docs.display().to_string();
        let cfg = config(dir.path(), Some("secret"), &["--context", &docs_arg]);
        run(&cfg, stubbed(&stub), false).unwrap();

        let calls = stub.calls.borrow();
        assert_eq!(calls[0].1["documents"][0]["snippet"], "auth, api");
    }

    #[test]
    fn bad_context_is_reported_without_network() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COMMIT_EDITMSG"), "fix: correct typo").unwrap();
        let docs = dir.path().join("docs.json");
        fs::write(&docs, "not json").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "unused"}"#);

        let docs_arg = docs.display().to_string();
        let cfg = config(dir.path(), Some("secret"), &["--context", &docs_arg]);
        let err = run(&cfg, stubbed(&stub), false).unwrap_err();

        assert!(matches!(err, AdvisorError::Format(_)));
        assert_eq!(stub.call_count(), 0);

        let missing = dir.path().join("missing.json").display().to_string();
        let cfg = config(dir.path(), Some("secret"), &["--context", &missing]);
        let err = run(&cfg, stubbed(&stub), false).unwrap_err();
        assert!(matches!(err, AdvisorError::NotFound(_)));
    }

    #[test]
    fn server_error_surfaces_as_advisory_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("COMMIT_EDITMSG"), "fix: correct typo").unwrap();
        let stub = StubTransport::replying(500, "internal error");

        let cfg = config(dir.path(), Some("secret"), &["--retries", "1"]);
        let err = run(&cfg, stubbed(&stub), false).unwrap_err();

        assert!(matches!(err, AdvisorError::Advisory(_)));
        assert_eq!(stub.call_count(), 2);
    }

    #[test]
    fn apply_writes_rewrite_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("COMMIT_EDITMSG");
        fs::write(&path, "added token refresh").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "feat(auth): add token refresh"}"#);

        let cfg = config(dir.path(), Some("secret"), &["--mode", "rewrite", "--apply"]);
        run(&cfg, stubbed(&stub), false).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "feat(auth): add token refresh\n"
        );
    }

    #[test]
    fn apply_writes_rephrase_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("COMMIT_EDITMSG");
        fs::write(&path, "fix: fixed the thing where tokens were not refreshed").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "fix: refresh expired tokens"}"#);

        let cfg = config(dir.path(), Some("secret"), &["--mode", "rephrase", "--apply"]);
        let advice = run(&cfg, stubbed(&stub), false).unwrap();

        assert_eq!(advice, "fix: refresh expired tokens");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "fix: refresh expired tokens\n"
        );
    }

    #[test]
    fn apply_leaves_file_alone_in_critique_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("COMMIT_EDITMSG");
        fs::write(&path, "added token refresh").unwrap();
        let stub = StubTransport::replying(200, r#"{"text": "Use a type prefix."}"#);

        let cfg = config(dir.path(), Some("secret"), &["--apply"]);
        run(&cfg, stubbed(&stub), false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "added token refresh");
    }
}
