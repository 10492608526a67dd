use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command as GitCommand;

use crate::error::{AdvisorError, AdvisorResult};

const COMMIT_EDITMSG: &str = "COMMIT_EDITMSG";

/// Get the path to the Git directory (e.g. .git)
pub fn git_dir() -> Result<PathBuf> {
    let output = GitCommand::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .context("failed to run git rev-parse --git-dir")?;

    if !output.status.success() {
        return Err(anyhow!(
            "git rev-parse --git-dir exited with status {:?}",
            output.status.code()
        ));
    }

    let dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(dir))
}

/// Where git keeps the message of the commit being written.
///
/// Falls back to `.git/COMMIT_EDITMSG` when git itself can't tell us,
/// e.g. outside a work tree or without a git binary on PATH.
pub fn default_commit_message_path() -> PathBuf {
    match git_dir() {
        Ok(dir) => dir.join(COMMIT_EDITMSG),
        Err(e) => {
            log::debug!("Could not locate git dir ({e:#}), assuming .git");
            PathBuf::from(".git").join(COMMIT_EDITMSG)
        }
    }
}

/// Read the pending commit message, trimmed of surrounding whitespace.
pub fn read_commit_message(path: &Path) -> AdvisorResult<String> {
    match fs::read_to_string(path) {
        Ok(text) => {
            log::info!("Read commit message from {}", path.display());
            Ok(text.trim().to_string())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AdvisorError::NotFound(format!(
            "commit message file {} does not exist",
            path.display()
        ))),
        Err(e) => Err(AdvisorError::Io(e)),
    }
}

/// Write the commit message back so the next `git commit`
/// will use it as the default message in the editor.
pub fn write_commit_editmsg(path: &Path, message: &str) -> Result<()> {
    let mut contents = message.trim_end().to_string();
    contents.push('\n');
    fs::write(path, contents)
        .with_context(|| format!("failed to write commit message to {:?}", path))?;
    Ok(())
}
