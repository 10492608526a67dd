use std::io::{self, Write};

use crate::error::AdvisorResult;

pub const ADVICE_LABEL: &str = "Commit Analysis:";

/// Print the outcome of a run. Returns `true` when the process should exit non-zero.
pub fn report(result: &AdvisorResult<String>, out: &mut dyn Write) -> io::Result<bool> {
    match result {
        Ok(advice) => {
            writeln!(out, "{ADVICE_LABEL} {advice}")?;
            Ok(false)
        }
        Err(err) => {
            let message = err.to_string();
            let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
            writeln!(out, "error: {}: {message}", err.kind())?;
            Ok(err.is_fatal())
        }
    }
}
