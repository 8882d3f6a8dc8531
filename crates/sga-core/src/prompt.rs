use std::io::{self, BufRead, IsTerminal, Write};

use sga_shared::confirm::Prompt;
use tracing::warn;

/// Asks on stderr and reads the answer from stdin.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            warn!("stdin is not a terminal; declining prompt (use --yes)");
            return false;
        }
        let mut err = io::stderr().lock();
        if writeln!(err, "{message}").is_err() || write!(err, "[s/N] ").is_err() {
            return false;
        }
        let _ = err.flush();

        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

/// Used for `--yes` and `confirm = off`.
#[derive(Debug, Clone, Default)]
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}
