//! Yes/no confirmation prompts

use std::io::{self, BufRead, Write};

/// Answers accepted as "yes", compared case-insensitively.
const ACCEPTED: &[&str] = &["s", "si", "sì", "y", "yes"];

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    ACCEPTED.contains(&answer.as_str())
}

/// Ask `question` on stderr and read one line from stdin.
///
/// `assume_yes` answers without asking. End of input counts as "no".
pub fn confirm(question: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let mut stderr = io::stderr();
    write!(stderr, "{question} [s/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    let read = io::stdin().lock().read_line(&mut answer)?;
    Ok(read > 0 && is_affirmative(&answer))
}
