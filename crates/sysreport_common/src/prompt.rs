//! Interactive confirmation prompt
//!
//! Asks one yes/no/quit question over a line-oriented channel and keeps
//! asking until the answer is recognized or the channel goes away.

use std::io::{self, BufRead, Write};

use tracing::debug;

/// Question asked before anything is reported
pub const QUESTION: &str = "Do you agree to report this?";

/// Full prompt written to the output stream, without trailing newline
pub const PROMPT: &str =
    "Do you agree to report this? [y (send metrics)/n (send opt out message)/Q (quit)] ";

/// Outcome of asking the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDecision {
    /// Send the full report
    Agree,
    /// Send only the opt-out marker
    Decline,
    /// Send and store nothing
    Abort,
}

/// Classify one answer. `None` means the answer isn't recognized.
///
/// Only whole answers match: "yesgarbage" is not "yes".
pub fn classify(answer: &str) -> Option<PromptDecision> {
    let answer = answer.trim().to_ascii_lowercase();
    match answer.as_str() {
        "y" | "yes" => Some(PromptDecision::Agree),
        "n" | "no" => Some(PromptDecision::Decline),
        "" | "q" | "quit" => Some(PromptDecision::Abort),
        _ => None,
    }
}

/// Ask until a recognized answer arrives.
///
/// A closed input stream or an interrupted read is an `Abort`.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<PromptDecision> {
    loop {
        output.write_all(PROMPT.as_bytes())?;
        output.flush()?;

        let line = match read_answer(input)? {
            Some(line) => line,
            None => {
                debug!("Input closed or interrupted while waiting for an answer");
                return Ok(PromptDecision::Abort);
            }
        };

        match classify(&line) {
            Some(decision) => {
                debug!(?decision, "Answer recognized");
                return Ok(decision);
            }
            None => debug!(answer = %line.trim(), "Unrecognized answer, asking again"),
        }
    }
}

/// Read one line. `None` when the input ends or is interrupted first.
///
/// `read_line` retries interrupted reads, so lines are assembled here.
fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    loop {
        let available = match input.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(None),
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            if line.is_empty() {
                return Ok(None);
            }
            break;
        }

        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                line.extend_from_slice(&available[..=i]);
                input.consume(i + 1);
                break;
            }
            None => {
                let len = available.len();
                line.extend_from_slice(available);
                input.consume(len);
            }
        }
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}
