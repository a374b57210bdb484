//! Output scanner for driving the interactive protocol
//!
//! The prompt is written without a trailing newline, so a plain line reader
//! on the other end of the channel would block on it forever. Tokens here end
//! at a newline or right after a complete prompt, whichever comes first.

use std::io::{self, Read};

use crate::prompt::PROMPT;

const READ_CHUNK: usize = 4096;

/// Result of scanning a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// `data[..len]` is a token; drop `advance` bytes before scanning again
    Token { advance: usize, len: usize },
    /// No terminator yet, read more
    NeedMore,
    /// Input is exhausted
    End,
}

/// Find the next token in `data`.
pub fn scan_lines_or_question(data: &[u8], at_eof: bool) -> Scan {
    if at_eof && data.is_empty() {
        return Scan::End;
    }

    let newline = data.iter().position(|&b| b == b'\n');
    let question_end = find(data, PROMPT.as_bytes()).map(|start| start + PROMPT.len());

    match (newline, question_end) {
        (Some(nl), Some(end)) if end <= nl => Scan::Token {
            advance: end,
            len: end,
        },
        (Some(nl), _) => Scan::Token {
            advance: nl + 1,
            len: strip_cr(data, nl),
        },
        (None, Some(end)) => Scan::Token {
            advance: end,
            len: end,
        },
        (None, None) if at_eof => Scan::Token {
            advance: data.len(),
            len: data.len(),
        },
        (None, None) => Scan::NeedMore,
    }
}

fn strip_cr(data: &[u8], nl: usize) -> usize {
    if nl > 0 && data[nl - 1] == b'\r' {
        nl - 1
    } else {
        nl
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Iterator over the tokens of a reader.
pub struct TokenReader<R> {
    inner: R,
    buf: Vec<u8>,
    eof: bool,
}

impl<R: Read> TokenReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            eof: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for TokenReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match scan_lines_or_question(&self.buf, self.eof) {
                Scan::Token { advance, len } => {
                    let token = String::from_utf8_lossy(&self.buf[..len]).into_owned();
                    self.buf.drain(..advance);
                    return Some(Ok(token));
                }
                Scan::NeedMore => {
                    if let Err(e) = self.fill() {
                        return Some(Err(e));
                    }
                }
                Scan::End => return None,
            }
        }
    }
}
