//! Console input with scripted answers
//!
//! Every interactive prompt in the pipeline reads through [`Console`]. A
//! FIFO of pre-loaded answers is consulted before the real input source, so
//! scripted invocations can run filter selections, confirmations and
//! post-action menus unattended. Consumed answers are echoed so transcripts
//! look the same either way.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};

/// Line-based console input with a scripted-answer buffer
pub struct Console {
    buffered: VecDeque<String>,
    input: Box<dyn BufRead>,
}

impl Console {
    /// Console reading from standard input
    pub fn stdin() -> Self {
        Console {
            buffered: VecDeque::new(),
            input: Box::new(BufReader::new(io::stdin())),
        }
    }

    /// Console reading from an arbitrary source (used by tests)
    pub fn from_reader(input: Box<dyn BufRead>) -> Self {
        Console {
            buffered: VecDeque::new(),
            input,
        }
    }

    /// Clear the scripted-answer buffer.
    ///
    /// Called at the start of each top-level invocation, not per prompt.
    pub fn clear_answers(&mut self) {
        self.buffered.clear();
    }

    /// Queue answers for upcoming prompts, in order
    pub fn push_answers<I>(&mut self, answers: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.buffered.extend(answers);
    }

    /// Number of unconsumed scripted answers
    pub fn pending_answers(&self) -> usize {
        self.buffered.len()
    }

    /// Read one line, preferring the scripted buffer.
    ///
    /// Returns `None` when the buffer is empty and the input source is
    /// exhausted, so callers can leave their prompt loops cleanly.
    pub fn read_line(&mut self) -> Option<String> {
        if let Some(answer) = self.buffered.pop_front() {
            println!("{}", answer);
            return Some(answer);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}
