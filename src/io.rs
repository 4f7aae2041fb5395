//! Injectable line-reader/line-writer sinks, so the engine never talks to
//! real stdio directly — it talks to a `LineSource`/`LineSink` instead,
//! so tests can swap in in-memory adapters.

use std::io::{self, BufRead, Write};

/// A source of input lines (one per `INSTR`/`INNUM`).
pub trait LineSource {
    /// Returns the next line, without its trailing newline, or `None` at
    /// end of input.
    fn read_line(&mut self) -> Option<String>;
}

/// A sink for output lines (PRINT output and the final error line both go
/// through this — errors are reported on the same stream as PRINT output.
pub trait LineSink {
    fn write_line(&mut self, line: &str);
}

/// Reads from real stdin.
pub struct StdinSource {
    stdin: io::Stdin,
}

impl StdinSource {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinSource {
    fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.stdin.lock().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.ends_with('\n') {
                    buf.pop();
                    if buf.ends_with('\r') {
                        buf.pop();
                    }
                }
                Some(buf)
            }
            Err(_) => None,
        }
    }
}

/// Writes to real stdout.
pub struct StdoutSink {
    stdout: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { stdout: io::stdout() }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        let mut handle = self.stdout.lock();
        let _ = writeln!(handle, "{line}");
    }
}

/// In-memory source for tests: a queue of pre-supplied lines.
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    lines: std::collections::VecDeque<String>,
}

impl VecSource {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for VecSource {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

/// In-memory sink for tests: every written line is appended for later
/// inspection, grounded in the `get_output()` pattern used by the pack's
/// other interpreter test suites.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    lines: Vec<String>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All written lines joined with `\n`, with a trailing `\n` — the
    /// shape the end-to-end tests assert against.
    pub fn output(&self) -> String {
        let mut s = self.lines.join("\n");
        if !self.lines.is_empty() {
            s.push('\n');
        }
        s
    }
}

impl LineSink for VecSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
