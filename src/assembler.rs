//! Turns an annotated G-code document into a Python script.
//!
//! The document is read line by line. Plain G-code is collected into print segments,
//! embedded code becomes raw segments, and both keep the order of the source. Running
//! the rendered script prints the G-code back, with whatever the embedded code prints
//! spliced in where that code sat.

use crate::block::BlockState;
use crate::classify::{LineKind, classify};
use crate::config::{COMMENT_CHAR, Config, Markers};
use crate::error::{Error, Result};
use crate::escape::unescape;

/// One statement of the assembled script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of consecutive plain lines, terminators included, printed verbatim.
    Print(String),
    /// One line of embedded code.
    Raw(String),
}

/// Result of one assembly pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub segments: Vec<Segment>,
    /// Line of the block opener when the document ended inside a block.
    pub unterminated: Option<usize>,
}

/// First lines of every script. Output is UTF-8 with `\n` left alone, whatever the
/// locale or platform of the interpreter.
pub const PRELUDE: &str = "import sys\nsys.stdout.reconfigure(encoding='utf-8', newline='')\n";

impl Assembly {
    /// Renders the segments as Python 3 source.
    ///
    /// Print segments become `print('''...''', end='')`, so executing the script writes
    /// each run byte for byte. Raw segments are copied as they are.
    pub fn to_script(&self) -> String {
        let mut out = String::from(PRELUDE);
        for segment in &self.segments {
            match segment {
                Segment::Print(text) => {
                    out.push_str("print('''");
                    push_quoted(&mut out, text);
                    out.push_str("''', end='')\n");
                }
                Segment::Raw(code) => {
                    out.push_str(code);
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Escapes what Python would otherwise interpret inside a `'''` string.
fn push_quoted(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            // Python folds CRLF in source files to LF.
            '\r' => out.push_str("\\r"),
            // Raw NUL is a syntax error; other control bytes follow suit.
            '\n' | '\t' => out.push(ch),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            _ => out.push(ch),
        }
    }
}

struct AssemblerFSM {
    markers: Markers,
    state: BlockState,
    pending: String,
    segments: Vec<Segment>,
}

impl AssemblerFSM {
    fn new(markers: Markers) -> Self {
        AssemblerFSM {
            markers,
            state: BlockState::default(),
            pending: String::new(),
            segments: Vec::new(),
        }
    }

    /// Handles one physical line. `line` still carries its terminator.
    fn feed(&mut self, line_no: usize, line: &str) {
        match classify(line, &self.markers) {
            LineKind::SingleStatement => {
                self.flush();
                let code = &line.trim_start()[self.markers.statement.len()..];
                self.segments
                    .push(Segment::Raw(unescape(code.trim()).into_owned()));
            }
            LineKind::BlockOpen if !self.state.is_inside() => {
                self.flush();
                self.state.open(line_no);
            }
            LineKind::BlockClose if self.state.is_inside() => {
                self.state.close();
            }
            _ => self.handle_content(line),
        }
    }

    fn handle_content(&mut self, line: &str) {
        if self.state.is_inside() {
            let code = line.trim_end();
            let code = code.strip_prefix(COMMENT_CHAR).unwrap_or(code);
            self.segments.push(Segment::Raw(unescape(code).into_owned()));
        } else {
            self.pending.push_str(&unescape(line));
        }
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.segments
                .push(Segment::Print(std::mem::take(&mut self.pending)));
        }
    }

    fn finish(mut self, strict: bool) -> Result<Assembly> {
        self.flush();
        let unterminated = match self.state {
            BlockState::Inside { opened_at } if strict => {
                return Err(Error::UnterminatedBlock { line: opened_at });
            }
            BlockState::Inside { opened_at } => {
                tracing::warn!(line = opened_at, "code block is never closed");
                Some(opened_at)
            }
            BlockState::Outside => None,
        };
        Ok(Assembly {
            segments: self.segments,
            unterminated,
        })
    }
}

/// Splits `source` into print and raw segments according to `config`'s marker pattern.
///
/// A document that ends inside a block is accepted unless `config.strict_blocks` is set,
/// in which case [`Error::UnterminatedBlock`] is returned.
pub fn assemble(source: &str, config: &Config) -> Result<Assembly> {
    let mut fsm = AssemblerFSM::new(config.markers());
    for (idx, line) in source.split_inclusive('\n').enumerate() {
        fsm.feed(idx + 1, line);
    }
    fsm.finish(config.strict_blocks)
}
