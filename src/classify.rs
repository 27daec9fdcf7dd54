//! Recognizes marker lines.

use crate::config::Markers;

/// What a single input line is, judged by its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `<pattern>:` followed by one line of code.
    SingleStatement,
    /// `<pattern><` starts a code block. The rest of the line is ignored.
    BlockOpen,
    /// `<pattern>>` ends a code block. The rest of the line is ignored.
    BlockClose,
    /// Anything else.
    Literal,
}

/// Classifies `line` by prefix, ignoring leading whitespace only. Case-sensitive.
pub fn classify(line: &str, markers: &Markers) -> LineKind {
    let line = line.trim_start();
    if line.starts_with(&markers.statement) {
        LineKind::SingleStatement
    } else if line.starts_with(&markers.open) {
        LineKind::BlockOpen
    } else if line.starts_with(&markers.close) {
        LineKind::BlockClose
    } else {
        LineKind::Literal
    }
}
