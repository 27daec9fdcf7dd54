//! Placeholder expansion for the brackets reserved by the slicer's macro language.
//!
//! PrusaSlicer and Slic3r treat `{...}` and `[...]` in custom G-code as macros and
//! expand them before this tool runs. Code that needs real brackets writes them as
//! placeholders instead:
//!
//! | placeholder | literal |
//! |-------------|---------|
//! | `<~(`       | `{`     |
//! | `)~>`       | `}`     |
//! | `<(`        | `[`     |
//! | `)>`        | `]`     |

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

pub const OPEN_CURLY: &str = "<~(";
pub const CLOSE_CURLY: &str = ")~>";
pub const OPEN_SQUARE: &str = "<(";
pub const CLOSE_SQUARE: &str = ")>";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<~\(|\)~>|<\(|\)>").expect("valid regex"));

/// Replaces every placeholder in `line` with the bracket it stands for.
///
/// Borrows when the line contains no placeholder.
pub fn unescape(line: &str) -> Cow<'_, str> {
    PLACEHOLDER.replace_all(line, |caps: &Captures| match &caps[0] {
        OPEN_CURLY => "{",
        CLOSE_CURLY => "}",
        OPEN_SQUARE => "[",
        _ => "]",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_brackets_are_restored() {
        assert_eq!(unescape("G1 X<(10+5)>"), "G1 X[10+5]");
    }

    #[test]
    fn curly_brackets_keep_content_verbatim() {
        assert_eq!(
            unescape("d = <~('a': 1, \"b\": [2])~>"),
            "d = {'a': 1, \"b\": [2]}"
        );
    }

    #[test]
    fn mixed_and_nested_placeholders() {
        assert_eq!(unescape("x = <~(k: <(1, 2)>)~>"), "x = {k: [1, 2]}");
        assert_eq!(unescape("a<(b<(0)>)>"), "a[b[0]]");
    }

    #[test]
    fn plain_lines_are_borrowed() {
        let line = "G1 X10 Y20 ; move < here > there";
        assert!(matches!(unescape(line), Cow::Borrowed(_)));
        assert_eq!(unescape(line), line);
    }

    #[test]
    fn partial_placeholders_are_left_alone() {
        assert_eq!(unescape("<~ ( ) ~> < ( ) >"), "<~ ( ) ~> < ( ) >");
        assert_eq!(unescape("if a<b and (c)~d:"), "if a<b and (c)~d:");
    }
}
