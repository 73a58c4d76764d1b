//! Tokenization of a raw input line into an argument vector.
//!
//! Splitting is purely on whitespace. There is no quoting, escaping or
//! expansion: `echo "a b"` yields the three tokens `echo`, `"a` and `b"`.

/// Characters that separate tokens: space, tab, carriage return, newline and bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Split `line` into tokens borrowed from it.
///
/// Runs of delimiters collapse, so no empty tokens are produced. A line made
/// only of delimiters yields an empty vector, which the dispatcher treats as a
/// blank line. The first token, if any, is the command name.
pub fn split_into_tokens(line: &str) -> Vec<&str> {
    line.split(&DELIMITERS[..])
        .filter(|token| !token.is_empty())
        .collect()
}
