//! Call-site tokens for debug output.
//!
//! Every public logging entry point is `#[track_caller]`, so the
//! [`Location`] handed to this module is already the first frame outside
//! the crate. What remains is fitting `path:line` into a fixed column.

use std::panic::Location;

/// Maximum width of a rendered caller token.
pub const CALLER_WIDTH: usize = 22;

const MAX_SEGMENTS: usize = 4;

/// Renders a call site as `dir/file.rs:line`, at most [`CALLER_WIDTH`] chars.
pub fn caller_token(location: &Location<'_>) -> String {
    render(location.file(), location.line())
}

/// Renders a path and line number into a bounded caller token.
///
/// Keeps as many trailing path segments as fit (four at most). When even
/// the bare file name is too long, the tail of the token is kept so the
/// line number is never cut off. An empty path gives an empty token.
pub fn render(file: &str, line: u32) -> String {
    let segments: Vec<&str> = file
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return String::new();
    }

    let mut token = String::new();
    for keep in (1..=MAX_SEGMENTS.min(segments.len())).rev() {
        token = format!("{}:{}", segments[segments.len() - keep..].join("/"), line);
        if token.chars().count() <= CALLER_WIDTH {
            return token;
        }
    }
    tail(&token, CALLER_WIDTH)
}

fn tail(token: &str, width: usize) -> String {
    let skip = token.chars().count().saturating_sub(width);
    token.chars().skip(skip).collect()
}
