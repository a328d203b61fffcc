//! Completion for an interactive line buffer.
//!
//! Prompting, history and key bindings are left to the line editor; this module only turns a buffer into candidates.
use argbind_builder::GeneralParser;

/// Complete the argument under `position` in the line `buffer`.
///
/// Arguments are delimited by whitespace, and only the text before `position` is considered.
/// When that text is empty or ends in whitespace, a new (empty) argument is completed.
/// Returns the sorted suffixes which complete the argument.
pub fn complete_line(parser: &GeneralParser<'_>, buffer: &str, position: usize) -> Vec<String> {
    let (tokens, cursor) = delimit(buffer, position);
    parser.complete(&tokens, cursor).into_results()
}

/// Split the text before `position` into arguments, returning them with the cursor argument's index.
fn delimit(buffer: &str, position: usize) -> (Vec<&str>, usize) {
    let mut end = position.min(buffer.len());
    // Round down onto a char boundary.
    while !buffer.is_char_boundary(end) {
        end -= 1;
    }
    let line = &buffer[..end];
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let cursor = match line.chars().last() {
        Some(last) if !last.is_whitespace() => tokens.len() - 1,
        _ => tokens.len(),
    };

    (tokens, cursor)
}
