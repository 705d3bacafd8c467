use html::{Token, Tokenizer};

use crate::escape_text;

/// One line per token:
/// `<kind> <start>..<end> <start_pos>-<end_pos> "<contents>"`, or
/// `<kind> ..<end> <end_pos>` for boundary tokens.
pub fn format_token(token: &Token<'_>) -> String {
    match (token.start, token.start_pos) {
        (Some(start), Some(start_pos)) => format!(
            "{} {start}..{} {start_pos}-{} \"{}\"",
            token.kind,
            token.end,
            token.end_pos,
            escape_text(token.contents)
        ),
        _ => format!("{} ..{} {}", token.kind, token.end, token.end_pos),
    }
}

pub fn format_tokens<'a>(tokens: impl IntoIterator<Item = Token<'a>>) -> Vec<String> {
    tokens.into_iter().map(|token| format_token(&token)).collect()
}

/// Snapshot of a whole tokenizer run over `text`.
pub fn snapshot(text: &str) -> Vec<String> {
    format_tokens(Tokenizer::new(text))
}
