//! Helpers shared by the workspace's data-driven tests: fixture loading,
//! escaping for one-line snapshots, and readable diffs of line lists.

use std::fmt::Write;

pub mod fixtures;

#[cfg(feature = "html")]
pub mod token_snapshot;

/// Lines of context printed around the first differing line.
const CONTEXT: usize = 2;

/// Escapes `text` so it fits on one snapshot line inside double quotes.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let escaped = match ch {
            '\\' => "\\\\",
            '"' => "\\\"",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{{{:04X}}}", ch as u32);
                continue;
            }
            ch => {
                out.push(ch);
                continue;
            }
        };
        out.push_str(escaped);
    }
    out
}

/// Describes where `actual` first departs from `expected`, with a few lines
/// of context on both sides.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let line = |lines: &[String], at: usize| -> String {
        lines.get(at).cloned().unwrap_or_else(|| "<missing>".to_string())
    };

    let longest = expected.len().max(actual.len());
    let mut out = String::new();
    let first = (0..longest).find(|&at| expected.get(at) != actual.get(at));
    match first {
        Some(at) => {
            let _ = writeln!(out, "first difference at line {}:", at + 1);
            for shown in at.saturating_sub(CONTEXT)..(at + CONTEXT + 1).min(longest) {
                let mark = if shown == at { '>' } else { ' ' };
                let _ = writeln!(out, "{mark} {:>4} - {}", shown + 1, line(expected, shown));
                let _ = writeln!(out, "{mark} {:>4} + {}", shown + 1, line(actual, shown));
            }
        }
        None => {
            let _ = writeln!(out, "no difference");
        }
    }
    let _ = writeln!(
        out,
        "expected {} lines, got {}",
        expected.len(),
        actual.len()
    );
    out
}
