use html_test_support::diff_lines;
use html_test_support::fixtures::{expected_lines, fixture_path, load_cases};
use html_test_support::token_snapshot::snapshot;
use serde::Deserialize;

#[derive(Deserialize)]
struct TokenCase {
    name: String,
    input: String,
    tokens: String,
}

#[test]
fn tokenizer_fixtures_match_snapshots() {
    let path = fixture_path(env!("CARGO_MANIFEST_DIR"), "tokenizer.toml");
    let cases: Vec<TokenCase> = load_cases(&path);
    let mut failures = Vec::new();
    for case in &cases {
        let expected = expected_lines(&case.tokens);
        let actual = snapshot(&case.input);
        if expected != actual {
            failures.push(format!("{}:\n{}", case.name, diff_lines(&expected, &actual)));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn chunk_boundaries_do_not_change_tokens() {
    // Any prefix that ends at a token boundary tokenizes to a prefix of the
    // full stream.
    let input = "<div class=a><p>one</p><!--c--><br/>two</div>";
    let full = snapshot(input);
    for cut in ["<div class=a>", "<div class=a><p>one</p>", "<div class=a><p>one</p><!--c-->"] {
        let partial = snapshot(cut);
        assert_eq!(partial, full[..partial.len()], "prefix {cut:?}");
    }
}
