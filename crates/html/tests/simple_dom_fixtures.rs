use html::build;
use html::debug::dump_dom;
use html_test_support::diff_lines;
use html_test_support::fixtures::{expected_lines, fixture_path, load_cases};
use serde::Deserialize;

#[derive(Deserialize)]
struct DomCase {
    name: String,
    input: String,
    strict: bool,
    /// `None` when the build is expected to fail.
    dump: Option<String>,
}

#[test]
fn simple_dom_fixtures_match_dumps() {
    let path = fixture_path(env!("CARGO_MANIFEST_DIR"), "simple_dom.json");
    let cases: Vec<DomCase> = load_cases(&path);
    for case in &cases {
        let dom = build(&case.input, case.strict);
        match (&case.dump, dom) {
            (Some(expected), Some(dom)) => {
                let expected = expected_lines(expected);
                let actual = expected_lines(&dump_dom(&dom));
                assert!(
                    expected == actual,
                    "{}:\n{}",
                    case.name,
                    diff_lines(&expected, &actual)
                );
            }
            (None, None) => {}
            (Some(_), None) => panic!("{}: build failed", case.name),
            (None, Some(dom)) => panic!("{}: unexpected tree\n{}", case.name, dump_dom(&dom)),
        }
    }
}
