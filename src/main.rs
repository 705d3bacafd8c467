//! `livedom` command line: dump the SimpleDOM of a file, or rank candidate
//! strings read from stdin against a query.

use html::{Builder, BuilderConfig, debug::dump_dom};
use mimalloc::MiMalloc;
use std::error::Error;
use std::io::{self, BufRead, Write};
use string_match::{MatchOptions, SearchResult, StringMatcher, basic_match_sort};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage:
  livedom dom <file> [--strict]
  livedom match <query> [--segmented] [--prefix]   (candidates on stdin)";

enum Command {
    Dom { path: String, strict: bool },
    Match { query: String, options: MatchOptions },
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let command = args.next().ok_or(USAGE)?;
    let target = args.next().ok_or(USAGE)?;
    let flags: Vec<String> = args.collect();
    let has = |flag: &str| flags.iter().any(|f| f == flag);

    let known: &[&str] = match command.as_str() {
        "dom" => &["--strict"],
        "match" => &["--segmented", "--prefix"],
        _ => return Err(format!("unknown command {command:?}\n{USAGE}")),
    };
    if let Some(flag) = flags.iter().find(|f| !known.contains(&f.as_str())) {
        return Err(format!("unknown flag {flag:?} for {command}\n{USAGE}"));
    }

    Ok(match command.as_str() {
        "dom" => Command::Dom {
            path: target,
            strict: has("--strict"),
        },
        _ => Command::Match {
            query: target,
            options: MatchOptions {
                prefer_prefix_matches: has("--prefix"),
                segmented_search: has("--segmented"),
            },
        },
    })
}

fn run_dom(path: &str, strict: bool) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let mut builder = Builder::new(&text, BuilderConfig::default());
    let dom = builder.build(strict);
    log::info!(
        "built {path}: {} errors, tree {}",
        builder.errors().len(),
        if dom.is_some() { "kept" } else { "dropped" }
    );

    let mut out = io::stdout().lock();
    if let Some(dom) = &dom {
        out.write_all(dump_dom(dom).as_bytes())?;
    }
    for error in builder.errors() {
        writeln!(out, "error: {error}")?;
    }
    Ok(())
}

fn run_match(query: &str, options: MatchOptions) -> Result<(), Box<dyn Error>> {
    let mut matcher = StringMatcher::new(options);
    let mut results: Vec<SearchResult> = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let candidate = line.trim_end();
        if candidate.is_empty() {
            continue;
        }
        if let Some(result) = matcher.match_str(candidate, query) {
            results.push(result);
        }
    }
    basic_match_sort(&mut results);
    log::debug!("{} candidates matched {query:?}", results.len());

    let mut out = io::stdout().lock();
    for result in &results {
        let highlighted: String = result
            .string_ranges
            .iter()
            .map(|range| {
                if range.matched {
                    format!("[{}]", range.text)
                } else {
                    range.text.clone()
                }
            })
            .collect();
        writeln!(out, "{:>12.2} {highlighted}", result.match_goodness)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match parse_args(std::env::args().skip(1))? {
        Command::Dom { path, strict } => run_dom(&path, strict),
        Command::Match { query, options } => run_match(&query, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_commands() {
        match parse_args(args(&["dom", "page.html", "--strict"])) {
            Ok(Command::Dom { path, strict }) => {
                assert_eq!(path, "page.html");
                assert!(strict);
            }
            _ => panic!("expected dom command"),
        }
        match parse_args(args(&["match", "qo", "--segmented"])) {
            Ok(Command::Match { query, options }) => {
                assert_eq!(query, "qo");
                assert!(options.segmented_search);
                assert!(!options.prefer_prefix_matches);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["dom"])).is_err());
        assert!(parse_args(args(&["dom", "a.html", "--prefix"])).is_err());
        assert!(parse_args(args(&["render", "a.html"])).is_err());
    }
}
