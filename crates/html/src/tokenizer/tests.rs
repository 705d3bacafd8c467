use super::{Token, TokenKind, Tokenizer, tokenize};
use crate::position::Pos;

fn tok(
    kind: TokenKind,
    contents: &str,
    start: usize,
    end: usize,
    start_pos: (usize, usize),
    end_pos: (usize, usize),
) -> Token<'_> {
    Token {
        kind,
        contents,
        start: Some(start),
        end,
        start_pos: Some(Pos::new(start_pos.0, start_pos.1)),
        end_pos: Pos::new(end_pos.0, end_pos.1),
    }
}

fn boundary(kind: TokenKind, end: usize, end_pos: (usize, usize)) -> Token<'static> {
    Token {
        kind,
        contents: "",
        start: None,
        end,
        start_pos: None,
        end_pos: Pos::new(end_pos.0, end_pos.1),
    }
}

fn kinds(text: &str) -> Vec<(TokenKind, &str)> {
    tokenize(text)
        .into_iter()
        .map(|t| (t.kind, t.contents))
        .collect()
}

fn has_error(text: &str) -> bool {
    tokenize(text).iter().any(|t| t.kind == TokenKind::Error)
}

#[test]
fn tags_and_text() {
    let mut t = Tokenizer::new("<html>\n<body>Hello</body>\n</html>");
    assert_eq!(t.next_token(), Some(tok(TokenKind::OpenTagName, "html", 1, 5, (0, 1), (0, 5))));
    assert_eq!(t.next_token(), Some(boundary(TokenKind::OpenTagEnd, 6, (0, 6))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::Text, "\n", 6, 7, (0, 6), (1, 0))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::OpenTagName, "body", 8, 12, (1, 1), (1, 5))));
    assert_eq!(t.next_token(), Some(boundary(TokenKind::OpenTagEnd, 13, (1, 6))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::Text, "Hello", 13, 18, (1, 6), (1, 11))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::CloseTag, "body", 20, 24, (1, 13), (1, 17))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::Text, "\n", 25, 26, (1, 18), (2, 0))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::CloseTag, "html", 28, 32, (2, 2), (2, 6))));
    assert_eq!(t.next_token(), None);
    assert_eq!(t.next_token(), None);
}

#[test]
fn attributes() {
    let mut t = Tokenizer::new("<div class='foo bar' style=\"baz: quux\" checked></div>");
    assert_eq!(t.next_token(), Some(tok(TokenKind::OpenTagName, "div", 1, 4, (0, 1), (0, 4))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::AttribName, "class", 5, 10, (0, 5), (0, 10))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::AttribValue, "foo bar", 12, 19, (0, 12), (0, 19))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::AttribName, "style", 21, 26, (0, 21), (0, 26))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::AttribValue, "baz: quux", 28, 37, (0, 28), (0, 37))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::AttribName, "checked", 39, 46, (0, 39), (0, 46))));
    assert_eq!(t.next_token(), Some(boundary(TokenKind::OpenTagEnd, 47, (0, 47))));
    assert_eq!(t.next_token(), Some(tok(TokenKind::CloseTag, "div", 49, 52, (0, 49), (0, 52))));
    assert_eq!(t.next_token(), None);
}

#[test]
fn newlines_inside_tags_text_and_comments() {
    let text = "<div \n    class='foo'\n    checked>\n    some text\n    with a newline\n    <br/>\n<!--multiline\ncomment-->\n</div>";
    let tokens = tokenize(text);
    let expected = vec![
        tok(TokenKind::OpenTagName, "div", 1, 4, (0, 1), (0, 4)),
        tok(TokenKind::AttribName, "class", 10, 15, (1, 4), (1, 9)),
        tok(TokenKind::AttribValue, "foo", 17, 20, (1, 11), (1, 14)),
        tok(TokenKind::AttribName, "checked", 26, 33, (2, 4), (2, 11)),
        boundary(TokenKind::OpenTagEnd, 34, (2, 12)),
        tok(
            TokenKind::Text,
            "\n    some text\n    with a newline\n    ",
            34,
            72,
            (2, 12),
            (5, 4),
        ),
        tok(TokenKind::OpenTagName, "br", 73, 75, (5, 5), (5, 7)),
        boundary(TokenKind::SelfClosingTag, 77, (5, 9)),
        tok(TokenKind::Text, "\n", 77, 78, (5, 9), (6, 0)),
        tok(TokenKind::Comment, "multiline\ncomment", 82, 99, (6, 4), (7, 7)),
        tok(TokenKind::Text, "\n", 102, 103, (7, 10), (8, 0)),
        tok(TokenKind::CloseTag, "div", 105, 108, (8, 2), (8, 5)),
    ];
    assert_eq!(tokens, expected);
}

#[test]
fn explicit_short_tags() {
    let tokens = tokenize("<p>hello<br/></p>");
    assert_eq!(
        tokens,
        vec![
            tok(TokenKind::OpenTagName, "p", 1, 2, (0, 1), (0, 2)),
            boundary(TokenKind::OpenTagEnd, 3, (0, 3)),
            tok(TokenKind::Text, "hello", 3, 8, (0, 3), (0, 8)),
            tok(TokenKind::OpenTagName, "br", 9, 11, (0, 9), (0, 11)),
            boundary(TokenKind::SelfClosingTag, 13, (0, 13)),
            tok(TokenKind::CloseTag, "p", 15, 16, (0, 15), (0, 16)),
        ]
    );
}

#[test]
fn comment() {
    let tokens = tokenize("<!--very important-->");
    assert_eq!(
        tokens,
        vec![tok(TokenKind::Comment, "very important", 4, 18, (0, 4), (0, 18))]
    );
}

#[test]
fn comment_with_extra_dashes() {
    assert_eq!(
        kinds("<!-- a - b -- c --->"),
        vec![(TokenKind::Comment, " a - b -- c -")]
    );
}

#[test]
fn cdata_declaration_and_processing_instruction() {
    assert_eq!(
        kinds("<!DOCTYPE html><?xml version=\"1.0\"?><![CDATA[a]]b]]]>"),
        vec![
            (TokenKind::Declaration, "DOCTYPE html"),
            (TokenKind::ProcessingInstruction, "xml version=\"1.0\"?"),
            (TokenKind::CData, "a]]b]"),
        ]
    );
}

#[test]
fn malformed_cdata_falls_back_to_declaration() {
    assert_eq!(kinds("<![CDAT x>"), vec![(TokenKind::Declaration, "[CDAT x")]);
    assert_eq!(kinds("<!-x>"), vec![(TokenKind::Declaration, "-x")]);
}

#[test]
fn script_body_is_raw_text() {
    assert_eq!(
        kinds("<script>if (a<b) { x = '</div>'; }</script>"),
        vec![
            (TokenKind::OpenTagName, "script"),
            (TokenKind::OpenTagEnd, ""),
            (TokenKind::Text, "if (a"),
            (TokenKind::Text, "<b) { x = '"),
            (TokenKind::Text, "</div>'; }"),
            (TokenKind::CloseTag, "script"),
        ]
    );
}

#[test]
fn style_close_tag_is_case_insensitive_and_positions_name() {
    let tokens = tokenize("<STYLE type=x>a{}</StYlE >");
    let close = tokens
        .iter()
        .find(|t| t.kind == TokenKind::CloseTag)
        .copied();
    assert_eq!(close, Some(tok(TokenKind::CloseTag, "StYlE", 19, 24, (0, 19), (0, 24))));
}

#[test]
fn raw_text_only_ends_at_matching_tag() {
    assert_eq!(
        kinds("<style>a</script>b</style>"),
        vec![
            (TokenKind::OpenTagName, "style"),
            (TokenKind::OpenTagEnd, ""),
            (TokenKind::Text, "a"),
            (TokenKind::Text, "</script>b"),
            (TokenKind::CloseTag, "style"),
        ]
    );
}

#[test]
fn tag_names_starting_with_s_are_not_raw_text() {
    assert_eq!(
        kinds("<span><scripts>x<b></b></scripts></span>"),
        vec![
            (TokenKind::OpenTagName, "span"),
            (TokenKind::OpenTagEnd, ""),
            (TokenKind::OpenTagName, "scripts"),
            (TokenKind::OpenTagEnd, ""),
            (TokenKind::Text, "x"),
            (TokenKind::OpenTagName, "b"),
            (TokenKind::OpenTagEnd, ""),
            (TokenKind::CloseTag, "b"),
            (TokenKind::CloseTag, "scripts"),
            (TokenKind::CloseTag, "span"),
        ]
    );
}

#[test]
fn trailing_text_is_emitted_at_end_of_input() {
    assert_eq!(
        kinds("<p>hi</p>\ntail"),
        vec![
            (TokenKind::OpenTagName, "p"),
            (TokenKind::OpenTagEnd, ""),
            (TokenKind::Text, "hi"),
            (TokenKind::CloseTag, "p"),
            (TokenKind::Text, "\ntail"),
        ]
    );
}

#[test]
fn lone_angle_bracket_before_gt_is_text() {
    assert_eq!(kinds("a<>b"), vec![(TokenKind::Text, "a"), (TokenKind::Text, "<>b")]);
}

#[test]
fn non_ascii_text_counts_columns_in_characters() {
    let tokens = tokenize("<p>héllo</p>");
    let close = tokens[3];
    assert_eq!(close.kind, TokenKind::CloseTag);
    assert_eq!(close.start, Some(11));
    assert_eq!(close.start_pos, Some(Pos::new(0, 10)));
}

/// Puts the markup each token stands for back around its contents. Inputs
/// must use single spaces between attributes and no whitespace inside close
/// tags, since the tokenizer does not report it.
fn rebuild(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in tokenize(text) {
        let contents = token.contents;
        match token.kind {
            TokenKind::Text => out.push_str(contents),
            TokenKind::OpenTagName => {
                out.push('<');
                out.push_str(contents);
            }
            TokenKind::AttribName => {
                out.push(' ');
                out.push_str(contents);
            }
            TokenKind::AttribValue => {
                let start = token.start.expect("value has a start");
                let quote = match text.as_bytes()[start - 1] {
                    q @ (b'"' | b'\'') => Some(q as char),
                    _ => None,
                };
                out.push('=');
                out.extend(quote);
                out.push_str(contents);
                out.extend(quote);
            }
            TokenKind::OpenTagEnd => out.push('>'),
            TokenKind::SelfClosingTag => out.push_str("/>"),
            TokenKind::CloseTag => {
                out.push_str("</");
                out.push_str(contents);
                out.push('>');
            }
            TokenKind::Comment => {
                out.push_str("<!--");
                out.push_str(contents);
                out.push_str("-->");
            }
            TokenKind::CData => {
                out.push_str("<![CDATA[");
                out.push_str(contents);
                out.push_str("]]>");
            }
            TokenKind::Declaration => {
                out.push_str("<!");
                out.push_str(contents);
                out.push('>');
            }
            TokenKind::ProcessingInstruction => {
                out.push_str("<?");
                out.push_str(contents);
                out.push('>');
            }
            TokenKind::Error => panic!("unexpected error token in {text:?}"),
        }
    }
    out
}

#[test]
fn tokens_and_delimiters_rebuild_the_input() {
    for text in [
        "<div class=\"a b\" id='x' data-n=7 hidden>text</div>",
        "<!--c - d--><![CDATA[x]]y]]><!DOCTYPE html><?xml v=\"1\"?>",
        "<script>if (a<b) { s = '</div>'; }</script><style>p{}</style>",
        "<p>héllo wörld ✓<br/><svg/><img src=\"x\"/></p>trailing",
        "a<>b <i>x</i>\nend",
        "<ul>\n<li>one\n<li>two\n</ul>",
        "<STYLE type=x>a</b>{}</STYLE><Script>1</Script>",
    ] {
        assert_eq!(rebuild(text), text);
    }
}

#[test]
fn accepts_mixed_attribute_styles() {
    assert!(!has_error("<!--a comment-->"));
    assert!(!has_error(
        "<goodtag goodname=goodvalue goodname='goodvalue' goodname=\"goodvalue\" goodemptyname attrwithspace = attrval></goodtag>"
    ));
    assert!(!has_error("<goodtag goodname=\"goodvalue\"></goodtag>"));
    assert!(!has_error("<goodtag goodname=\"goodvalue\" ></goodtag>"));
    assert!(!has_error("<goodtag goodname=goodvalue ></goodtag>"));
    assert!(!has_error("<custom-tag data-x=1></custom-tag>"));
}

#[test]
fn rejects_malformed_markup() {
    for text in [
        "<<notatag>",
        "<not<atag>",
        "<tag <notattr>",
        "<tag not<attr>",
        "<tag attr=<notvalue>",
        "<tag attr=not<value>",
        "</<notatag>",
        "</not<atag>",
        "</tag <notattr>",
        "<tag attr=\"a\"attr2>",
        "<br/ >",
        "<tag attr='unterminated",
        "<div",
        "<!-- never closed",
    ] {
        assert!(has_error(text), "expected an error token for {text:?}");
    }
}

#[test]
fn error_is_last_token() {
    let mut t = Tokenizer::new("<p>x</p><tag not<attr>");
    let mut seen = Vec::new();
    while let Some(token) = t.next_token() {
        seen.push(token.kind);
    }
    assert_eq!(seen.last(), Some(&TokenKind::Error));
    assert_eq!(seen.iter().filter(|k| **k == TokenKind::Error).count(), 1);
    assert_eq!(t.next_token(), None);
}

#[test]
fn error_at_end_of_input_follows_queued_token() {
    let tokens = tokenize("<a href=x");
    let seen: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        seen,
        vec![TokenKind::OpenTagName, TokenKind::AttribName, TokenKind::Error]
    );
    let error = tokens[2];
    assert_eq!(error.start, None);
    assert_eq!(error.end, 9);
    assert_eq!(error.end_pos, Pos::new(0, 9));
}
