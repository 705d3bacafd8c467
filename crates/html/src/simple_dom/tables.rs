//! Static element tables used by the builder.

/// Open elements that a newly opened `tag` implicitly closes.
///
/// Only the innermost open element is checked, repeatedly, so `<li>` inside
/// `<li>` closes the outer item but `<li>` inside `<ul>` inside `<li>` does
/// not.
pub fn implicitly_closes(tag: &str) -> &'static [&'static str] {
    const P: &[&str] = &["p"];
    match tag {
        "li" => &["li"],
        "dt" | "dd" => &["dd", "dt"],
        "address" | "article" | "aside" | "blockquote" | "dir" | "div" | "dl" | "fieldset"
        | "footer" | "form" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "hgroup"
        | "hr" | "main" | "menu" | "nav" | "ol" | "p" | "pre" | "section" | "table" | "ul" => P,
        "rp" | "rt" => &["rp", "rt"],
        "optgroup" => &["optgroup", "option"],
        "option" => &["option"],
        "tbody" => &["thead", "tbody", "tfoot"],
        "tfoot" => &["tbody"],
        "tr" => &["tr", "th", "td"],
        "th" => &["th", "td"],
        "td" => &["thead", "th", "td"],
        "body" => &["head", "link", "script"],
        _ => &[],
    }
}

/// Elements that never have children or a close tag.
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "basefont"
            | "br"
            | "col"
            | "command"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "isindex"
            | "keygen"
            | "link"
            | "menuitem"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
