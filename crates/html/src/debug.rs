use crate::simple_dom::{NodeIndex, NodeKind, SimpleDom};
use std::fmt::Write;

const INDENT_STEP: &str = "  ";

/// One line per reachable node, children indented under their parent:
/// `TAG <id> <tag> name="value" ...` for elements and `TEXT <id> <content>`
/// for text, with newlines in text shown as `\n`.
pub fn dump_dom(dom: &SimpleDom) -> String {
    struct IndentGuard<'a> {
        indent: &'a mut String,
        step: usize,
    }

    impl Drop for IndentGuard<'_> {
        fn drop(&mut self) {
            let new_len = self.indent.len() - self.step;
            self.indent.truncate(new_len);
        }
    }

    fn walk(dom: &SimpleDom, index: NodeIndex, indent: &mut String, out: &mut String) {
        let Some(node) = dom.node(index) else {
            return;
        };
        match &node.kind {
            NodeKind::Element(element) => {
                out.push_str(indent);
                let _ = write!(out, "TAG {} {}", element.tag_id, element.tag);
                for (name, value) in element.attributes.iter() {
                    let _ = write!(out, r#" {name}="{value}""#);
                }
                out.push('\n');
                indent.push_str(INDENT_STEP);
                let guard = IndentGuard {
                    indent,
                    step: INDENT_STEP.len(),
                };
                for &child in &element.children {
                    walk(dom, child, guard.indent, out);
                }
            }
            NodeKind::Text(text) => {
                out.push_str(indent);
                out.push_str("TEXT ");
                out.push_str(&text.text_id);
                out.push(' ');
                push_escaped(out, &text.content);
                out.push('\n');
            }
        }
    }

    let mut out = String::new();
    let mut indent = String::new();
    walk(dom, dom.root_index(), &mut indent, &mut out);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
}
