//! Fragment serialization.
//!
//! The parser always builds a full document; serializing the children of
//! `<head>` and `<body>` gives back just the fragment.

use std::sync::LazyLock;

use regex::Regex;

use super::arena::{Dom, NodeData, NodeId};

/// Elements that may never have content.
pub const VOID_ELEMENTS: &[&str] = &[
    "br", "hr", "input", "frame", "img", "area", "link", "col", "base", "basefont", "param",
    "meta",
];

/// Matches any self-closed tag, e.g. `<p class="x"/>`.
static SELF_CLOSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(\w+)([^>]*)\s*/>").unwrap());

/// Serialize the fragment held in `dom`, without document wrappers.
pub fn serialize_fragment(dom: &Dom) -> String {
    let mut out = String::new();
    for wrapper in ["head", "body"] {
        if let Some(id) = dom.find_by_tag(wrapper) {
            for child in dom.children(id) {
                write_node(dom, child, &mut out);
            }
        }
    }
    out
}

fn write_node(dom: &Dom, id: NodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
        }
        NodeData::Doctype => {}
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Text(text) => {
            let raw = node
                .parent
                .and_then(|p| dom.element_name(p))
                .is_some_and(|n| matches!(n.as_ref(), "script" | "style"));
            if raw {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        NodeData::Element { name, attrs } => {
            out.push('<');
            out.push_str(&name.local);
            for attr in attrs {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix);
                    out.push(':');
                }
                out.push_str(&attr.name.local);
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }
            if node.children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
            out.push_str("</");
            out.push_str(&name.local);
            out.push('>');
        }
    }
}

fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&#160;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&#160;"),
            _ => out.push(c),
        }
    }
}

/// Rewrite self-closed tags: void elements become `<tag attrs />`, everything
/// else is expanded to an explicit `<tag attrs></tag>` pair.
pub fn normalize_void_elements(html: &str) -> String {
    SELF_CLOSED_RE
        .replace_all(html, |caps: &regex::Captures<'_>| {
            let tag = &caps[1];
            let attrs = caps[2].trim_end();
            if VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str()) {
                format!("<{tag}{attrs} />")
            } else {
                format!("<{tag}{attrs}></{tag}>")
            }
        })
        .into_owned()
}
