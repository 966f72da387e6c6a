//! Document → HTML text.

use super::{Document, NodeId, NodeKind, parse::is_void};
use std::fmt::Write;

pub(super) fn write_children(doc: &Document, node: NodeId, out: &mut String) {
    for &child in &doc.nodes[node.0].children {
        write_node(doc, child, out);
    }
}

pub(super) fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match &doc.nodes[node.0].kind {
        NodeKind::Document => write_children(doc, node, out),
        NodeKind::Text(text) | NodeKind::Raw(text) => out.push_str(text),
        NodeKind::Element(element) => {
            let children = &doc.nodes[node.0].children;

            out.push('<');
            out.push_str(&element.tag);
            for (key, value) in &element.attrs {
                write_attr(out, key, value);
            }

            if element.self_closing && children.is_empty() {
                out.push_str(" />");
                return;
            }
            out.push('>');
            if is_void(&element.tag) {
                return;
            }

            write_children(doc, node, out);
            let _ = write!(out, "</{}>", element.tag);
        }
    }
}

/// Values keep their source escaping; single-quoted source values that
/// contain `"` get it escaped here.
fn write_attr(out: &mut String, key: &str, value: &str) {
    let value = if value.contains('"') {
        value.replace('"', "&quot;")
    } else {
        value.to_string()
    };
    let _ = write!(out, r#" {key}="{value}""#);
}

#[cfg(test)]
mod tests {
    use super::super::Document;

    #[test]
    fn test_round_trip_preserves_markup() {
        let html = r##"<!DOCTYPE html><html><head><meta charset="utf-8"><link rel="stylesheet" href="style.css"></head><body><ul id="nav-container"><li><a href="#" class="nav-link" data-window-target="about">Sobre</a></li></ul><br /></body></html>"##;
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_single_quoted_value_with_double_quote() {
        let doc = Document::parse(r#"<img alt='say "hi"'>"#).unwrap();
        assert_eq!(doc.to_html(), r#"<img alt="say &quot;hi&quot;">"#);
    }

    #[test]
    fn test_serialize_is_stable() {
        let html = r#"<div class="window" id="about" style="display: block; z-index: 11"><p>a &amp; b</p></div>"#;
        let once = Document::parse(html).unwrap().to_html();
        let twice = Document::parse(&once).unwrap().to_html();
        assert_eq!(once, twice);
    }
}
