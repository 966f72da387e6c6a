//! In-memory page document.
//!
//! A small arena-backed HTML tree that stands in for the browser DOM: the
//! renderer writes into it, the desktop session toggles visibility and
//! stacking on it, and the result is serialized back to HTML.
//!
//! ```text
//!   shell.html ──parse──▶ Document ──render::apply──▶ Document ──Desktop::sync──▶ to_html()
//! ```
//!
//! Lookups that miss return `None`; callers treat a missing element as
//! something to skip, never as an error.

mod parse;
mod serialize;

use quick_xml::escape::{escape, unescape};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("malformed markup at byte {position}: {message}")]
    Parse { position: u64, message: String },
}

/// Index of a node in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The document node every parsed tree hangs from.
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    /// Attribute values as they appear in markup (escaped).
    attrs: Vec<(String, String)>,
    self_closing: bool,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(ElementData),
    /// Markup-ready text.
    Text(String),
    /// Doctype, comments and fragments that did not parse.
    Raw(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    fn empty() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse a full page.
    pub fn parse(html: &str) -> Result<Self, DomError> {
        let mut doc = Self::empty();
        parse::parse_into(&mut doc, NodeId::ROOT, html)?;
        Ok(doc)
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Attached nodes below `node` in document order, `node` excluded.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    /// Attribute value, unescaped.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<Cow<'_, str>> {
        let (_, raw) = self.element(node)?.attrs.iter().find(|(k, _)| k == name)?;
        Some(unescape(raw).unwrap_or(Cow::Borrowed(raw.as_str())))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(NodeId::ROOT)
            .into_iter()
            .find(|&n| self.attr(n, "id").is_some_and(|v| v == id))
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(NodeId::ROOT)
            .into_iter()
            .filter(|&n| self.tag(n) == Some(tag))
            .collect()
    }

    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.elements_by_class_in(NodeId::ROOT, class)
    }

    pub fn elements_by_class_in(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// `node` itself or its nearest ancestor carrying `class`.
    pub fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.has_class(id, class) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    pub fn body(&self) -> Option<NodeId> {
        self.elements_by_tag("body").into_iter().next()
    }

    /// Concatenated text below `node`, as markup.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|n| match &self.nodes[n.0].kind {
                NodeKind::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Set an attribute; `value` is escaped.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let value = escape(value).into_owned();
        match element.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => element.attrs.push((name.to_string(), value)),
        }
    }

    /// Inline style property, e.g. `display`.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let style = self.attr(node, "style")?;
        parse_style(&style)
            .into_iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v)
    }

    /// Set one inline style property, keeping the others in place.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let mut declarations = self
            .attr(node, "style")
            .map(|s| parse_style(&s))
            .unwrap_or_default();
        match declarations.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        let style = declarations
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr(node, "style", &style);
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace the children of `node` with plain text (escaped).
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        self.append(node, NodeKind::Text(escape(text).into_owned()));
    }

    /// Replace the children of `node` with parsed markup.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        self.clear_children(node);
        self.append_html(node, html)
    }

    /// Append parsed markup to `node`.
    ///
    /// Markup that does not parse is still appended, verbatim and opaque;
    /// the parse error is returned so the caller can report it.
    pub fn append_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        parse::parse_into(self, node, html).inspect_err(|_| {
            self.append(node, NodeKind::Raw(html.to_string()));
        })
    }

    /// Set the page `<title>`, creating it inside `<head>` when missing.
    pub fn set_title(&mut self, title: &str) {
        let existing = self.elements_by_tag("title").into_iter().next();
        let node = match existing {
            Some(node) => node,
            None => {
                let Some(head) = self.elements_by_tag("head").into_iter().next() else {
                    return;
                };
                self.append(
                    head,
                    NodeKind::Element(ElementData {
                        tag: "title".into(),
                        attrs: Vec::new(),
                        self_closing: false,
                    }),
                )
            }
        };
        self.set_text(node, title);
    }

    /// Replace the whole page body. Without a `<body>` the document content
    /// itself is replaced.
    pub fn replace_body(&mut self, html: &str) -> Result<(), DomError> {
        let target = self.body().unwrap_or(NodeId::ROOT);
        self.set_inner_html(target, html)
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize::write_children(self, NodeId::ROOT, &mut out);
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        serialize::write_children(self, node, &mut out);
        out
    }

    #[cfg(test)]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        serialize::write_node(self, node, &mut out);
        out
    }
}

/// `a: b; c: d` → `[("a", "b"), ("c", "d")]`
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim();
            (!k.is_empty()).then(|| (k.to_ascii_lowercase(), v.trim().to_string()))
        })
        .collect()
}
