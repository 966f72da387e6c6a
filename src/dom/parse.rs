//! Lenient HTML parsing on top of quick-xml events.
//!
//! Void elements never take children, `script`/`style` bodies are kept as
//! raw text and end tags that match nothing open are dropped.

use super::{Document, DomError, ElementData, NodeId, NodeKind};
use quick_xml::{Reader, events::Event};

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose body is raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(super) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[inline]
fn create_html_reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

fn element_data(elem: &quick_xml::events::BytesStart<'_>, self_closing: bool) -> ElementData {
    let tag = String::from_utf8_lossy(elem.name().as_ref()).to_ascii_lowercase();
    let attrs = elem
        .html_attributes()
        .flatten()
        .map(|attr| {
            (
                String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            )
        })
        .collect();
    ElementData {
        tag,
        attrs,
        self_closing,
    }
}

/// Parse `html` and append the resulting nodes to `parent`.
///
/// On error the children added so far are rolled back and `parent` is left
/// as it was.
pub(super) fn parse_into(doc: &mut Document, parent: NodeId, html: &str) -> Result<(), DomError> {
    let rollback_len = doc.nodes[parent.0].children.len();
    parse_events(doc, parent, html).inspect_err(|_| {
        doc.nodes[parent.0].children.truncate(rollback_len);
    })
}

fn parse_events(doc: &mut Document, parent: NodeId, html: &str) -> Result<(), DomError> {
    let mut reader = create_html_reader(html);
    let mut stack = vec![parent];

    loop {
        let top = *stack.last().unwrap_or(&parent);
        let event = reader.read_event().map_err(|e| DomError::Parse {
            position: reader.error_position(),
            message: e.to_string(),
        })?;

        match event {
            Event::Start(elem) => {
                let data = element_data(&elem, false);
                let tag = data.tag.clone();
                let node = doc.append(top, NodeKind::Element(data));

                if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    let span = reader.read_to_end(elem.name()).map_err(|e| DomError::Parse {
                        position: reader.error_position(),
                        message: e.to_string(),
                    })?;
                    let body = html.get(span.start as usize..span.end as usize).unwrap_or("");
                    if !body.is_empty() {
                        doc.append(node, NodeKind::Text(body.to_string()));
                    }
                } else if !is_void(&tag) {
                    stack.push(node);
                }
            }
            Event::Empty(elem) => {
                doc.append(top, NodeKind::Element(element_data(&elem, true)));
            }
            Event::End(elem) => {
                let name = String::from_utf8_lossy(elem.name().as_ref()).to_ascii_lowercase();
                // stack[0] is the insertion point and is never closed here
                if let Some(pos) = stack
                    .iter()
                    .skip(1)
                    .rposition(|&id| doc.tag(id) == Some(name.as_str()))
                {
                    stack.truncate(pos + 1);
                }
            }
            Event::Text(text) => {
                doc.append(top, NodeKind::Text(String::from_utf8_lossy(&text).into_owned()));
            }
            Event::GeneralRef(entity) => {
                let entity = String::from_utf8_lossy(&entity);
                doc.append(top, NodeKind::Text(format!("&{entity};")));
            }
            Event::CData(data) => {
                let data = String::from_utf8_lossy(&data);
                doc.append(top, NodeKind::Raw(format!("<![CDATA[{data}]]>")));
            }
            Event::Comment(comment) => {
                let comment = String::from_utf8_lossy(&comment);
                doc.append(top, NodeKind::Raw(format!("<!--{comment}-->")));
            }
            Event::DocType(doctype) => {
                let doctype = String::from_utf8_lossy(&doctype);
                doc.append(top, NodeKind::Raw(format!("<!DOCTYPE {}>", doctype.trim())));
            }
            Event::Eof => break,
            // XML declarations and processing instructions have no place in HTML
            _ => {}
        }
    }

    Ok(())
}
