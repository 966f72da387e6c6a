//! Small markup builders shared by the page sections.

use quick_xml::escape::escape;
use std::borrow::Cow;

/// How content text is written into markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Markup {
    /// Escape text fields instead of inserting them as markup.
    pub escape_text: bool,
}

impl Markup {
    /// A text field of the content file.
    ///
    /// Trusted text keeps its markup; only a bare `&` that starts no
    /// character reference is escaped, so the result always parses.
    pub fn text<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.escape_text {
            escape(s)
        } else {
            escape_bare_ampersands(s)
        }
    }

    /// `<p>` per paragraph, in order.
    pub fn paragraphs(&self, paragraphs: &[String]) -> String {
        paragraphs
            .iter()
            .map(|p| format!("<p>{}</p>", self.text(p)))
            .collect()
    }

    /// `<tag>item</tag>` per item, in order.
    pub fn each(&self, tag: &str, items: &[String]) -> String {
        items
            .iter()
            .map(|item| format!("<{tag}>{}</{tag}>", self.text(item)))
            .collect()
    }

    /// External link opening in a new tab.
    pub fn neon_link(&self, url: &str, text: &str) -> String {
        format!(
            r#"<a href="{}" target="_blank" class="neon-link">{}</a>"#,
            attr(url),
            self.text(text)
        )
    }
}

/// `&` not followed by `name;`, `#123;` or `#x1f;` becomes `&amp;`.
fn escape_bare_ampersands(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for (i, part) in s.split('&').enumerate() {
        if i > 0 {
            out.push_str(if starts_with_reference(part) { "&" } else { "&amp;" });
        }
        out.push_str(part);
    }
    Cow::Owned(out)
}

/// Whether `rest` (the text after an `&`) opens a character reference.
fn starts_with_reference(rest: &str) -> bool {
    let Some((name, _)) = rest.split_once(';') else {
        return false;
    };
    match name.strip_prefix('#') {
        Some(hex) if hex.starts_with(['x', 'X']) => {
            hex.len() > 1 && hex[1..].chars().all(|c| c.is_ascii_hexdigit())
        }
        Some(dec) => !dec.is_empty() && dec.chars().all(|c| c.is_ascii_digit()),
        None => {
            name.starts_with(|c: char| c.is_ascii_alphabetic())
                && name.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}

/// Attribute values are escaped regardless of `escape_text`.
pub fn attr(value: &str) -> Cow<'_, str> {
    escape(value)
}

/// Space-separated class list, skipping empty entries.
pub fn class_list<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes
        .into_iter()
        .filter(|c| !c.is_empty())
        .map(|c| attr(c).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passthrough_and_escape() {
        let trusted = Markup::default();
        let escaped = Markup { escape_text: true };
        assert_eq!(trusted.text("<em>Rust</em>"), "<em>Rust</em>");
        assert_eq!(escaped.text("<em>Rust</em>"), "&lt;em&gt;Rust&lt;/em&gt;");
    }

    #[test]
    fn test_bare_ampersand_is_escaped_in_trusted_text() {
        let m = Markup::default();
        assert_eq!(m.text("P&D"), "P&amp;D");
        assert_eq!(m.text("Pesquisa & Desenvolvimento"), "Pesquisa &amp; Desenvolvimento");
        assert_eq!(m.text("a && b; c"), "a &amp;&amp; b; c");
        assert_eq!(m.text("caf&eacute; &amp; &#233; &#xE9;"), "caf&eacute; &amp; &#233; &#xE9;");
        assert_eq!(m.text("&#; &#x; &;"), "&amp;#; &amp;#x; &amp;;");
        assert!(matches!(m.text("sem e comercial"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_paragraphs_preserve_order() {
        let m = Markup::default();
        let paragraphs = vec!["um".to_string(), "dois".to_string()];
        assert_eq!(m.paragraphs(&paragraphs), "<p>um</p><p>dois</p>");
        assert_eq!(m.paragraphs(&[]), "");
    }

    #[test]
    fn test_neon_link_escapes_url() {
        let m = Markup::default();
        assert_eq!(
            m.neon_link("https://x.dev/?a=1&b=2", "Demo"),
            r#"<a href="https://x.dev/?a=1&amp;b=2" target="_blank" class="neon-link">Demo</a>"#
        );
    }

    #[test]
    fn test_class_list() {
        assert_eq!(class_list(["gallery-item", "wide"]), "gallery-item wide");
        assert_eq!(class_list(["gallery-item", ""]), "gallery-item");
    }
}
