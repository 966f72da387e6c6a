//! HTML minification for the rendered page.

use crate::config::BuildConfig;
use std::borrow::Cow;

/// Minify the page if `build.minify` is enabled.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify_page<'a>(html: &'a [u8], build: &BuildConfig) -> Cow<'a, [u8]> {
    if build.minify {
        Cow::Owned(minify_html_inner(html))
    } else {
        Cow::Borrowed(html)
    }
}

/// Minify HTML content using `minify_html` crate.
///
/// Closing tags and `<html>`/`<head>` openers are kept so the page shell's
/// structure survives for scripts that query it.
fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_with_minify(enabled: bool) -> BuildConfig {
        BuildConfig {
            minify: enabled,
            ..BuildConfig::default()
        }
    }

    #[test]
    fn test_minify_page_removes_whitespace() {
        let html = b"<html>\n  <body>\n    <ul id=\"nav-container\">\n      <li>Sobre</li>\n    </ul>\n  </body>\n</html>";
        let result = minify_page(html, &build_with_minify(true));
        let result_str = String::from_utf8_lossy(&result);

        assert!(!result_str.contains("\n  "));
        assert!(result_str.contains("<li>Sobre</li>"));
        assert!(result.len() < html.len());
    }

    #[test]
    fn test_minify_page_disabled_borrows() {
        let html = b"<html>\n  <body>\n  </body>\n</html>";
        let result = minify_page(html, &build_with_minify(false));

        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(&*result, html);
    }

    #[test]
    fn test_minify_page_keeps_data_attributes() {
        let html = br##"<a href="#" class="project-link" data-project-target="proj1">&gt; Proj One</a>"##;
        let result = minify_page(html, &build_with_minify(true));
        let result_str = String::from_utf8_lossy(&result);

        assert!(result_str.contains("proj1"));
        assert!(result_str.contains("Proj One"));
    }
}
