//! Headless replay: bootstrap the page, apply scripted clicks and drags,
//! and write the resulting document.

use crate::{
    bootstrap::{self, Boot},
    config::SiteConfig,
    desktop::{Gesture, MainView, Outcome},
    log,
};
use anyhow::{Context, Result};
use std::{fs, io::Write, path::Path};

/// Replay `clicks` at the configured viewport width.
///
/// The page goes to `out`, or stdout when `None`. Output is not minified.
pub fn snapshot_site(config: &SiteConfig, clicks: &[String], out: Option<&Path>) -> Result<()> {
    let gestures = clicks
        .iter()
        .map(|click| click.parse::<Gesture>())
        .collect::<Result<Vec<_>, _>>()?;

    let shell = bootstrap::read_shell(&config.build)?;
    let viewport = config.desktop.viewport_width;
    let boot = bootstrap::bootstrap(&shell, config, viewport)
        .with_context(|| format!("Page shell is not valid HTML: {}", config.build.shell.display()))?;

    let (html, failure) = match boot {
        Boot::Ready(mut session) => {
            log!("snapshot"; "viewport {viewport}px, {:?} layout", session.desktop.layout());
            for (click, gesture) in clicks.iter().zip(&gestures) {
                let outcome = session.perform(gesture);
                log!("snapshot"; "{click}: {}", describe(outcome));
            }
            log_state(session.desktop.view(), session.desktop.windows().topmost());
            (session.document.to_html(), None)
        }
        Boot::Failed { document, error } => (document.to_html(), Some(error)),
    };

    match out {
        Some(path) => fs::write(path, &html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(html.as_bytes())
            .context("Failed to write snapshot to stdout")?,
    }

    match failure {
        Some(error) => Err(anyhow::Error::new(error).context("Failed to load content")),
        None => Ok(()),
    }
}

fn describe(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Ignored => "no effect",
        Outcome::Changed => "applied",
        Outcome::ScrolledToTop => "applied, scrolled to top",
    }
}

fn log_state(view: &MainView, topmost: Option<&str>) {
    match view {
        MainView::Desktop => log!("snapshot"; "desktop, top window: {}", topmost.unwrap_or("none")),
        MainView::ProjectDetail(id) => log!("snapshot"; "project detail: {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::SAMPLE_JSON;
    use crate::dom::Document;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("site-data.json"), SAMPLE_JSON).unwrap();
        let mut config = SiteConfig::default();
        config.build.data = dir
            .path()
            .join("site-data.json")
            .to_string_lossy()
            .into_owned();
        config.build.shell = dir.path().join("index.html");
        (dir, config)
    }

    fn snapshot(config: &SiteConfig, dir: &TempDir, clicks: &[&str]) -> Document {
        let out = dir.path().join("snapshot.html");
        let clicks: Vec<String> = clicks.iter().map(|c| c.to_string()).collect();
        snapshot_site(config, &clicks, Some(&out)).unwrap();
        Document::parse(&fs::read_to_string(out).unwrap()).unwrap()
    }

    fn display(doc: &Document, id: &str) -> Option<String> {
        doc.style(doc.get_element_by_id(id).unwrap(), "display")
    }

    #[test]
    fn test_snapshot_replays_clicks() {
        let (dir, config) = site();
        let doc = snapshot(&config, &dir, &["window:contact", "drag:contact:40,20"]);

        let contact = doc.get_element_by_id("contact").unwrap();
        assert_eq!(display(&doc, "contact").as_deref(), Some("block"));
        assert_eq!(doc.style(contact, "z-index").as_deref(), Some("12"));
        assert_eq!(
            doc.style(contact, "transform").as_deref(),
            Some("translate(40px, 20px)")
        );
    }

    #[test]
    fn test_snapshot_project_and_back() {
        let (dir, config) = site();
        let doc = snapshot(&config, &dir, &["project:proj1"]);
        assert_eq!(display(&doc, "desktop-view").as_deref(), Some("none"));
        assert_eq!(display(&doc, "proj1").as_deref(), Some("block"));
        assert_eq!(display(&doc, "proj3").as_deref(), Some("none"));

        let doc = snapshot(&config, &dir, &["project:proj1", "back"]);
        assert_eq!(display(&doc, "desktop-view").as_deref(), Some("block"));
        assert_eq!(display(&doc, "project-view").as_deref(), Some("none"));
    }

    #[test]
    fn test_snapshot_narrow_viewport() {
        let (dir, mut config) = site();
        config.desktop.viewport_width = 800;
        let doc = snapshot(&config, &dir, &["window:about"]);
        assert_eq!(display(&doc, "about").as_deref(), Some("none"));
    }

    #[test]
    fn test_invalid_click_fails_early() {
        let (dir, config) = site();
        let out = dir.path().join("snapshot.html");
        let err = snapshot_site(&config, &["jump:about".to_string()], Some(&out)).unwrap_err();
        assert!(err.to_string().contains("jump:about"));
        assert!(!out.exists());
    }

    #[test]
    fn test_failed_content_still_writes_page() {
        let (dir, config) = site();
        fs::remove_file(dir.path().join("site-data.json")).unwrap();
        let out = dir.path().join("snapshot.html");
        assert!(snapshot_site(&config, &[], Some(&out)).is_err());
        let html = fs::read_to_string(out).unwrap();
        assert!(html.contains("Erro ao carregar conteúdo. Verifique o console."));
    }
}
