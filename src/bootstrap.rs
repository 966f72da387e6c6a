//! Page bootstrap: content file → populated, wired page.
//!
//! ```text
//! shell ──parse──▶ Document
//!                     │
//!   load_site_data ───┼── Ok ──▶ render + apply ──▶ Desktop::start ──▶ footer year
//!                     │
//!                     └── Err ─▶ log `error` ──▶ body = fallback message
//! ```
//!
//! Loading failures never leave a half-rendered page: either every section
//! is rendered or the whole body is replaced.

use crate::{
    config::{BuildConfig, SiteConfig},
    content::{ContentError, ContentSource, load_site_data},
    desktop::{Desktop, Gesture, Outcome},
    dom::{Document, DomError},
    log,
    render::{self, Markup},
};
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use std::{borrow::Cow, error::Error, fs, time::Duration};

/// Page shell used when the configured shell file does not exist.
pub const DEFAULT_SHELL: &str = include_str!("embed/shell.html");

/// Body shown when the content file cannot be loaded.
pub const FALLBACK_BODY: &str = r#"<p style="color: white; text-align: center; font-size: 24px; padding-top: 50px;">Erro ao carregar conteúdo. Verifique o console.</p>"#;

/// A rendered page and its live desktop.
#[derive(Debug)]
pub struct Session {
    pub document: Document,
    pub desktop: Desktop,
}

impl Session {
    /// Replay one input and write the new state into the page.
    pub fn perform(&mut self, gesture: &Gesture) -> Outcome {
        let outcome = self.desktop.perform(&self.document, gesture);
        if outcome.changed() {
            self.desktop.sync(&mut self.document);
        }
        outcome
    }
}

#[derive(Debug)]
pub enum Boot {
    Ready(Session),
    /// The body holds only the fallback message.
    Failed {
        document: Document,
        error: ContentError,
    },
}

impl Boot {
    pub fn document(&self) -> &Document {
        match self {
            Self::Ready(session) => &session.document,
            Self::Failed { document, .. } => document,
        }
    }

    pub fn into_document(self) -> Document {
        match self {
            Self::Ready(session) => session.document,
            Self::Failed { document, .. } => document,
        }
    }
}

/// The configured shell, or [`DEFAULT_SHELL`] when the file is missing.
pub fn read_shell(build: &BuildConfig) -> Result<Cow<'static, str>> {
    if !build.shell.is_file() {
        return Ok(Cow::Borrowed(DEFAULT_SHELL));
    }
    let shell = fs::read_to_string(&build.shell)
        .with_context(|| format!("Failed to read shell: {}", build.shell.display()))?;
    Ok(Cow::Owned(shell))
}

/// Load content into `shell` for a viewport `viewport_width` pixels wide.
///
/// Only a shell that does not parse is an error; content failures come back
/// as [`Boot::Failed`].
pub fn bootstrap(shell: &str, config: &SiteConfig, viewport_width: u32) -> Result<Boot, DomError> {
    let mut document = Document::parse(shell)?;

    let source = ContentSource::from_config(&config.build);
    let timeout = Duration::from_secs(config.build.fetch_timeout);
    let site = match load_site_data(&source, timeout) {
        Ok(site) => site,
        Err(error) => {
            log!("error"; "{source}: {}", error_chain(&error));
            document.replace_body(FALLBACK_BODY)?;
            return Ok(Boot::Failed { document, error });
        }
    };

    let markup = Markup {
        escape_text: config.render.escape_text,
    };
    let fragments = render::render(&site, &config.desktop.windows, markup);
    render::apply(&mut document, &fragments);

    let desktop = Desktop::start(&document, &config.desktop, viewport_width);
    desktop.sync(&mut document);
    set_footer_year(&mut document);

    Ok(Boot::Ready(Session { document, desktop }))
}

fn set_footer_year(document: &mut Document) {
    if let Some(node) = document.get_element_by_id("current-year") {
        document.set_text(node, &Local::now().year().to_string());
    }
}

/// `outer: inner: root` for an error and its sources.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
