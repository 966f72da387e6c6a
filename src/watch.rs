//! File system watcher for the dev server.
//!
//! The page itself is bootstrapped live per request, so the watcher only
//! keeps the rest in step: it reloads `deskfolio.toml`, rewrites the built
//! `index.html` when the shell or content file changes, and re-copies
//! changed assets.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────────────────────┐
//! │ notify   │───▶│ Debouncer│───▶│ handle_changes()            │
//! │ events   │    │ (300ms)  │    │   config → reload + rebuild │
//! └──────────┘    └──────────┘    │   shell/content → page      │
//!                                 │   assets → copy             │
//!                                 └─────────────────────────────┘
//! ```

use crate::{
    bootstrap::Boot,
    build,
    config::{SiteConfig, cfg, reload_config},
    log,
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileCategory {
    Config,
    /// Page shell or content file.
    Page,
    Asset,
}

fn categorize_path(path: &Path, config: &SiteConfig) -> Option<FileCategory> {
    let build = &config.build;
    if path == config.config_path {
        Some(FileCategory::Config)
    } else if path == build.shell || (!build.data_is_remote() && path == Path::new(&build.data)) {
        Some(FileCategory::Page)
    } else if path.starts_with(&build.assets) {
        Some(FileCategory::Asset)
    } else {
        None
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Reload the config and rebuild everything. Returns true on success.
fn try_full_rebuild() -> bool {
    match reload_config() {
        Ok(false) => return false,
        Ok(true) => log!("watch"; "config reloaded, rebuilding..."),
        Err(e) => {
            log!("watch"; "config reload failed, keeping previous: {e:#}");
            return false;
        }
    }
    match build::build_site(&cfg()) {
        Ok(()) => true,
        Err(e) => {
            log!("watch"; "build failed: {e:#}");
            false
        }
    }
}

/// Process file changes. Returns true if a full rebuild succeeded (for cooldown).
fn handle_changes(paths: &[PathBuf]) -> bool {
    let config = cfg();
    let root = config.get_root();

    let mut config_changed = false;
    let mut page_triggers = Vec::new();
    let mut asset_changed = false;
    for path in paths {
        match categorize_path(path, &config) {
            Some(FileCategory::Config) => config_changed = true,
            Some(FileCategory::Page) => page_triggers.push(rel_path(path, root)),
            Some(FileCategory::Asset) => asset_changed = true,
            None => {}
        }
    }

    if config_changed {
        return try_full_rebuild();
    }

    if !page_triggers.is_empty() {
        match build::build_page(&config) {
            Ok(Boot::Ready(_)) => log!("watch"; "{} changed, page rebuilt", page_triggers.join(", ")),
            Ok(Boot::Failed { .. }) => {
                log!("watch"; "{} changed, content failed to load", page_triggers.join(", "))
            }
            Err(e) => log!("watch"; "page build failed: {e:#}"),
        }
    }

    if asset_changed {
        match build::copy_assets(&config) {
            Ok(count) if count > 0 => log!("watch"; "copied {count} assets"),
            Ok(_) => {}
            Err(e) => log!("watch"; "asset copy failed: {e:#}"),
        }
    }

    false
}

// =============================================================================
// Watcher Setup
// =============================================================================

/// Directories to watch: the site root for config/shell/content, the
/// content file's directory when it lives elsewhere, and the assets tree.
fn watch_targets(config: &SiteConfig) -> Vec<(PathBuf, RecursiveMode)> {
    let root = config.get_root().to_path_buf();
    let mut targets = vec![(root.clone(), RecursiveMode::NonRecursive)];

    let mut files = vec![config.build.shell.clone()];
    if !config.build.data_is_remote() {
        files.push(PathBuf::from(&config.build.data));
    }
    for file in &files {
        if let Some(dir) = file.parent()
            && dir != root
            && !targets.iter().any(|(p, _)| p == dir)
        {
            targets.push((dir.to_path_buf(), RecursiveMode::NonRecursive));
        }
    }
    targets.push((config.build.assets.clone(), RecursiveMode::Recursive));

    targets.retain(|(p, _)| p.exists());
    targets
}

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let root = config.get_root();
    let targets = watch_targets(config);
    for (path, mode) in &targets {
        watcher
            .watch(path, *mode)
            .with_context(|| format!("Failed to watch {}", path.display()))?;
    }

    let names: Vec<_> = targets.iter().map(|(p, _)| rel_path(p, root)).collect();
    log!("watch"; "watching: {}", names.join(", "));
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing.
pub fn watch_for_changes_blocking() -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, &cfg())?;

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take()) {
                    debouncer.mark_rebuild();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("deskfolio.toml");
        config.build.shell = root.join("index.html");
        config.build.data = root.join("site-data.json").to_string_lossy().into_owned();
        config.build.assets = root.join("assets");
        config
    }

    #[test]
    fn test_categorize_path() {
        let root = Path::new("/site");
        let config = config(root);
        let category = |p: &str| categorize_path(Path::new(p), &config);

        assert_eq!(category("/site/deskfolio.toml"), Some(FileCategory::Config));
        assert_eq!(category("/site/index.html"), Some(FileCategory::Page));
        assert_eq!(category("/site/site-data.json"), Some(FileCategory::Page));
        assert_eq!(category("/site/assets/img/a.png"), Some(FileCategory::Asset));
        assert_eq!(category("/site/notes.md"), None);
    }

    #[test]
    fn test_remote_content_is_not_a_page_trigger() {
        let mut config = config(Path::new("/site"));
        config.build.data = "https://ana.dev/site-data.json".into();
        assert_eq!(categorize_path(Path::new("/site/site-data.json"), &config), None);
    }

    #[test]
    fn test_temp_files_ignored() {
        assert!(is_temp_file(Path::new("/site/.index.html.swp")));
        assert!(is_temp_file(Path::new("/site/site-data.json~")));
        assert!(!is_temp_file(Path::new("/site/site-data.json")));
    }

    #[test]
    fn test_debouncer_batches_events() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));

        let event = Event::new(EventKind::Any)
            .add_path(PathBuf::from("/site/a.json"))
            .add_path(PathBuf::from("/site/.a.json.swp"));
        debouncer.add(event.clone());
        debouncer.add(event);
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 50));
        assert!(debouncer.ready());
        assert_eq!(debouncer.take(), vec![PathBuf::from("/site/a.json")]);
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_watch_targets_skip_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("assets")).unwrap();
        let config = config(root);

        let targets = watch_targets(&config);
        let paths: Vec<_> = targets.into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![root.to_path_buf(), root.join("assets")]);
    }
}
