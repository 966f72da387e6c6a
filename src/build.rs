//! Site building.
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output()        clean / create the output directory
//!     │
//!     └── rayon::join
//!           ├── build_page()      shell → bootstrap → minify → index.html
//!           └── copy_assets()     assets/ and the content file
//! ```
//!
//! A content file that fails to load still produces `index.html` (holding
//! the fallback message), but the build reports failure.

use crate::{
    bootstrap::{self, Boot},
    config::SiteConfig,
    log,
    utils::minify::minify_page,
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};
use walkdir::WalkDir;

/// Files skipped when copying assets.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

pub const PAGE_NAME: &str = "index.html";

/// Build the site into `config.build.output`.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    let (page, assets) = rayon::join(|| build_page(config), || copy_assets(config));
    let copied = assets?;
    if let Boot::Failed { error, .. } = page? {
        return Err(anyhow::Error::new(error)
            .context(format!("Failed to load content, {PAGE_NAME} holds the fallback page")));
    }

    log!("build"; "{} ({copied} files copied)", output.join(PAGE_NAME).display());
    Ok(())
}

/// Remove the output directory when `clean`, then make sure it exists.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Bootstrap the page at the configured viewport and write it out.
pub fn build_page(config: &SiteConfig) -> Result<Boot> {
    let shell = bootstrap::read_shell(&config.build)?;
    let boot = bootstrap::bootstrap(&shell, config, config.desktop.viewport_width)
        .with_context(|| format!("Page shell is not valid HTML: {}", config.build.shell.display()))?;

    let path = config.build.output.join(PAGE_NAME);
    write_page(&path, &boot.document().to_html(), config)?;
    Ok(boot)
}

/// Write `html` to `path`, minified when enabled.
pub fn write_page(path: &Path, html: &str, config: &SiteConfig) -> Result<()> {
    let bytes = minify_page(html.as_bytes(), &config.build);
    fs::write(path, &*bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Copy the assets directory and a local content file into the output.
///
/// Returns how many files were written.
pub fn copy_assets(config: &SiteConfig) -> Result<usize> {
    let build = &config.build;
    let clean = build.clean;

    let mut jobs: Vec<(PathBuf, PathBuf)> = Vec::new();
    if let Some(name) = build.assets.file_name() {
        let dest_root = build.output.join(name);
        for src in collect_all_files(&build.assets) {
            let rel = src.strip_prefix(&build.assets).unwrap_or(&src);
            jobs.push((dest_root.join(rel), src));
        }
    }
    if !build.data_is_remote() {
        let data = PathBuf::from(&build.data);
        if let Some(name) = data.file_name() {
            jobs.push((build.output.join(name), data.clone()));
        }
    }

    jobs.par_iter()
        .filter(|(dest, src)| clean || !is_up_to_date(src, dest))
        .map(|(dest, src)| copy_file(src, dest).map(|()| 1))
        .try_reduce(|| 0, |a, b| Ok(a + b))
}

fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(anyhow!("{} does not exist", src.display()));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
    Ok(())
}

/// Collect all files from a directory recursively.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Destination exists and is not older than the source.
fn is_up_to_date(src: &Path, dest: &Path) -> bool {
    let modified = |p: &Path| -> Option<SystemTime> { p.metadata().and_then(|m| m.modified()).ok() };
    match (modified(src), modified(dest)) {
        (Some(src), Some(dest)) => src <= dest,
        _ => false,
    }
}
