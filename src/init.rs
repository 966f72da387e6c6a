//! Site initialization.
//!
//! Scaffolds a working site: config, page shell, sample content and an
//! assets directory.

use crate::{bootstrap::DEFAULT_SHELL, config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

const SAMPLE_CONTENT: &str = include_str!("embed/site-data.json");
const SAMPLE_PROFILE: &str = include_str!("embed/profile.svg");

/// Create a new site at the configured root.
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // without a name the site goes into the current directory, which must be empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `deskfolio init <SITE_NAME>` to create in a subdirectory."
        );
    }
    if config.config_path.exists() {
        bail!(
            "Config file already exists: {}. Remove it manually or init in a different path.",
            config.config_path.display()
        );
    }

    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;
    init_default_config(&config.config_path)?;
    write_new(&config.build.shell, DEFAULT_SHELL)?;
    write_new(Path::new(&config.build.data), SAMPLE_CONTENT)?;
    write_new(&config.build.assets.join("profile.svg"), SAMPLE_PROFILE)?;
    init_ignored_files(root, &[Path::new(relative(&config.build.output, root))])?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// `path` relative to `root` as text, or as given when outside it.
fn relative<'a>(path: &'a Path, root: &Path) -> &'a str {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_str()
        .unwrap_or_default()
}

/// Write default configuration file
fn init_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write a scaffold file, refusing to overwrite.
fn write_new(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        bail!(
            "Path `{}` already exists. Try `deskfolio init <SITE_NAME>` instead.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Initialize .gitignore and .ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_site;
    use crate::content::SiteData;
    use tempfile::TempDir;

    fn scaffold_config(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("deskfolio.toml");
        config.build.shell = root.join("index.html");
        config.build.data = root.join("site-data.json").to_string_lossy().into_owned();
        config.build.output = root.join("public");
        config.build.assets = root.join("assets");
        config
    }

    #[test]
    fn test_init_scaffolds_buildable_site() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        let config = scaffold_config(&root);
        new_site(&config, true).unwrap();

        for file in ["deskfolio.toml", "index.html", "site-data.json", "assets/profile.svg"] {
            assert!(root.join(file).is_file(), "{file}");
        }
        assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "public");

        let written = SiteConfig::from_path(&root.join("deskfolio.toml")).unwrap();
        assert_eq!(written.build.data, "site-data.json");
        assert_eq!(written.serve.port, 5277);

        build_site(&config).unwrap();
        assert!(root.join("public/index.html").is_file());
        assert!(root.join("public/assets/profile.svg").is_file());
    }

    #[test]
    fn test_sample_content_is_valid() {
        let site = SiteData::from_json(SAMPLE_CONTENT).unwrap();
        assert_eq!(site.visible_projects().count(), 1);
        assert_eq!(site.windows.len(), 4);
    }

    #[test]
    fn test_init_refuses_non_empty_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let config = scaffold_config(dir.path());
        let err = new_site(&config, false).unwrap_err();
        assert!(err.to_string().contains("not empty"));
    }

    #[test]
    fn test_init_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("deskfolio.toml"), "").unwrap();
        let config = scaffold_config(&root);
        assert!(new_site(&config, true).is_err());
    }
}
