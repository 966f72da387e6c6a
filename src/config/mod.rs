//! Site configuration management for `deskfolio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[build]`   | Content source, page shell, output, minify       |
//! | `[render]`  | Text escaping                                    |
//! | `[desktop]` | Window set, pre-opened windows, viewport, z floor|
//! | `[serve]`   | Development server (port, interface, watch)      |
//!
//! # Example
//!
//! ```toml
//! [build]
//! data = "site-data.json"
//! output = "public"
//!
//! [desktop]
//! open = ["readme"]
//!
//! [serve]
//! port = 5277
//! ```
//!
//! The file is optional: every field has a default.

mod build;
pub mod defaults;
mod desktop;
mod error;
mod handle;
mod serve;

pub use build::{BuildConfig, RenderConfig};
pub use desktop::DesktopConfig;
pub use handle::{cfg, init_config, reload_config};

use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing deskfolio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub desktop: DesktopConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by the CLI, apply CLI overrides and validate.
    ///
    /// A missing config file yields the defaults.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);

        if !cli.is_init() {
            config.validate()?;
        }
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        Self::update_option(&mut self.build.output, cli.output.as_ref());
        Self::update_option(&mut self.build.data, cli.data.as_ref());
        self.update_path_with_root(&root, &cli.config);

        match &cli.command {
            Commands::Build { build_args } => {
                self.build.clean |= build_args.clean;
                Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
            }
            Commands::Serve {
                build_args,
                interface,
                port,
                watch,
            } => {
                self.build.clean |= build_args.clean;
                Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            Commands::Snapshot { viewport, .. } => {
                Self::update_option(&mut self.desktop.viewport_width, viewport.as_ref());
            }
            Commands::Init { .. } => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every path against the root directory.
    fn update_path_with_root(&mut self, root: &Path, config_name: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_name));
        self.build.shell = Self::normalize_path(&root.join(&self.build.shell));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        if !self.build.data_is_remote() {
            let data = Self::normalize_path(&root.join(&self.build.data));
            self.build.data = data.to_string_lossy().into_owned();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.build.data.trim().is_empty() {
            bail!(ConfigError::Validation("[build.data] must not be empty".into()));
        }
        if self.build.fetch_timeout == 0 {
            bail!(ConfigError::Validation(
                "[build.fetch_timeout] must be at least 1 second".into()
            ));
        }

        let desktop = &self.desktop;
        if desktop.windows.is_empty() {
            bail!(ConfigError::Validation(
                "[desktop.windows] must name at least one window".into()
            ));
        }
        let mut seen = FxHashSet::default();
        for id in &desktop.windows {
            if !seen.insert(id.as_str()) {
                bail!(ConfigError::Validation(format!(
                    "[desktop.windows] lists `{id}` twice"
                )));
            }
        }
        if let Some(id) = desktop.open.iter().find(|id| !seen.contains(id.as_str())) {
            bail!(ConfigError::Validation(format!(
                "[desktop.open] names unknown window `{id}`"
            )));
        }
        if desktop.z_floor >= i32::MAX as u32 {
            bail!(ConfigError::Validation(format!(
                "[desktop.z_floor] must be below {}",
                i32::MAX
            )));
        }
        if desktop.viewport_width == 0 {
            bail!(ConfigError::Validation(
                "[desktop.viewport_width] must be positive".into()
            ));
        }

        if self.serve.interface.parse::<IpAddr>().is_err() {
            bail!(ConfigError::Validation(format!(
                "[serve.interface] `{}` is not an IP address",
                self.serve.interface
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
