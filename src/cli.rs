//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deskfolio portfolio site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to site root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content file path or http(s) URL (relative to site root)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Config file name (default: deskfolio.toml)
    #[arg(short = 'C', long, default_value = "deskfolio.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a template site
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Render the page shell with the content file into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the site, rendering the page on every load
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Render the page, replay clicks headlessly and write the resulting page
    Snapshot {
        /// Viewport width in logical pixels (default: `desktop.viewport_width`)
        #[arg(short, long)]
        viewport: Option<u32>,

        /// Action to replay, in order: `window:ID`, `project:ID`, `close:ID`,
        /// `back` or `drag:ID:DX,DY`
        #[arg(short = 'k', long = "click")]
        clicks: Vec<String>,

        /// Write the snapshot here instead of stdout
        #[arg(long = "out")]
        out: Option<PathBuf>,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_init() {
        let cli = Cli::try_parse_from(["deskfolio", "init", "site"]).unwrap();
        assert!(cli.is_init());

        let cli = Cli::try_parse_from(["deskfolio", "snapshot", "-k", "window:about"]).unwrap();
        assert!(!cli.is_init());
    }
}
