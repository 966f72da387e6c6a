//! Deskfolio - a desktop-style portfolio site generator.

mod bootstrap;
mod build;
mod cli;
mod config;
mod content;
mod desktop;
mod dom;
mod init;
mod render;
mod serve;
mod snapshot;
mod utils;
mod watch;

use anyhow::Result;
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::{SiteConfig, cfg, init_config};
use init::new_site;
use serve::serve_site;
use snapshot::snapshot_site;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    init_config(SiteConfig::load(cli)?);
    let config = cfg();

    match &cli.command {
        Commands::Init { name } => new_site(&config, name.is_some()),
        Commands::Build { .. } => build_site(&config),
        Commands::Serve { .. } => {
            if let Err(err) = build_site(&config) {
                log!("error"; "{err:#}");
            }
            serve_site()
        }
        Commands::Snapshot { clicks, out, .. } => snapshot_site(&config, clicks, out.as_deref()),
    }
}
