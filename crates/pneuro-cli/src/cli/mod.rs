//! CLI for the pneuro PublicnEUro downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pneuro_core::config;
use pneuro_core::credentials::FileCredentialStore;
use pneuro_core::source_url::SCHEME_PREFIX;
use pneuro_core::{HandlerRegistry, PneuroConfig, PublicNeuroOperations};
use std::path::PathBuf;

use commands::{run_checksum, run_get, run_stat};

/// Top-level CLI for the pneuro downloader.
#[derive(Debug, Parser)]
#[command(name = "pneuro")]
#[command(about = "pneuro: download single files from PublicnEUro datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one file from a dataset.
    Get {
        /// Source URL of the form publicneuro+https://<dataset-id>/<path>.
        url: String,

        /// Destination file path.
        dest: PathBuf,

        /// Hash algorithm(s) to compute while copying (sha256, sha512).
        #[arg(long = "hash", value_name = "ALG")]
        hashes: Vec<String>,

        /// Network timeout in seconds, forwarded to every network call.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Stored credential name to use instead of the default lookup.
        #[arg(long, value_name = "NAME")]
        credential: Option<String>,
    },

    /// Query remote file properties (unsupported by PublicnEUro; always empty).
    Stat {
        /// Source URL.
        url: String,
    },

    /// Compute a checksum of a local file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: PathBuf,

        /// Hash algorithm (sha256, sha512).
        #[arg(long, default_value = "sha256", value_name = "ALG")]
        algorithm: String,
    },
}

/// Registers every known URL handler. Populated once at startup; commands
/// dispatch through `lookup` from then on.
fn build_registry(cfg: &PneuroConfig) -> Result<HandlerRegistry> {
    let store = FileCredentialStore::open_default()?;
    let mut registry = HandlerRegistry::new();
    registry.register(
        SCHEME_PREFIX,
        Box::new(PublicNeuroOperations::new(cfg.clone(), store)),
    );
    Ok(registry)
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    match cli.command {
        CliCommand::Get {
            url,
            dest,
            hashes,
            timeout,
            credential,
        } => {
            let mut registry = build_registry(&cfg)?;
            run_get(&mut registry, &url, &dest, &hashes, timeout, credential)?
        }
        CliCommand::Stat { url } => {
            let mut registry = build_registry(&cfg)?;
            run_stat(&mut registry, &url)?
        }
        CliCommand::Checksum { path, algorithm } => run_checksum(&path, &algorithm)?,
    }
    Ok(())
}
