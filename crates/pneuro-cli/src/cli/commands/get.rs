//! `pneuro get <url> <dest>` – download one file from a dataset.

use anyhow::{anyhow, Result};
use std::path::Path;
use std::time::Duration;

use pneuro_core::{DownloadOptions, HandlerRegistry, HashAlgorithm};

pub fn run_get(
    registry: &mut HandlerRegistry,
    url: &str,
    dest: &Path,
    hashes: &[String],
    timeout_secs: Option<u64>,
    credential: Option<String>,
) -> Result<()> {
    let hashes = hashes
        .iter()
        .map(|h| h.parse::<HashAlgorithm>())
        .collect::<Result<Vec<_>>>()?;

    let handler = registry
        .lookup(url)
        .ok_or_else(|| anyhow!("no handler registered for the scheme of {}", url))?;
    let opts = DownloadOptions {
        credential,
        hashes,
        timeout: timeout_secs.map(Duration::from_secs),
    };

    let meta = handler.download(url, dest, &opts)?;
    println!("Downloaded {} ({} bytes)", dest.display(), meta.size);
    for (alg, digest) in &meta.hashes {
        println!("{}  {}", alg, digest);
    }
    Ok(())
}
