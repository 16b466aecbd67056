//! `pneuro checksum <path>` – compute a digest of a local file.

use anyhow::Result;
use std::path::Path;

use pneuro_core::copy::{hash_path, HashAlgorithm};

pub fn run_checksum(path: &Path, algorithm: &str) -> Result<()> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    let digest = hash_path(path, algorithm)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
