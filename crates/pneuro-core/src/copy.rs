//! Hashing stream-copy to the destination path.
//!
//! The extracted file is copied in chunks while feeding every requested hash,
//! so a download produces content hashes without a second pass over the data.

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256, Sha512};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

const BUF_SIZE: usize = 64 * 1024;

/// Hash algorithms the copy can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => bail!("unsupported hash algorithm {:?} (try sha256 or sha512)", other),
        }
    }
}

/// Result of one completed transfer: byte count plus any requested digests
/// (lowercase hex, keyed by algorithm name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferMetadata {
    pub size: u64,
    pub hashes: HashMap<String, String>,
}

enum Hasher {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    fn new(alg: HashAlgorithm) -> Self {
        match alg {
            HashAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Hasher::Sha512(Sha512::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    fn finish(self) -> String {
        match self {
            Hasher::Sha256(h) => hex::encode(h.finalize()),
            Hasher::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// Copies `src` to `dest` in chunks, computing the requested hashes inline.
/// Reads and writes are buffered at 64 KiB to keep memory use bounded.
pub fn copy_with_hashes(
    src: &Path,
    dest: &Path,
    algorithms: &[HashAlgorithm],
) -> Result<TransferMetadata> {
    let mut src_fp = File::open(src).with_context(|| format!("open {}", src.display()))?;
    let mut dst_fp = File::create(dest).with_context(|| format!("create {}", dest.display()))?;

    let mut hashers: Vec<(HashAlgorithm, Hasher)> = algorithms
        .iter()
        .map(|&alg| (alg, Hasher::new(alg)))
        .collect();

    let mut size: u64 = 0;
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = src_fp
            .read(&mut buf)
            .with_context(|| format!("read {}", src.display()))?;
        if n == 0 {
            break;
        }
        dst_fp
            .write_all(&buf[..n])
            .with_context(|| format!("write {}", dest.display()))?;
        for (_, hasher) in &mut hashers {
            hasher.update(&buf[..n]);
        }
        size += n as u64;
    }
    dst_fp
        .flush()
        .with_context(|| format!("flush {}", dest.display()))?;

    let hashes = hashers
        .into_iter()
        .map(|(alg, hasher)| (alg.name().to_string(), hasher.finish()))
        .collect();
    Ok(TransferMetadata { size, hashes })
}

/// Computes one digest of a file without copying it (used by the standalone
/// checksum command). Same chunked read as the copy path.
pub fn hash_path(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Hasher::new(algorithm);
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finish())
}
