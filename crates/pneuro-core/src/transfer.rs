//! Generic HTTP byte transfer: single GET streamed to a file.
//!
//! Used for the anonymous, time-limited download link. Writes the response
//! body sequentially; the destination here is always a private temp file, so
//! there is no partial-file cleanup to do beyond the tempdir scope.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Downloads `url` into `to_path` with a single GET. Returns the number of
/// bytes written. Fails on any non-2xx status.
pub fn download(url: &str, to_path: &Path, timeout: Option<Duration>) -> Result<u64> {
    let mut file = File::create(to_path)
        .with_context(|| format!("failed to create {}", to_path.display()))?;
    let mut written: u64 = 0;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    if let Some(t) = timeout {
        easy.timeout(t)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("write to {} failed: {}", to_path.display(), e);
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform().context("GET request failed")?;
    }

    if let Some(e) = write_error {
        return Err(e).with_context(|| format!("failed writing {}", to_path.display()));
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    file.flush()
        .with_context(|| format!("failed to flush {}", to_path.display()))?;
    Ok(written)
}
