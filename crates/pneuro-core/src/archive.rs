//! Tar archive validation and single-member extraction.
//!
//! The prepare-download API always wraps the requested file in a tar (usually
//! gzipped) archive. A valid archive holds exactly one regular-file member;
//! anything else means the source URL addressed a directory or the server
//! broke its contract.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tar::{Archive, EntryType};

use crate::error::{Result, UrlOperationsError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Validates that the archive at `archive_path` contains exactly one regular
/// file and extracts it into `content_dir` without restoring permissions or
/// timestamps (attributes from the archive are not trusted).
///
/// Returns the path of the extracted file. `from_url` is the original source
/// URL, used for error reporting only.
pub fn extract_single_file(
    archive_path: &Path,
    content_dir: &Path,
    from_url: &str,
) -> Result<PathBuf> {
    let reader = open_maybe_gzipped(archive_path).map_err(|e| UrlOperationsError::Transfer {
        url: from_url.to_string(),
        cause: e,
    })?;

    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(false);
    archive.set_preserve_mtime(false);
    archive.set_unpack_xattrs(false);

    let not_a_file = || UrlOperationsError::RemoteProtocol {
        url: from_url.to_string(),
        message: format!(
            "URL {} does not point to a file, only files are supported.",
            from_url
        ),
    };
    let bad_archive = |e: std::io::Error| UrlOperationsError::RemoteProtocol {
        url: from_url.to_string(),
        message: format!("downloaded archive is unreadable: {}", e),
    };

    let mut entries = archive.entries().map_err(bad_archive)?;
    let mut entry = entries.next().ok_or_else(not_a_file)?.map_err(bad_archive)?;

    if entry.header().entry_type() != EntryType::Regular {
        return Err(not_a_file());
    }
    let member_name = entry
        .path()
        .map_err(bad_archive)?
        .into_owned();

    // unpack_in refuses paths escaping content_dir.
    let unpacked = entry.unpack_in(content_dir).map_err(bad_archive)?;
    if !unpacked {
        return Err(UrlOperationsError::RemoteProtocol {
            url: from_url.to_string(),
            message: format!(
                "archive member {:?} escapes the extraction directory",
                member_name
            ),
        });
    }

    // A second member of any type invalidates the archive.
    if entries.next().is_some() {
        return Err(not_a_file());
    }

    tracing::debug!(member = %member_name.display(), "extracted single archive member");
    Ok(content_dir.join(member_name))
}

/// Opens the archive as plain tar or gzipped tar based on the magic bytes.
fn open_maybe_gzipped(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    use anyhow::Context;

    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;
    if n == 2 && magic == GZIP_MAGIC {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}
