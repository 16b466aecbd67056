//! Source URL decomposition.
//!
//! A pneuro source URL has the form `publicneuro+https://<dataset-id>/<path>`:
//! the authority is the dataset identifier and the path addresses one file
//! inside that dataset. The path is URL-encoded by the host tool; decoding
//! follows the `unquote_plus` convention the PublicnEUro API partners use
//! (`+` means space).

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{Result, UrlOperationsError};

/// Scheme prefix this handler is registered for.
pub const SCHEME_PREFIX: &str = "publicneuro+";

/// Parsed source URL: dataset identifier plus decoded intra-dataset path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    pub dataset_id: String,
    /// Decoded path, including the leading `/` as the API expects it.
    pub path: String,
}

/// Splits a source URL into dataset id and decoded path.
///
/// Fails before any network activity when the scheme does not start with
/// `publicneuro+`.
pub fn parse_source_url(raw: &str) -> Result<SourceUrl> {
    let parsed = Url::parse(raw).map_err(|e| UrlOperationsError::RemoteProtocol {
        url: raw.to_string(),
        message: format!("not a valid URL: {}", e),
    })?;

    if !parsed.scheme().starts_with(SCHEME_PREFIX) {
        return Err(UrlOperationsError::SchemeMismatch {
            url: raw.to_string(),
            scheme: parsed.scheme().to_string(),
        });
    }

    let dataset_id = parsed
        .host_str()
        .unwrap_or_default()
        .to_string();

    Ok(SourceUrl {
        dataset_id,
        path: unquote_plus(parsed.path()),
    })
}

/// Percent-decodes `s`, treating `+` as space (`urllib.parse.unquote_plus`
/// semantics). `%2B` still decodes to a literal `+`.
pub fn unquote_plus(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
