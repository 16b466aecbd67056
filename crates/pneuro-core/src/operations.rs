//! URL operations for `publicneuro+https` sources.
//!
//! One `download` call walks the whole protocol: parse the source URL,
//! authenticate, exchange the dataset id for a share token, exchange token
//! plus path for an anonymous download link, fetch the single-member tar
//! archive into a scoped temp dir, extract, and hash-copy to the
//! destination. `stat` is unsupported by the provider and always reports an
//! empty result.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::archive;
use crate::auth::Credential;
use crate::config::PneuroConfig;
use crate::copy::{self, HashAlgorithm, TransferMetadata};
use crate::credentials::{
    resolve_credential, CredentialStore, CREDENTIAL_CONTEXT, SUGGESTED_CREDENTIAL_NAME,
};
use crate::download_link;
use crate::error::{Result, UrlOperationsError};
use crate::share_link;
use crate::source_url::parse_source_url;
use crate::transfer;

/// Per-call knobs for `download`.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Credential name to use instead of the default lookup.
    pub credential: Option<String>,
    /// Hashes to compute while copying to the destination.
    pub hashes: Vec<HashAlgorithm>,
    /// Forwarded to every network call; falls back to the configured default.
    pub timeout: Option<Duration>,
}

/// Handler interface the registry dispatches to.
pub trait UrlOperations {
    fn download(
        &mut self,
        from_url: &str,
        to_path: &Path,
        opts: &DownloadOptions,
    ) -> Result<TransferMetadata>;

    /// Properties of the remote target. Handlers that cannot stat return an
    /// empty mapping.
    fn stat(&self, url: &str, timeout: Option<Duration>) -> Result<HashMap<String, String>>;
}

/// The PublicnEUro handler. Holds no per-download state; the credential store
/// is the only thing shared across calls.
pub struct PublicNeuroOperations<S: CredentialStore> {
    config: PneuroConfig,
    store: S,
}

impl<S: CredentialStore> PublicNeuroOperations<S> {
    pub fn new(config: PneuroConfig, store: S) -> Self {
        Self { config, store }
    }
}

impl<S: CredentialStore> UrlOperations for PublicNeuroOperations<S> {
    fn download(
        &mut self,
        from_url: &str,
        to_path: &Path,
        opts: &DownloadOptions,
    ) -> Result<TransferMetadata> {
        let source = parse_source_url(from_url)?;
        let timeout = opts.timeout.or_else(|| self.config.default_timeout());

        // The credential store is only consulted if the server challenges;
        // an openly shared dataset downloads without any credential.
        let mut used_credential: Option<Credential> = None;
        let share_token = share_link::fetch_share_token(
            &self.config.share_link_url,
            &source.dataset_id,
            || {
                let credential = resolve_credential(&self.store, opts.credential.as_deref())
                    .map_err(|e| UrlOperationsError::Transfer {
                        url: from_url.to_string(),
                        cause: e,
                    })?
                    .ok_or_else(|| UrlOperationsError::MissingCredential {
                        url: from_url.to_string(),
                        message: format!(
                            "no stored credential {:?} and no PNEURO_USER/PNEURO_PASSWORD set",
                            opts.credential.as_deref().unwrap_or(SUGGESTED_CREDENTIAL_NAME)
                        ),
                    })?;
                used_credential = Some(credential.clone());
                Ok(credential)
            },
            from_url,
            self.config.tls_verify,
            timeout,
        )?;

        // Authentication and authorization succeeded; keep the credential for
        // future downloads. A failure to save is not a download failure.
        if let Some(credential) = used_credential {
            if let Err(e) = self
                .store
                .save(SUGGESTED_CREDENTIAL_NAME, CREDENTIAL_CONTEXT, &credential)
            {
                tracing::warn!("failed to save credential: {:#}", e);
            }
        }

        let link = download_link::fetch_download_link(
            &self.config.prepare_download_url,
            &share_token,
            &source.path,
            from_url,
            timeout,
        )?;

        // Everything transient lives inside this scope and is removed with
        // it, on success and on error alike.
        let temp_dir = tempfile::tempdir().map_err(|e| UrlOperationsError::Transfer {
            url: from_url.to_string(),
            cause: e.into(),
        })?;
        let archive_path = temp_dir.path().join("download.tar.gz");

        tracing::info!(dataset = %source.dataset_id, path = %source.path, "downloading archive");
        transfer::download(&link, &archive_path, timeout).map_err(|e| {
            UrlOperationsError::Transfer {
                url: from_url.to_string(),
                cause: e,
            }
        })?;

        let content_dir = temp_dir.path().join("content");
        std::fs::create_dir(&content_dir).map_err(|e| UrlOperationsError::Transfer {
            url: from_url.to_string(),
            cause: e.into(),
        })?;
        let extracted = archive::extract_single_file(&archive_path, &content_dir, from_url)?;

        copy::copy_with_hashes(&extracted, to_path, &opts.hashes).map_err(|e| {
            UrlOperationsError::Transfer {
                url: from_url.to_string(),
                cause: e,
            }
        })
    }

    fn stat(&self, _url: &str, _timeout: Option<Duration>) -> Result<HashMap<String, String>> {
        Ok(HashMap::new())
    }
}
