use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Catalog endpoint for exchanging a dataset id for a share link.
pub const DEFAULT_SHARE_LINK_URL: &str = "https://datacatalog.publicneuro.eu/api/get_share_link/";
/// Endpoint for exchanging a share token plus path for a download link.
pub const DEFAULT_PREPARE_DOWNLOAD_URL: &str =
    "https://delphiapp.computerome.dk/project_management/file_management/download/prepare";

/// Global configuration loaded from `~/.config/pneuro/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PneuroConfig {
    /// Share-link API endpoint; the dataset id is appended.
    pub share_link_url: String,
    /// Prepare-download API endpoint.
    pub prepare_download_url: String,
    /// TLS peer verification for the share-link catalog endpoint only. Off
    /// by default because the catalog uses a self-signed certificate;
    /// re-enable here if the certificate changes. All other requests always
    /// verify.
    #[serde(default)]
    pub tls_verify: bool,
    /// Optional default timeout in seconds, applied when the caller supplies
    /// none. No timeout at all when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for PneuroConfig {
    fn default() -> Self {
        Self {
            share_link_url: DEFAULT_SHARE_LINK_URL.to_string(),
            prepare_download_url: DEFAULT_PREPARE_DOWNLOAD_URL.to_string(),
            tls_verify: false,
            timeout_secs: None,
        }
    }
}

impl PneuroConfig {
    pub fn default_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pneuro")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PneuroConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PneuroConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PneuroConfig = toml::from_str(&data)?;
    Ok(cfg)
}
