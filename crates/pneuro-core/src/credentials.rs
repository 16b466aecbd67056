//! Credential storage collaborator.
//!
//! The handler never owns credentials beyond one download call; it asks the
//! store for a named credential up front and instructs the store to persist
//! it after a successful download so the next call does not re-prompt.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::auth::Credential;

/// Name a successfully used credential is saved under.
pub const SUGGESTED_CREDENTIAL_NAME: &str = "publicneuro";
/// Context string recorded with the saved credential.
pub const CREDENTIAL_CONTEXT: &str = "PublicnEUro.eu";

/// Named credential storage scoped to a context string.
pub trait CredentialStore {
    fn get(&self, name: &str) -> Result<Option<Credential>>;
    fn save(&mut self, name: &str, context: &str, credential: &Credential) -> Result<()>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for &mut S {
    fn get(&self, name: &str) -> Result<Option<Credential>> {
        (**self).get(name)
    }

    fn save(&mut self, name: &str, context: &str, credential: &Credential) -> Result<()> {
        (**self).save(name, context, credential)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredential {
    username: String,
    secret: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    credentials: HashMap<String, StoredCredential>,
}

/// TOML-file-backed store under `~/.config/pneuro/credentials.toml`.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Opens the default store location via XDG.
    pub fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("pneuro")?;
        let path = xdg_dirs.place_config_file("credentials.toml")?;
        Ok(Self { path })
    }

    pub fn open_at(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<CredentialFile> {
        if !self.path.exists() {
            return Ok(CredentialFile::default());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse {}", self.path.display()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, name: &str) -> Result<Option<Credential>> {
        let file = self.load()?;
        Ok(file
            .credentials
            .get(name)
            .map(|c| Credential::new(c.username.clone(), c.secret.clone())))
    }

    fn save(&mut self, name: &str, context: &str, credential: &Credential) -> Result<()> {
        let mut file = self.load()?;
        file.credentials.insert(
            name.to_string(),
            StoredCredential {
                username: credential.username.clone(),
                secret: credential.secret.clone(),
                context: Some(context.to_string()),
            },
        );
        let text = toml::to_string_pretty(&file)?;
        fs::write(&self.path, text).with_context(|| format!("write {}", self.path.display()))?;
        tracing::debug!(name = %name, path = %self.path.display(), "saved credential");
        Ok(())
    }
}

/// In-memory store for tests and embedding callers that manage credentials
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: HashMap<String, Credential>,
    saved: Vec<(String, String)>,
}

impl MemoryCredentialStore {
    pub fn with_credential(name: &str, credential: Credential) -> Self {
        let mut store = Self::default();
        store.entries.insert(name.to_string(), credential);
        store
    }

    /// (name, context) pairs `save` was called with, in order.
    pub fn saved(&self) -> &[(String, String)] {
        &self.saved
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, name: &str) -> Result<Option<Credential>> {
        Ok(self.entries.get(name).cloned())
    }

    fn save(&mut self, name: &str, context: &str, credential: &Credential) -> Result<()> {
        self.entries.insert(name.to_string(), credential.clone());
        self.saved.push((name.to_string(), context.to_string()));
        Ok(())
    }
}

/// Looks up the credential for a download: explicit name if given, else the
/// `PNEURO_USER`/`PNEURO_PASSWORD` environment override, else the default
/// saved name.
pub fn resolve_credential(
    store: &dyn CredentialStore,
    name: Option<&str>,
) -> Result<Option<Credential>> {
    if let Some(name) = name {
        return store.get(name);
    }
    if let (Ok(user), Ok(password)) = (
        std::env::var("PNEURO_USER"),
        std::env::var("PNEURO_PASSWORD"),
    ) {
        return Ok(Some(Credential::new(user, password)));
    }
    store.get(SUGGESTED_CREDENTIAL_NAME)
}
