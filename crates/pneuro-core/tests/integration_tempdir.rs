//! Scoped temp dirs must be gone after `download` returns, success or error.
//!
//! Redirects TMPDIR to a private scratch dir so stray entries are observable.
//! Single test function because TMPDIR is process-global.

mod common;

use common::api_server::{ApiServer, ApiServerOptions};
use common::fixtures;

use pneuro_core::auth::Credential;
use pneuro_core::credentials::MemoryCredentialStore;
use pneuro_core::{DownloadOptions, PneuroConfig, PublicNeuroOperations, UrlOperations};

fn entries_in(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[test]
fn temp_dirs_are_removed_on_success_and_on_failure() {
    let scratch = tempfile::TempDir::with_prefix_in("pneuro-scratch", std::env::temp_dir())
        .unwrap();
    std::env::set_var("TMPDIR", scratch.path());

    // Success path.
    let ok_server = ApiServer::start(ApiServerOptions {
        archive: fixtures::tar_gz_single_file("f", b"payload"),
        ..Default::default()
    });
    let cfg = PneuroConfig {
        share_link_url: ok_server.share_link_url(),
        prepare_download_url: ok_server.prepare_download_url(),
        ..PneuroConfig::default()
    };
    let store =
        MemoryCredentialStore::with_credential("publicneuro", Credential::new("user", "pass"));
    let mut ops = PublicNeuroOperations::new(cfg, store);

    let dest_dir = tempfile::tempdir_in(scratch.path()).unwrap();
    let dest = dest_dir.path().join("f");
    ops.download("publicneuro+https://PN000011/f", &dest, &DownloadOptions::default())
        .unwrap();
    assert!(dest.exists());
    drop(dest_dir);
    assert!(
        entries_in(scratch.path()).is_empty(),
        "temp dirs left behind after success: {:?}",
        entries_in(scratch.path())
    );

    // Failure path: archive violates the single-member contract.
    let bad_server = ApiServer::start(ApiServerOptions {
        archive: fixtures::tar_with_files(&[("a", b"a"), ("b", b"b")]),
        ..Default::default()
    });
    let cfg = PneuroConfig {
        share_link_url: bad_server.share_link_url(),
        prepare_download_url: bad_server.prepare_download_url(),
        ..PneuroConfig::default()
    };
    let store =
        MemoryCredentialStore::with_credential("publicneuro", Credential::new("user", "pass"));
    let mut ops = PublicNeuroOperations::new(cfg, store);

    let dest_dir = tempfile::tempdir_in(scratch.path()).unwrap();
    ops.download(
        "publicneuro+https://PN000011/f",
        &dest_dir.path().join("f"),
        &DownloadOptions::default(),
    )
    .unwrap_err();
    drop(dest_dir);
    assert!(
        entries_in(scratch.path()).is_empty(),
        "temp dirs left behind after failure: {:?}",
        entries_in(scratch.path())
    );
}
