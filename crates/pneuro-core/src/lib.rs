//! pneuro-core: single-file downloads from PublicnEUro datasets.
//!
//! PublicnEUro does not expose direct file URLs. A download walks a
//! four-step protocol instead: authenticate against the data catalog,
//! exchange the dataset id for a short-lived share token, exchange the token
//! plus file path for a signed anonymous download link, then fetch a tar
//! archive that must wrap exactly the one requested file.
//!
//! Source URLs have the form `publicneuro+https://<dataset-id>/<path>`.
//! Directory listing is not supported by the provider; `stat` always reports
//! an empty result.

pub mod archive;
pub mod auth;
pub mod config;
pub mod copy;
pub mod credentials;
pub mod download_link;
pub mod error;
pub mod http;
pub mod logging;
pub mod operations;
pub mod registry;
pub mod share_link;
pub mod source_url;
pub mod transfer;

pub use config::PneuroConfig;
pub use copy::{HashAlgorithm, TransferMetadata};
pub use error::{Result, UrlOperationsError};
pub use operations::{DownloadOptions, PublicNeuroOperations, UrlOperations};
pub use registry::HandlerRegistry;
