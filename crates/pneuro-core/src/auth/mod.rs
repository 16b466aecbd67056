//! Authentication adapter for the PublicnEUro catalog.
//!
//! The share-link server deviates from standard Basic-Auth in two ways:
//!
//! 1. Its 401 responses can omit the `WWW-Authenticate` header entirely. We
//!    synthesize a fitting header so the challenge cycle can proceed, and
//!    record that credentials must then be UTF-8 encoded.
//! 2. The default Basic-Auth credential encoding (Latin-1) corrupts non-ASCII
//!    credentials when the server actually expects UTF-8. The charset is
//!    therefore taken from the challenge and applied when the credentials are
//!    re-encoded for the retry.

mod basic;
mod challenge;

pub use basic::basic_auth_header;
pub use challenge::{parse_charset, ChallengeResolver, CredentialEncoding};

/// Outcome of resolving a 401 challenge: the effective `WWW-Authenticate`
/// header (server-sent or synthesized) and the credential byte encoding to
/// use on the retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChallenge {
    pub header: String,
    pub encoding: CredentialEncoding,
}

/// A username/secret pair borrowed from the credential store for the duration
/// of one download call.
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: String,
    pub secret: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}
