//! Basic-Auth header construction with explicit credential encoding.

use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::{Credential, CredentialEncoding};

/// Builds an `Authorization: Basic ...` header value, encoding the username
/// and password in the charset the challenge resolved to. Latin-1 maps each
/// scalar value to one byte and rejects anything above U+00FF.
pub fn basic_auth_header(credential: &Credential, encoding: CredentialEncoding) -> Result<String> {
    let mut raw = encode(&credential.username, encoding)?;
    raw.push(b':');
    raw.extend_from_slice(&encode(&credential.secret, encoding)?);
    Ok(format!("Basic {}", STANDARD.encode(raw)))
}

fn encode(s: &str, encoding: CredentialEncoding) -> Result<Vec<u8>> {
    match encoding {
        CredentialEncoding::Utf8 => Ok(s.as_bytes().to_vec()),
        CredentialEncoding::Latin1 => {
            let mut out = Vec::with_capacity(s.len());
            for c in s.chars() {
                let cp = c as u32;
                if cp > 0xFF {
                    bail!("character {:?} is not representable in latin-1", c);
                }
                out.push(cp as u8);
            }
            Ok(out)
        }
    }
}
