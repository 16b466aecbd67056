//! Share-link resolution: authenticated exchange of a dataset id for a
//! short-lived share token.
//!
//! Single GET to the catalog's `get_share_link` endpoint. The first attempt
//! carries no credentials; on a 401 the challenge resolver determines the
//! credential encoding (repairing a missing `WWW-Authenticate` header if
//! needed) and exactly one authenticated retry is made. No other retries.

mod parse;

pub use parse::parse_share_token;

use std::time::Duration;

use crate::auth::{basic_auth_header, ChallengeResolver, Credential};
use crate::error::{Result, UrlOperationsError};
use crate::http::{self, RequestOptions};

const HTTP_200_OK: u32 = 200;
const HTTP_401_UNAUTHORIZED: u32 = 401;

/// Obtains the share token for `dataset_id`.
///
/// `credentials` is invoked only when the server actually challenges with a
/// 401; a dataset served without authentication never touches the credential
/// store. `from_url` is the original source URL, used only for error
/// reporting.
pub fn fetch_share_token(
    endpoint: &str,
    dataset_id: &str,
    credentials: impl FnOnce() -> Result<Credential>,
    from_url: &str,
    tls_verify: bool,
    timeout: Option<Duration>,
) -> Result<String> {
    let request_url = format!("{}{}", endpoint, dataset_id);
    let opts = RequestOptions {
        timeout,
        tls_verify,
        headers: Vec::new(),
    };

    tracing::debug!(url = %request_url, "requesting share link");
    let mut response = http::get(&request_url, &opts).map_err(|e| transfer(from_url, e))?;

    if response.status == HTTP_401_UNAUTHORIZED {
        let credential = credentials()?;
        let resolver = ChallengeResolver::new(dataset_id);
        let challenge = resolver.resolve(response.header("www-authenticate"));
        let authorization =
            basic_auth_header(&credential, challenge.encoding).map_err(|e| {
                UrlOperationsError::Authentication {
                    url: from_url.to_string(),
                    status: HTTP_401_UNAUTHORIZED,
                    message: format!("cannot encode credentials: {}", e),
                }
            })?;
        let retry_opts = RequestOptions {
            headers: vec![("Authorization".to_string(), authorization)],
            ..opts
        };
        response = http::get(&request_url, &retry_opts).map_err(|e| transfer(from_url, e))?;
    }

    if response.status != HTTP_200_OK {
        let mut message = format!(
            "failed to get share link {}, server replied with status code: {}",
            request_url, response.status
        );
        let detail = response
            .content_type()
            .filter(|ct| ct == "application/json")
            .and_then(|_| serde_json::from_slice::<serde_json::Value>(&response.body).ok())
            .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
            .filter(|d| !d.is_empty());
        match detail {
            Some(d) => {
                message.push_str(", ");
                message.push_str(&d);
                message.push('.');
            }
            None => message.push('.'),
        }
        return Err(UrlOperationsError::Authentication {
            url: from_url.to_string(),
            status: response.status,
            message,
        });
    }

    parse_share_token(&response.body_str()).ok_or_else(|| UrlOperationsError::RemoteProtocol {
        url: from_url.to_string(),
        message: format!("failed to parse share link {:?}", response.body_str()),
    })
}

fn transfer(from_url: &str, source: anyhow::Error) -> UrlOperationsError {
    UrlOperationsError::Transfer {
        url: from_url.to_string(),
        cause: source,
    }
}
