//! Download-link resolution: exchange a share token plus file path for a
//! signed, anonymous download URL.

use std::time::Duration;

use crate::error::{Result, UrlOperationsError};
use crate::http::{self, RequestOptions};

const HTTP_200_OK: u32 = 200;

/// Requests a prepared download link for one file.
///
/// Single unauthenticated POST of `{"share_auth": <token>, "paths": [<path>]}`
/// to the prepare endpoint; the 200 response carries the link in its `url`
/// field. The link is time-limited and consumed immediately by the caller.
pub fn fetch_download_link(
    endpoint: &str,
    share_token: &str,
    path: &str,
    from_url: &str,
    timeout: Option<Duration>,
) -> Result<String> {
    let body = serde_json::json!({
        "share_auth": share_token,
        "paths": [path],
    });
    let opts = request_options(timeout);

    tracing::debug!(url = %endpoint, path = %path, "requesting download link");
    let response =
        http::post_json(endpoint, &body, &opts).map_err(|e| UrlOperationsError::Transfer {
            url: from_url.to_string(),
            cause: e,
        })?;

    if response.status != HTTP_200_OK {
        return Err(UrlOperationsError::Authentication {
            url: from_url.to_string(),
            status: response.status,
            message: format!(
                "failed to get download link for {}, server replied with status code: {}.",
                from_url, response.status
            ),
        });
    }

    let info: serde_json::Value =
        serde_json::from_slice(&response.body).map_err(|e| UrlOperationsError::RemoteProtocol {
            url: from_url.to_string(),
            message: format!("prepare-download response is not JSON: {}", e),
        })?;
    info.get("url")
        .and_then(|u| u.as_str())
        .map(String::from)
        .ok_or_else(|| UrlOperationsError::RemoteProtocol {
            url: from_url.to_string(),
            message: "prepare-download response has no `url` field".to_string(),
        })
}

/// Options for the prepare-download POST. TLS verification stays on here: the
/// self-signed-certificate exception is scoped to the share-link catalog
/// endpoint and does not extend to this host.
fn request_options(timeout: Option<Duration>) -> RequestOptions {
    RequestOptions {
        timeout,
        ..RequestOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_request_always_verifies_tls() {
        let opts = request_options(None);
        assert!(opts.tls_verify);

        let opts = request_options(Some(Duration::from_secs(10)));
        assert!(opts.tls_verify);
        assert_eq!(opts.timeout, Some(Duration::from_secs(10)));
    }
}
