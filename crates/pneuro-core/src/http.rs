//! Small blocking HTTP layer over the curl crate.
//!
//! The two PublicnEUro API calls need full response bodies plus headers in
//! memory; bulk byte transfer lives in `transfer` instead. Runs in the
//! current thread.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::str;
use std::time::Duration;

/// Per-request knobs. `tls_verify` defaults to on; only the share-link call
/// against the catalog's self-signed certificate turns it off, and that via
/// an explicit config flag.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub tls_verify: bool,
    /// Extra request headers, e.g. a prepared Authorization value.
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            tls_verify: true,
            headers: Vec::new(),
        }
    }
}

/// A fully buffered HTTP response. Header names are lowercased; when
/// redirects were followed only the final hop's headers are kept.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Media type from `Content-Type`, parameters stripped, lowercased.
    pub fn content_type(&self) -> Option<String> {
        self.header("content-type")
            .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
    }

    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs a GET and buffers the response.
pub fn get(url: &str, opts: &RequestOptions) -> Result<HttpResponse> {
    perform(url, opts, None)
}

/// Performs a POST with a JSON body and buffers the response.
pub fn post_json(url: &str, json: &serde_json::Value, opts: &RequestOptions) -> Result<HttpResponse> {
    let mut opts = opts.clone();
    opts.headers
        .push(("Content-Type".to_string(), "application/json".to_string()));
    perform(url, &opts, Some(serde_json::to_vec(json)?))
}

fn perform(url: &str, opts: &RequestOptions, post_body: Option<Vec<u8>>) -> Result<HttpResponse> {
    let mut headers: HashMap<String, String> = HashMap::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    if let Some(t) = opts.timeout {
        easy.timeout(t)?;
    }
    if !opts.tls_verify {
        easy.ssl_verify_peer(false)?;
        easy.ssl_verify_host(false)?;
    }
    if let Some(ref data) = post_body {
        easy.post(true)?;
        easy.post_fields_copy(data)?;
    }

    let mut list = curl::easy::List::new();
    for (k, v) in &opts.headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !opts.headers.is_empty() {
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                let line = s.trim_end();
                if line.starts_with("HTTP/") {
                    // New header block after a redirect; keep only the last.
                    headers.clear();
                } else if let Some((name, value)) = line.split_once(':') {
                    headers.insert(
                        name.trim().to_ascii_lowercase(),
                        value.trim().to_string(),
                    );
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer
            .perform()
            .with_context(|| format!("request to {} failed", url))?;
    }

    let status = easy.response_code().context("no response code")?;
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
