//! Minimal HTTP/1.1 server impersonating the PublicnEUro API for tests.
//!
//! Routes:
//! - `GET /api/get_share_link/<id>`: 401 until an Authorization header is
//!   sent, then the configured status/body (default: a backslash-escaped
//!   share link carrying the configured token).
//! - `POST /download/prepare`: the configured status (default 200 with a
//!   JSON `url` pointing back at this server's archive route).
//! - `GET /archive`: the configured archive bytes.
//!
//! Every Authorization header and prepare body seen is recorded for
//! assertions.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct ApiServerOptions {
    /// Whether the share-link route challenges unauthenticated requests.
    /// False models an openly shared dataset served with a plain 200.
    pub require_auth: bool,
    /// `WWW-Authenticate` value sent with the 401, or None to omit the
    /// header entirely (the real catalog server does that).
    pub www_authenticate: Option<String>,
    /// Status for the authenticated share-link request.
    pub share_status: u32,
    /// Body override for the share-link response. Default is
    /// `https:\/\/<addr>\/share\/<token>`.
    pub share_body: Option<String>,
    /// Content-Type for a non-200 share-link response.
    pub share_error_content_type: Option<String>,
    /// Share token embedded in the default share-link body.
    pub token: String,
    /// Status for the prepare-download request.
    pub prepare_status: u32,
    /// Archive bytes served on the download link.
    pub archive: Vec<u8>,
}

impl Default for ApiServerOptions {
    fn default() -> Self {
        Self {
            require_auth: true,
            www_authenticate: None,
            share_status: 200,
            share_body: None,
            share_error_content_type: None,
            token: "tok123".to_string(),
            prepare_status: 200,
            archive: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    /// Authorization header (or None) of every share-link request.
    share_authorizations: Vec<Option<String>>,
    /// Raw body of every prepare-download request.
    prepare_bodies: Vec<String>,
}

pub struct ApiServer {
    addr: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl ApiServer {
    /// Starts the server in a background thread. It runs until the process
    /// exits.
    pub fn start(opts: ApiServerOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let handler_addr = addr.clone();
        let handler_recorded = Arc::clone(&recorded);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let opts = opts.clone();
                let addr = handler_addr.clone();
                let recorded = Arc::clone(&handler_recorded);
                thread::spawn(move || handle(stream, &opts, &addr, &recorded));
            }
        });

        ApiServer { addr, recorded }
    }

    pub fn share_link_url(&self) -> String {
        format!("http://{}/api/get_share_link/", self.addr)
    }

    pub fn prepare_download_url(&self) -> String {
        format!("http://{}/download/prepare", self.addr)
    }

    /// Authorization headers of all share-link requests seen so far.
    pub fn share_authorizations(&self) -> Vec<Option<String>> {
        self.recorded.lock().unwrap().share_authorizations.clone()
    }

    /// Parsed JSON bodies of all prepare-download requests seen so far.
    pub fn prepare_requests(&self) -> Vec<serde_json::Value> {
        self.recorded
            .lock()
            .unwrap()
            .prepare_bodies
            .iter()
            .map(|b| serde_json::from_str(b).expect("prepare body is JSON"))
            .collect()
    }
}

fn handle(mut stream: TcpStream, opts: &ApiServerOptions, addr: &str, recorded: &Mutex<Recorded>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    if request.path.starts_with("/api/get_share_link/") {
        recorded
            .lock()
            .unwrap()
            .share_authorizations
            .push(request.authorization.clone());
        if opts.require_auth && request.authorization.is_none() {
            let extra = opts
                .www_authenticate
                .as_ref()
                .map(|v| format!("WWW-Authenticate: {}\r\n", v))
                .unwrap_or_default();
            write_response(&mut stream, 401, "Unauthorized", &extra, b"");
            return;
        }
        if opts.share_status != 200 {
            let content_type = opts
                .share_error_content_type
                .as_ref()
                .map(|ct| format!("Content-Type: {}\r\n", ct))
                .unwrap_or_default();
            let body = opts.share_body.clone().unwrap_or_default();
            write_response(&mut stream, opts.share_status, "Error", &content_type, body.as_bytes());
            return;
        }
        let body = opts.share_body.clone().unwrap_or_else(|| {
            format!("https:\\/\\/{}\\/share\\/{}", addr, opts.token)
        });
        write_response(&mut stream, 200, "OK", "Content-Type: text/plain\r\n", body.as_bytes());
        return;
    }

    if request.path == "/download/prepare" {
        recorded
            .lock()
            .unwrap()
            .prepare_bodies
            .push(request.body.clone());
        if opts.prepare_status != 200 {
            write_response(&mut stream, opts.prepare_status, "Error", "", b"");
            return;
        }
        let body = format!("{{\"url\": \"http://{}/archive\"}}", addr);
        write_response(
            &mut stream,
            200,
            "OK",
            "Content-Type: application/json\r\n",
            body.as_bytes(),
        );
        return;
    }

    if request.path == "/archive" {
        write_response(
            &mut stream,
            200,
            "OK",
            "Content-Type: application/octet-stream\r\n",
            &opts.archive,
        );
        return;
    }

    write_response(&mut stream, 404, "Not Found", "", b"");
}

struct Request {
    path: String,
    authorization: Option<String>,
    body: String,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let path = request_line.split_whitespace().nth(1)?.to_string();

    let mut authorization = None;
    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body_bytes = buf[header_end + 4..].to_vec();
    while body_bytes.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body_bytes.extend_from_slice(&chunk[..n]);
    }

    Some(Request {
        path,
        authorization,
        body: String::from_utf8_lossy(&body_bytes).into_owned(),
    })
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn write_response(stream: &mut TcpStream, status: u32, reason: &str, extra_headers: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        reason,
        body.len(),
        extra_headers
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
