//! Ephemeral static file server.
//!
//! Serves the built site over a loopback HTTP origin for the duration of a
//! capture run, so the browser can navigate by URL and resolve relative
//! assets. Binding port 0 lets the OS pick a free port. The listener is
//! released on drop as well as on explicit close, so an aborted run cannot
//! leak it.

use crate::error::{Error, Result};
use log::debug;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::fs;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use url::Url;

/// Handle to the running server; owns the listener and its request thread.
pub struct StaticServer {
    server: Arc<Server>,
    origin: Url,
    worker: Option<JoinHandle<()>>,
}

impl StaticServer {
    /// Bind a loopback listener on an OS-assigned port and start serving
    /// `root` as static files.
    pub fn bind(root: &Path) -> Result<Self> {
        let server = Server::http("127.0.0.1:0")
            .map_err(|e| Error::Serve(format!("failed to bind listener: {e}")))?;
        let addr: SocketAddr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| Error::Serve("listener bound to a non-IP address".to_string()))?;
        let origin = Url::parse(&format!("http://{addr}/"))
            .map_err(|e| Error::Serve(format!("invalid local origin for {addr}: {e}")))?;

        let server = Arc::new(server);
        let loop_server = Arc::clone(&server);
        let root = root.to_path_buf();
        let worker = thread::spawn(move || {
            for request in loop_server.incoming_requests() {
                handle_request(request, &root);
            }
        });

        Ok(Self {
            server,
            origin,
            worker: Some(worker),
        })
    }

    /// Local origin the browser navigates against, e.g. `http://127.0.0.1:40231/`.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Stop accepting requests and release the listener.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.server.unblock();
            let _ = worker.join();
        }
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn handle_request(request: Request, root: &Path) {
    let result = match resolve_path(request.url(), root) {
        Some(file) => respond_file(request, &file),
        None => respond_not_found(request),
    };
    if let Err(e) = result {
        debug!("static server: request failed: {e}");
    }
}

/// Respond with a static file and its extension-derived content type.
fn respond_file(request: Request, path: &Path) -> Result<()> {
    let body = match fs::read(path) {
        Ok(body) => body,
        Err(e) => {
            debug!("static server: cannot read {}: {e}", path.display());
            return respond_plain(request, 500, b"500 Internal Server Error".to_vec());
        }
    };
    let response = Response::from_data(body)
        .with_header(make_header("Content-Type", content_type(path)));
    request
        .respond(response)
        .map_err(|e| Error::Serve(e.to_string()))
}

fn respond_not_found(request: Request) -> Result<()> {
    respond_plain(request, 404, b"404 Not Found".to_vec())
}

fn respond_plain(request: Request, status: u16, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", "text/plain; charset=utf-8"));
    request
        .respond(response)
        .map_err(|e| Error::Serve(e.to_string()))
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}

/// Resolve a request URL to a file under `serve_root`, handling `index.html`
/// for directories.
fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    if clean.contains("..") {
        return None;
    }

    let local = serve_root.join(&clean);

    // Canonicalize to resolve symlinks and verify the target stays under
    // serve_root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Normalize URL: decode, strip query string, trim slashes
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded.split('?').next().unwrap_or(&decoded);
    path.trim_matches('/').to_string()
}

/// Guess the Content-Type header value from a file extension.
fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}
