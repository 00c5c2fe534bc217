//! Integration tests for the ephemeral static server

use sitecard::server::StaticServer;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::Path;

fn write_site(root: &Path) {
    fs::write(root.join("index.html"), "<html><body>Front page</body></html>").unwrap();
    fs::create_dir(root.join("about")).unwrap();
    fs::write(
        root.join("about/index.html"),
        "<html><body>About page</body></html>",
    )
    .unwrap();
    fs::write(root.join("style.css"), "body { margin: 0 }").unwrap();
}

fn host_port(server: &StaticServer) -> String {
    let origin = server.origin();
    format!(
        "{}:{}",
        origin.host_str().unwrap(),
        origin.port().unwrap()
    )
}

fn http_get(addr: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(
        stream,
        "GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
    )
    .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn test_serves_directory_index() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let server = StaticServer::bind(dir.path()).unwrap();
    let addr = host_port(&server);

    let response = http_get(&addr, "/");
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/html"));
    assert!(response.contains("Front page"));

    let response = http_get(&addr, "/about/");
    assert!(response.contains("About page"));

    server.close();
}

#[test]
fn test_content_type_follows_extension() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let server = StaticServer::bind(dir.path()).unwrap();
    let response = http_get(&host_port(&server), "/style.css");
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/css"));

    server.close();
}

#[test]
fn test_missing_path_is_404() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let server = StaticServer::bind(dir.path()).unwrap();
    let response = http_get(&host_port(&server), "/missing");
    assert!(response.starts_with("HTTP/1.1 404"));

    server.close();
}

#[test]
fn test_port_released_after_close() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let server = StaticServer::bind(dir.path()).unwrap();
    let addr = host_port(&server);
    assert!(TcpStream::connect(&addr).is_ok());

    server.close();
    assert!(TcpStream::connect(&addr).is_err());
}

#[test]
fn test_port_released_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let server = StaticServer::bind(dir.path()).unwrap();
    let addr = host_port(&server);

    drop(server);
    assert!(TcpStream::connect(&addr).is_err());
}

#[test]
fn test_each_server_gets_its_own_port() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let a = StaticServer::bind(dir.path()).unwrap();
    let b = StaticServer::bind(dir.path()).unwrap();
    assert_ne!(a.origin().port(), b.origin().port());

    a.close();
    b.close();
}
