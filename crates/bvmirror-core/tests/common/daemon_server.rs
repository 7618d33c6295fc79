//! Minimal HTTP/1.1 server speaking the daemon JSON API for integration tests.
//!
//! Serves the envelope `{code, msg, data}` protocol: info, resolve, create
//! task, task list, task info, delete all. Resolve requests for URLs
//! containing "missing" answer with a nonzero code.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Bodies of create-task requests, in arrival order.
pub type CreatedTasks = Arc<Mutex<Vec<serde_json::Value>>>;

/// Starts a daemon stub in a background thread. Returns the base URL and a
/// handle to the recorded create-task bodies. Runs until the process exits.
pub fn start() -> (String, CreatedTasks) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let created: CreatedTasks = Arc::new(Mutex::new(Vec::new()));
    let created_srv = Arc::clone(&created);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let created = Arc::clone(&created_srv);
            thread::spawn(move || handle(stream, &created));
        }
    });
    (format!("http://127.0.0.1:{}", port), created)
}

fn handle(mut stream: std::net::TcpStream, created: &CreatedTasks) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    loop {
        let Some((method, target, body)) = read_request(&mut stream) else {
            return;
        };
        let path = target.split('?').next().unwrap_or("");
        let response_body = route(&method, path, &body, created);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            response_body.len(),
            response_body
        );
        if stream.write_all(response.as_bytes()).is_err() {
            return;
        }
    }
}

/// Reads one request: request line, headers, and a Content-Length body.
fn read_request(stream: &mut std::net::TcpStream) -> Option<(String, String, Vec<u8>)> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        if let Some(pos) = find_header_end(&raw) {
            break pos;
        }
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body: Vec<u8> = raw[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    body.truncate(content_length);
    Some((method, target, body))
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

fn route(method: &str, path: &str, body: &[u8], created: &CreatedTasks) -> String {
    match (method, path) {
        ("GET", "/api/v1/info") => {
            r#"{"code":0,"msg":"","data":{"version":"1.0.0-test"}}"#.to_string()
        }
        ("POST", "/api/v1/resolve") => {
            let request: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
            let url = request["req"]["url"].as_str().unwrap_or("");
            if url.contains("missing") {
                return r#"{"code":1,"msg":"resource not found","data":null}"#.to_string();
            }
            let filename = url.rsplit('/').next().unwrap_or("file");
            format!(
                r#"{{"code":0,"msg":"","data":{{"id":"rid-1","res":{{"files":[{{"name":"{filename}"}}]}}}}}}"#
            )
        }
        ("POST", "/api/v1/tasks") => {
            let request: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
            created.lock().unwrap().push(request);
            r#"{"code":0,"msg":"","data":"task-1"}"#.to_string()
        }
        ("GET", "/api/v1/tasks/task-1") => {
            r#"{"code":0,"msg":"","data":{"id":"task-1","status":"done"}}"#.to_string()
        }
        ("GET", "/api/v1/tasks") => {
            r#"{"code":0,"msg":"","data":[{"id":"task-1","status":"running"}]}"#.to_string()
        }
        ("DELETE", "/api/v1/tasks") => r#"{"code":0,"msg":"","data":null}"#.to_string(),
        _ => r#"{"code":404,"msg":"no such endpoint","data":null}"#.to_string(),
    }
}
