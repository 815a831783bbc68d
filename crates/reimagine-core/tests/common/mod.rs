//! Minimal in-process HTTP responder for exercising the real reqwest clients.
//!
//! Serves canned responses by path, one request per connection, and records
//! every request it receives.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone)]
struct Route {
    path: String,
    status: u16,
    content_type: String,
    body: Vec<u8>,
    /// Written as-is instead of a generated status line and headers
    raw: Option<Vec<u8>>,
}

#[derive(Clone, Default)]
struct State {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockServer {
    pub base_url: String,
    state: State,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = State::default();

        let accept_state = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = accept_state.clone();
                tokio::spawn(async move {
                    let _ = handle(stream, state).await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Answer `path` with a JSON body.
    pub fn json(&self, path: &str, status: u16, body: &str) {
        self.route(path, status, "application/json", body.as_bytes());
    }

    pub fn route(&self, path: &str, status: u16, content_type: &str, body: &[u8]) {
        self.state.routes.lock().unwrap().push(Route {
            path: path.to_string(),
            status,
            content_type: content_type.to_string(),
            body: body.to_vec(),
            raw: None,
        });
    }

    /// Answer `path` with a hand-written response, headers included.
    pub fn raw(&self, path: &str, response: &[u8]) {
        self.state.routes.lock().unwrap().push(Route {
            path: path.to_string(),
            status: 0,
            content_type: String::new(),
            body: Vec::new(),
            raw: Some(response.to_vec()),
        });
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn handle(mut stream: TcpStream, state: State) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(body_start + content_length);
    let body = buf[body_start..body_end].to_vec();

    let route = state
        .routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.path == path)
        .cloned();

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body,
    });

    let route = route.unwrap_or(Route {
        path: String::new(),
        status: 404,
        content_type: "text/plain".to_string(),
        body: b"no route".to_vec(),
        raw: None,
    });

    if let Some(raw) = route.raw {
        stream.write_all(&raw).await?;
        stream.flush().await?;
        return stream.shutdown().await;
    }

    let head = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        route.content_type,
        route.body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&route.body).await?;
    stream.flush().await?;
    stream.shutdown().await
}
