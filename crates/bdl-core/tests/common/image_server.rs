//! Minimal HTTP/1.1 server that serves a fixed image body for integration tests.
//!
//! `GET /img/{index}` returns 200 with the body, unless `index` is listed in
//! `failing_indices`, in which case it returns 500. Any other path is a 404.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct ImageServerOptions {
    /// Indices answered with `500 Internal Server Error`.
    pub failing_indices: Vec<usize>,
}

/// Handle to a running server. It runs until the process exits.
pub struct ImageServer {
    pub base_url: String,
    requests: Arc<AtomicUsize>,
}

impl ImageServer {
    /// URL template understood by `HttpSource`.
    pub fn template(&self) -> String {
        format!("{}img/{{index}}?w={{width}}&h={{height}}", self.base_url)
    }

    /// Requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

pub fn start(body: Vec<u8>) -> ImageServer {
    start_with_options(body, ImageServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ImageServerOptions) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &body, &opts, &counter));
        }
    });
    ImageServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: &ImageServerOptions,
    counter: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    counter.fetch_add(1, Ordering::SeqCst);
    let (method, path) = parse_request_line(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    let index = path
        .split('?')
        .next()
        .and_then(|p| p.strip_prefix("/img/"))
        .and_then(|i| i.parse::<usize>().ok());
    match index {
        Some(i) if opts.failing_indices.contains(&i) => {
            let msg = b"server error";
            let response = format!(
                "HTTP/1.1 500 Internal Server Error\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                msg.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(msg);
        }
        Some(_) => {
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    }
}

/// Returns (method, path) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    (method, path)
}
