//! Minimal HTTP/1.1 server on 127.0.0.1 answering canned responses by path.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::thread;

use crate::config::Settings;

/// `(path, status, body)`; the path is matched without its query string.
pub type Route = (String, u16, Vec<u8>);

/// Bind an ephemeral port. Returns the listener and its base URL.
pub fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

/// Answer requests on a background thread until the test process exits.
/// Unknown paths get `404 {"error": "not found"}`.
pub fn serve(listener: TcpListener, routes: Vec<Route>) {
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            respond(stream, &routes);
        }
    });
}

/// Settings pointing both services at `base`.
pub fn settings(base: &str, token_path: &Path) -> Settings {
    let mut settings = Settings::with_token_path(token_path.to_path_buf());
    settings.hub_endpoint = base.to_string();
    settings.datasets_server = base.to_string();
    settings
}

fn respond(mut stream: TcpStream, routes: &[Route]) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
            break;
        }
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target);
    let (status, body) = routes
        .iter()
        .find(|(p, _, _)| p == path)
        .map(|(_, status, body)| (*status, body.clone()))
        .unwrap_or((404, br#"{"error": "not found"}"#.to_vec()));

    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Error",
    };
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).unwrap();
    stream.write_all(&body).unwrap();
    stream.flush().unwrap();
}
