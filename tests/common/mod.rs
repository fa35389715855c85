//! A minimal OpenAI-compatible completion server for driving the binary.
//!
//! Serves `GET /v1/models` and streaming `POST /v1/completions` on a
//! background thread. Records every completion request body and the
//! `Authorization` header of every request.
#![allow(dead_code, clippy::unwrap_used)]

use serde_json::{Value, json};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub const MODEL: &str = "NousResearch/Llama-2-7b-chat-hf";

/// How the stub answers one completion request.
pub enum Completion {
    Text(String),
    Status(u16, String),
}

type Responder = dyn Fn(usize, &str) -> Completion + Send + Sync;

/// Request path and `Authorization` header value, in arrival order.
pub type AuthLog = Vec<(String, Option<String>)>;

pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<AuthLog>>,
}

impl StubServer {
    /// Starts a server that lists `models` and answers completions with
    /// `respond(call_index, prompt)`.
    pub fn start(
        models: &[&str],
        respond: impl Fn(usize, &str) -> Completion + Send + Sync + 'static,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let auth = Arc::new(Mutex::new(Vec::new()));

        let models: Vec<String> = models.iter().map(ToString::to_string).collect();
        let recorded = Arc::clone(&requests);
        let auth_log = Arc::clone(&auth);
        let respond: Box<Responder> = Box::new(respond);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let _ = handle(stream, &models, &recorded, &auth_log, respond.as_ref());
            }
        });

        Self {
            url,
            requests,
            auth,
        }
    }

    /// A server for [`MODEL`] that echoes each prompt back.
    pub fn echo() -> Self {
        Self::start(&[MODEL], |_, prompt| {
            Completion::Text(format!("reply to [{prompt}]"))
        })
    }

    pub fn completion_requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn authorization_headers(&self) -> AuthLog {
        self.auth.lock().unwrap().clone()
    }
}

/// Returns a local URL where nothing is listening.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn handle(
    stream: TcpStream,
    models: &[String],
    requests: &Mutex<Vec<Value>>,
    auth: &Mutex<AuthLog>,
    respond: &Responder,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut content_length = 0;
    let mut authorization = None;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header)?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
    auth.lock().unwrap().push((path, authorization));

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;

    let mut stream = stream;
    if request_line.starts_with("GET /v1/models") {
        let data: Vec<Value> = models
            .iter()
            .map(|id| json!({ "id": id, "object": "model" }))
            .collect();
        let body = json!({ "object": "list", "data": data }).to_string();
        write_response(&mut stream, 200, "application/json", &body)
    } else if request_line.starts_with("POST /v1/completions") {
        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let prompt = request["prompt"].as_str().unwrap_or_default().to_string();
        let index = {
            let mut recorded = requests.lock().unwrap();
            recorded.push(request);
            recorded.len() - 1
        };

        match respond(index, &prompt) {
            Completion::Text(text) => {
                write_response(&mut stream, 200, "text/event-stream", &sse_body(&text))
            }
            Completion::Status(status, body) => {
                write_response(&mut stream, status, "text/plain", &body)
            }
        }
    } else {
        write_response(&mut stream, 404, "text/plain", "not found")
    }
}

/// Splits the reply over two events so clients must reassemble it.
fn sse_body(text: &str) -> String {
    let middle = text.chars().count() / 2;
    let split = text.char_indices().nth(middle).map_or(text.len(), |(i, _)| i);

    let mut body = String::new();
    for piece in [&text[..split], &text[split..]] {
        let event = json!({ "choices": [{ "index": 0, "text": piece }] });
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn write_response(
    stream: &mut TcpStream,
    status: u16,
    content_type: &str,
    body: &str,
) -> io::Result<()> {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    };
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}
