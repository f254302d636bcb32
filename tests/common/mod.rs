//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use console_request::config::{CodeList, ConsoleConfig};
use console_request::http::ReqwestTransport;
use console_request::notify::{ModalRequest, Presenter};

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(socket);

    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await.ok()?;

    Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// success={"0000"}, logout={"9999"}, modal={"7777"}, expired={"1001"}.
pub fn config_for(addr: SocketAddr) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.service.base_url = format!("http://{addr}");
    config.service.success_codes = CodeList::from_csv("0000");
    config.service.logout_codes = CodeList::from_csv("9999");
    config.service.modal_logout_codes = CodeList::from_csv("7777");
    config.service.expired_token_codes = CodeList::from_csv("1001");
    config
}

/// Non-pooled transport so every exchange opens a fresh connection.
pub fn transport() -> Arc<ReqwestTransport> {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    Arc::new(ReqwestTransport::with_client(client))
}

/// Presenter that keeps every modal (unacknowledged) and every toast.
#[derive(Default)]
pub struct RecordingPresenter {
    pub modals: Mutex<Vec<ModalRequest>>,
    pub toasts: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    pub fn modal_count(&self) -> usize {
        self.modals.lock().unwrap().len()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.toasts.lock().unwrap().clone()
    }

    /// Acknowledge every open modal, as a user clicking "confirm".
    pub fn acknowledge_all(&self) {
        let modals: Vec<_> = self.modals.lock().unwrap().drain(..).collect();
        for modal in modals {
            modal.acknowledgement.acknowledge();
        }
    }
}

impl Presenter for RecordingPresenter {
    fn show_modal(&self, modal: ModalRequest) {
        self.modals.lock().unwrap().push(modal);
    }

    fn show_toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }
}
