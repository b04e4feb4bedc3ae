//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use chrysalis::config::ProxyConfig;
use chrysalis::http::HttpServer;
use chrysalis::lifecycle::Shutdown;

/// Handle to a spawned mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    calls: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Number of connections the backend has accepted.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Request heads received so far, in arrival order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Assemble a raw HTTP/1.1 response for the mock backend to replay.
pub fn http_response(status_line: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status_line}\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!(
        "content-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    ));
    response
}

/// Start a mock backend that answers every request with the given raw
/// response and records what it received.
pub async fn spawn_backend(raw_response: &str) -> MockBackend {
    spawn_backend_with_delay(raw_response, Duration::ZERO).await
}

/// Same, but waits before responding; used to trip the upstream timeout.
#[allow(dead_code)]
pub async fn spawn_backend_with_delay(raw_response: &str, delay: Duration) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let response = raw_response.to_string();
    let (calls_bg, requests_bg) = (calls.clone(), requests.clone());

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            calls_bg.fetch_add(1, Ordering::SeqCst);

            let response = response.clone();
            let requests = requests_bg.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                requests
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buf[..n]).into_owned());

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockBackend {
        addr,
        calls,
        requests,
    }
}

/// Base configuration pointing at the given backend, with the canonical
/// public destination used across the tests.
pub fn proxy_config(backend: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.destination = "https://public.example.com".to_string();
    config.upstream.backend = format!("http://{backend}");
    config
}

/// Start the proxy on an ephemeral port.
///
/// The returned Shutdown must be kept alive for the duration of the test;
/// dropping it stops the server.
pub async fn spawn_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("server should assemble from a valid config");
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// HTTP client that behaves like a faithful proxy test harness: no
/// redirect following, no environment proxies.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
