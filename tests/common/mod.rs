//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crawler_trap::{HttpServer, ServerConfig, Shutdown};

/// Start a mock upstream that returns a fixed body and counts the
/// connections it accepts.
pub async fn start_mock_upstream(response: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            response.len(),
                            response
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

/// Start a mock upstream that records the head of every request it sees.
#[allow(dead_code)]
pub async fn start_recording_upstream() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let heads = Arc::new(Mutex::new(Vec::new()));
    let recorder = heads.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let recorder = recorder.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        recorder
                            .lock()
                            .unwrap()
                            .push(String::from_utf8_lossy(&buf[..n]).to_string());
                        let _ = socket
                            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                            .await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, heads)
}

/// Spawn the trap proxy on an ephemeral port with the given rules text.
pub async fn spawn_proxy(rules_text: &str, upstream: SocketAddr) -> (SocketAddr, Shutdown) {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.address = upstream.to_string();
    config.trap.rules = Some(rules_text.to_string());

    let rules = config.build_ruleset().unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(&config, rules);
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    (addr, shutdown)
}
