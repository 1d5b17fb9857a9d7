//! Minimal HTTP server for exercising the fetcher against real sockets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

#[derive(Clone)]
pub enum Reply {
    Respond { status: u16, body: String },
    /// Accept the connection, then close it without answering.
    Hangup,
    /// Accept the connection and never answer.
    Stall,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Respond { status: 200, body: body.to_owned() }
    }
}

pub struct TestServer {
    pub url: Url,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    pub async fn start(reply: Reply) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(serve(socket, reply.clone()));
            }
        });
        TestServer {
            url: Url::parse(&format!("http://{}/services/rest/", addr)).unwrap(),
            hits,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Address nothing listens on.
pub async fn refused_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/services/rest/", addr)).unwrap()
}

async fn serve(mut socket: TcpStream, reply: Reply) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    match reply {
        Reply::Respond { status, body } => {
            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body,
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        },
        Reply::Hangup => drop(socket),
        Reply::Stall => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            drop(socket);
        },
    }
}
