//! Local servers and fetchers for network tests

use std::sync::Arc;
use std::time::Duration;

use livecheck::fetch::{Fetcher, StaticCredentials};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Fetcher without credentials and with a short timeout
pub fn test_fetcher(timeout: Duration) -> Fetcher {
    Fetcher::with_timeout(Arc::new(StaticCredentials::new()), timeout)
}

/// A server that accepts connections and never answers
pub async fn spawn_hanging_server() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    (format!("http://{}", addr), handle)
}

/// URL of a port nothing listens on
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{}/index.html", addr)
}
