use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::dictionary::Dictionary;

pub mod error;
pub mod middleware;
pub mod routes;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub dictionary: Arc<Dictionary>,
    /// Expected bearer token; `None` disables auth
    pub auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(dictionary: Arc<Dictionary>, auth_token: Option<String>) -> Self {
        Self {
            dictionary,
            auth_token: auth_token.map(Arc::from),
        }
    }
}

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl Server {
    /// Bind the HTTP server to the configured address
    pub async fn bind(config: &Config, dictionary: Arc<Dictionary>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(&config.server_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        if config.auth_token.is_none() {
            warn!("No auth_token configured, dictionary routes are unauthenticated");
        }

        let state = AppState::new(dictionary, config.auth_token.clone());
        let router = routes::build_router(state);

        Ok(Self {
            listener,
            local_addr,
            router,
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until ctrl-c
    pub async fn run(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve requests until `shutdown` resolves, then drain in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server started, listening on {}", self.local_addr);

        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serve_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            server_addr: "127.0.0.1:0".to_string(),
            dictionary_file: dir.path().join("dictionary.txt"),
            ..Config::default()
        };
        let dictionary = Arc::new(Dictionary::new(config.dictionary_file.clone()));
        dictionary.add("cat", "a small feline").await.unwrap();

        let server = Server::bind(&config, dictionary).await.unwrap();
        let addr = server.local_addr();
        assert_ne!(addr.port(), 0);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let serving = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let response = http_get(addr, "/get/cat").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
        assert!(response.contains(r#""definition":"a small feline""#));

        let response = http_get(addr, "/get/dog").await;
        assert!(response.starts_with("HTTP/1.1 404"), "{}", response);

        stop_tx.send(()).unwrap();
        serving.await.unwrap().unwrap();
    }
}
