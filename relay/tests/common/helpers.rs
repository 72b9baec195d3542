//! Test helpers and builder patterns for relay integration tests
//!
//! A [`TestRelay`] runs a real relay on an ephemeral port in front of a
//! wiremock upstream; browser tabs are played by tokio-tungstenite clients.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relay::{RelayConfig, RelayResult, RelayServer};

use super::fixtures::TestFixtures;

pub type TestClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Builder pattern for creating test relays with sensible defaults
pub struct RelayBuilder {
    config: RelayConfig,
}

impl RelayBuilder {
    pub fn new(upstream: &str) -> Self {
        let mut config = RelayConfig::default().with_upstream(Url::parse(upstream).unwrap());
        config.bind_addr = SocketAddr::from(([127, 0, 0, 1], 0));
        config.tick_period = Duration::from_millis(TestFixtures::TICK_MS);
        Self { config }
    }

    /// Relay in front of a mock upstream
    pub fn for_upstream(server: &MockServer) -> Self {
        Self::new(&server.uri())
    }

    pub fn with_precache_assets(mut self, assets: &[&str]) -> Self {
        self.config = self
            .config
            .with_precache_assets(assets.iter().map(|asset| asset.to_string()).collect());
        self
    }

    pub fn with_cache_version(mut self, version: &str) -> Self {
        self.config = self.config.with_cache_version(version);
        self
    }

    /// Build without starting, for tests that prepare storage first
    pub fn build(self) -> RelayServer {
        RelayServer::new(self.config).unwrap()
    }

    pub async fn start(self) -> TestRelay {
        TestRelay::start(self.build()).await
    }
}

/// A relay serving on an ephemeral port
pub struct TestRelay {
    pub server: RelayServer,
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<RelayResult<()>>>,
}

impl TestRelay {
    pub async fn start(server: RelayServer) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel::<()>();

        let handle = tokio::spawn({
            let server = server.clone();
            async move {
                server
                    .serve(listener, async {
                        let _ = signal.await;
                    })
                    .await
            }
        });

        // Ready once the lifecycle has run and the timer is ticking
        let worker = server.worker().clone();
        assert!(
            TestHelpers::wait_for_condition(
                || {
                    let worker = worker.clone();
                    async move { worker.is_activated().await && worker.scheduler().is_running() }
                },
                2_000
            )
            .await,
            "relay did not start"
        );

        Self {
            server,
            addr,
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn connect_client(&self) -> TestClient {
        let (client, _) = connect_async(format!("ws://{}/__relay/ws", self.addr)).await.unwrap();
        client
    }

    pub async fn status(&self) -> Value {
        reqwest::get(self.url("/__relay/status")).await.unwrap().json().await.unwrap()
    }

    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(mut handle) = self.handle.take() {
            match tokio::time::timeout(Duration::from_secs(5), &mut handle).await {
                Ok(result) => result.unwrap().unwrap(),
                // Open sockets can hold up graceful shutdown
                Err(_) => handle.abort(),
            }
        }
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Wait until `condition` holds or the timeout elapses
    pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            if condition().await {
                return true;
            }

            if start.elapsed() > timeout {
                return false;
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Serve the monitoring endpoint with `body`, at most `times` times when given
    pub async fn mount_poll(server: &MockServer, body: Value, times: Option<u64>) {
        let mock = Mock::given(method("POST"))
            .and(path(TestFixtures::MONITOR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body));
        match times {
            Some(times) => mock.up_to_n_times(times).mount(server).await,
            None => mock.mount(server).await,
        }
    }

    /// Requests the upstream received on the monitoring endpoint
    pub async fn poll_count(server: &MockServer) -> usize {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == TestFixtures::MONITOR_PATH)
            .count()
    }

    pub async fn send_command(client: &mut TestClient, command: Value) {
        client.send(Message::Text(command.to_string())).await.unwrap();
    }

    /// Next JSON text frame, or None on timeout
    pub async fn next_message(client: &mut TestClient, timeout_ms: u64) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let frame = tokio::time::timeout_at(deadline, client.next()).await.ok()??.ok()?;
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).ok();
            }
        }
    }
}
