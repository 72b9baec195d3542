//! Service trait definitions for dependency injection
//!
//! All I/O operations are abstracted through these traits for testability

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use shared::{ClientId, ClientMessage, Notification};

use crate::error::RelayResult;
use crate::types::{WorkerRequest, WorkerResponse};

/// Network access to the upstream backend
#[mockall::automock]
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request
    ///
    /// `Err` means no response could be obtained at all (offline, DNS,
    /// refused connection). Any HTTP status, including 5xx, is `Ok`.
    async fn fetch(&self, request: &WorkerRequest) -> RelayResult<WorkerResponse>;
}

/// Named cache buckets holding request-key to response-snapshot entries
#[mockall::automock]
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the bucket if missing; opening an existing name is a no-op
    async fn open(&self, name: &str) -> RelayResult<()>;

    /// Names of every existing bucket
    async fn keys(&self) -> RelayResult<Vec<String>>;

    /// Delete a whole bucket, returning whether it existed
    async fn delete(&self, name: &str) -> RelayResult<bool>;

    /// Look up an entry; a miss is `Ok(None)`, never an error
    async fn match_request(&self, name: &str, key: &str) -> RelayResult<Option<WorkerResponse>>;

    /// Store an entry, replacing any previous entry for the key
    async fn put(&self, name: &str, key: &str, response: WorkerResponse) -> RelayResult<()>;

    /// Remove a single entry, returning whether it existed
    async fn evict(&self, name: &str, key: &str) -> RelayResult<bool>;
}

/// Open client (tab or window) as seen by the broadcast bus
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub id: ClientId,
    /// Whether the client was claimed by this relay instance
    pub controlled: bool,
    sender: mpsc::Sender<ClientMessage>,
}

impl ClientHandle {
    pub fn new(id: ClientId, controlled: bool, sender: mpsc::Sender<ClientMessage>) -> Self {
        Self { id, controlled, sender }
    }

    /// Post without waiting; returns false if the message was not queued
    pub fn post_message(&self, message: ClientMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Registry of every open client of the origin
#[mockall::automock]
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Add a client; `controlled` is false for clients opened before activation
    async fn register(&self, sender: mpsc::Sender<ClientMessage>, controlled: bool) -> ClientId;

    /// Remove a client, returning whether it was registered
    async fn unregister(&self, client_id: ClientId) -> bool;

    /// Every open client, optionally including uncontrolled ones
    async fn match_all(&self, include_uncontrolled: bool) -> Vec<ClientHandle>;

    /// Take control of every open client, returning how many changed
    async fn claim(&self) -> usize;

    /// Number of open clients
    async fn client_count(&self) -> usize;
}

/// Time source in milliseconds since the Unix epoch
#[mockall::automock]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Shows user-visible notifications
#[mockall::automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show the notification, returning how many clients it reached
    async fn show(&self, notification: Notification) -> RelayResult<usize>;
}
