//! Test fixtures for relay service tests

use shared::ClientMessage;
use tokio::sync::mpsc;
use url::Url;

use crate::types::{WorkerRequest, WorkerResponse};

pub const TEST_BUCKET: &str = "speakerbot-v1";

/// Absolute URL on the test origin
pub fn test_url(path: &str) -> Url {
    Url::parse("http://localhost:8000").unwrap().join(path).unwrap()
}

pub fn create_test_request(path: &str) -> WorkerRequest {
    WorkerRequest::get(test_url(path))
}

pub fn create_test_response(body: &str) -> WorkerResponse {
    WorkerResponse::new(200, body).with_header("content-type", "text/plain")
}

/// Client channel with room for a few messages
pub fn create_client_channel() -> (mpsc::Sender<ClientMessage>, mpsc::Receiver<ClientMessage>) {
    mpsc::channel(16)
}

pub fn create_test_update() -> ClientMessage {
    ClientMessage::file_monitor_update(vec!["olá".to_string(), "mundo".to_string()], 2)
}
