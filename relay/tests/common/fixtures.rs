//! Test fixtures and data for relay integration tests

use serde_json::{json, Value};

/// Standard test data and fixtures
pub struct TestFixtures;

#[allow(dead_code)]
impl TestFixtures {
    pub const BUCKET: &'static str = "speakerbot-v1";
    pub const STALE_BUCKET: &'static str = "speakerbot-v0";
    pub const MONITOR_PATH: &'static str = "/v1/monitor/read-file";
    pub const LOG_FILE: &'static str = "log.txt";

    /// Fast timer so tests do not wait on the production cadence
    pub const TICK_MS: u64 = 20;

    /// Upstream that refuses every connection
    pub const DEAD_UPSTREAM: &'static str = "http://127.0.0.1:1/";

    /// Successful poll body
    pub fn poll_success(total_lines: u64, new_lines: &[&str]) -> Value {
        json!({
            "success": true,
            "total_lines": total_lines,
            "new_lines": new_lines
        })
    }

    /// Poll body reporting an application failure
    pub fn poll_rejected() -> Value {
        json!({
            "success": false,
            "error": "Arquivo não encontrado",
            "total_lines": 0,
            "new_lines": []
        })
    }

    pub fn start_command(interval: u64) -> Value {
        json!({
            "type": "START_FILE_MONITORING",
            "payload": {
                "file_path": Self::LOG_FILE,
                "interval": interval,
                "language": "pt",
                "voice": "narrador"
            }
        })
    }

    pub fn stop_command() -> Value {
        json!({"type": "STOP_FILE_MONITORING"})
    }

    pub fn manifest() -> Value {
        json!({
            "name": "Speakerbot",
            "short_name": "Speakerbot",
            "start_url": "/"
        })
    }
}
