//! Cross-tab message protocol
//!
//! Inbound: `{type, payload}` commands from any tab to the relay.
//! Outbound: `{type, data}` messages from the relay to every tab.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::push::Notification;
use crate::errors::{SharedError, SharedResult};

/// Payload of `START_FILE_MONITORING`
///
/// Every field is optional on the wire; defaults are applied by the relay
/// when the command is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorStartPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_random_voice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_line_count: Option<u64>,
}

impl MonitorStartPayload {
    pub fn for_file(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval = Some(interval_ms);
        self
    }

    pub fn with_last_line_count(mut self, count: u64) -> Self {
        self.last_line_count = Some(count);
        self
    }
}

/// Payload of `UPDATE_FILE_MONITOR_STATE`: a partial overwrite
///
/// Absent fields leave the corresponding state untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorStateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_line_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_random_voice: Option<bool>,
}

impl MonitorStateUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Command sent by a tab to the relay
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundCommand {
    StartFileMonitoring(MonitorStartPayload),
    StopFileMonitoring,
    UpdateFileMonitorState(MonitorStateUpdate),
}

#[derive(Debug, Deserialize)]
struct CommandEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl InboundCommand {
    pub const START_FILE_MONITORING: &'static str = "START_FILE_MONITORING";
    pub const STOP_FILE_MONITORING: &'static str = "STOP_FILE_MONITORING";
    pub const UPDATE_FILE_MONITOR_STATE: &'static str = "UPDATE_FILE_MONITOR_STATE";

    /// Decode a command from its JSON value
    ///
    /// Returns `Ok(None)` for a well-formed envelope whose type is not a
    /// monitoring command; those are ignored rather than rejected.
    pub fn from_value(value: Value) -> SharedResult<Option<Self>> {
        if !value.is_object() {
            return Err(SharedError::ProtocolError {
                message: format!("expected a JSON object, got {value}"),
            });
        }

        let envelope: CommandEnvelope = serde_json::from_value(value)?;
        let payload = match envelope.payload {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let command = match envelope.kind.as_str() {
            Self::START_FILE_MONITORING => Self::StartFileMonitoring(serde_json::from_value(payload)?),
            Self::STOP_FILE_MONITORING => Self::StopFileMonitoring,
            Self::UPDATE_FILE_MONITOR_STATE => Self::UpdateFileMonitorState(serde_json::from_value(payload)?),
            _ => return Ok(None),
        };

        Ok(Some(command))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::StartFileMonitoring(_) => Self::START_FILE_MONITORING,
            Self::StopFileMonitoring => Self::STOP_FILE_MONITORING,
            Self::UpdateFileMonitorState(_) => Self::UPDATE_FILE_MONITOR_STATE,
        }
    }
}

/// Lines discovered by one successful poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMonitorUpdate {
    pub new_lines: Vec<String>,
    pub total_lines: u64,
}

/// Message posted by the relay to every open tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    FileMonitorUpdate(FileMonitorUpdate),
    ShowNotification(Notification),
}

impl ClientMessage {
    pub fn file_monitor_update(new_lines: Vec<String>, total_lines: u64) -> Self {
        Self::FileMonitorUpdate(FileMonitorUpdate { new_lines, total_lines })
    }

    pub fn to_json(&self) -> SharedResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
