//! Shared types for the Speakerbot offline relay
//!
//! Contains the wire protocol spoken between browser tabs and the relay,
//! the body formats of the backend monitoring endpoint, and the logging
//! setup used by every binary in the workspace.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{
    // Tab -> relay commands
    InboundCommand, MonitorStartPayload, MonitorStateUpdate,

    // Relay -> tab messages
    ClientMessage, FileMonitorUpdate,

    // Backend monitoring endpoint
    ReadFileRequest, ReadFileResponse,

    // Push notifications
    Notification, PushPayload, DEFAULT_NOTIFICATION_BODY, NOTIFICATION_ICON, NOTIFICATION_TITLE,
};
