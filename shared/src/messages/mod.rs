//! Message types for the relay
//!
//! This module organizes all wire messages by channel:
//! - `client`: browser tab ↔ relay commands and updates
//! - `monitor`: relay ↔ backend file monitoring endpoint
//! - `push`: push event payloads and the notifications they produce

pub mod client;
pub mod monitor;
pub mod push;

pub use client::{ClientMessage, FileMonitorUpdate, InboundCommand, MonitorStartPayload, MonitorStateUpdate};

pub use monitor::{ReadFileRequest, ReadFileResponse};

pub use push::{Notification, PushPayload, DEFAULT_NOTIFICATION_BODY, NOTIFICATION_ICON, NOTIFICATION_TITLE};
