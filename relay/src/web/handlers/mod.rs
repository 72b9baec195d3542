//! HTTP and WebSocket handlers

pub mod control;
pub mod proxy;
pub mod websocket;

pub use control::{health_check, push_handler, status_handler, sync_handler};
pub use proxy::proxy_handler;
pub use websocket::websocket_handler;
