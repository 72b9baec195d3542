//! HTTP surface of the relay
//!
//! The relay's own endpoints live under `/__relay`; every other request is
//! intercepted by the request router.

pub mod handlers;
