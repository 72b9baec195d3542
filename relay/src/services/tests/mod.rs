//! Service tests for the relay
//!
//! This module contains tests for every real service implementation.

pub mod fixtures;
pub mod helpers;
pub mod client_registry;
