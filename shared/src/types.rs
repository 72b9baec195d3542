//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an open client (browser tab or window)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relay component that emitted a log line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Router,
    Cache,
    Lifecycle,
    Monitor,
    Broadcast,
    Dispatcher,
    Server,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Router => "router",
            Component::Cache => "cache",
            Component::Lifecycle => "lifecycle",
            Component::Monitor => "monitor",
            Component::Broadcast => "broadcast",
            Component::Dispatcher => "dispatcher",
            Component::Server => "server",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_generation() {
        let id1 = ClientId::new();
        let id2 = ClientId::new();
        assert_ne!(id1, id2, "Client IDs should be unique");
    }

    #[test]
    fn test_client_id_parses_its_display_form() {
        let id = ClientId::new();
        let parsed = ClientId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(ClientId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_component_display() {
        assert_eq!(Component::Monitor.to_string(), "monitor");
        assert_eq!(Component::Router.as_str(), "router");
    }
}
