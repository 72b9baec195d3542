//! Type definitions for the relay
//!
//! Requests and responses as the router sees them, independent of the HTTP
//! stack that carried them in or out.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{RelayError, RelayResult};

/// What the requester intends to do with the response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestDestination {
    /// Top-level navigation
    Document,
    Script,
    Style,
    Image,
    Font,
    Manifest,
    Audio,
    #[default]
    Empty,
    Other(String),
}

impl RequestDestination {
    /// Map a `Sec-Fetch-Dest` header value
    pub fn from_fetch_dest(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "document" => Self::Document,
            "script" => Self::Script,
            "style" => Self::Style,
            "image" => Self::Image,
            "font" => Self::Font,
            "manifest" => Self::Manifest,
            "audio" => Self::Audio,
            "" | "empty" => Self::Empty,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Origin relationship of a response to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Same-origin
    #[default]
    Basic,
    Cors,
    Opaque,
    /// Synthesized locally
    Default,
}

/// Handling strategy picked for an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Network only, cache as last resort; never serve stale pages when online
    AlwaysFresh,
    /// Network first, write-through for successful mutations
    NetworkFirst,
    /// Cache first, fill on same-origin 200
    CacheFirst,
}

/// Which offline body to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineKind {
    Document,
    Api,
    Asset,
}

impl OfflineKind {
    pub fn body(&self) -> &'static str {
        match self {
            OfflineKind::Document => "Offline - página não disponível",
            OfflineKind::Api => "Offline - conecte à internet",
            OfflineKind::Asset => "Recurso não disponível offline",
        }
    }
}

/// Intercepted request
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerRequest {
    pub method: String,
    pub url: Url,
    pub destination: RequestDestination,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl WorkerRequest {
    pub fn new(method: impl AsRef<str>, url: Url) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url,
            destination: RequestDestination::Empty,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    /// POST with a JSON body
    pub fn post_json<T: Serialize>(url: Url, body: &T) -> RelayResult<Self> {
        Ok(Self::new("POST", url)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_vec(body)?))
    }

    pub fn with_destination(mut self, destination: RequestDestination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Cache key: the full request URL
    pub fn cache_key(&self) -> String {
        self.url.as_str().to_string()
    }

    /// GET and HEAD; the only methods a bucket stores or answers
    pub fn is_cacheable_method(&self) -> bool {
        matches!(self.method.as_str(), "GET" | "HEAD")
    }

    /// POST, PUT and PATCH
    pub fn is_mutating(&self) -> bool {
        matches!(self.method.as_str(), "POST" | "PUT" | "PATCH")
    }
}

/// Response snapshot, as returned to the page and as stored in a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub response_type: ResponseType,
}

impl WorkerResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            response_type: ResponseType::Basic,
        }
    }

    /// Synthesized 503 with a plain-text body
    pub fn offline(kind: OfflineKind) -> Self {
        Self {
            status: 503,
            headers: vec![("content-type".to_string(), "text/plain; charset=utf-8".to_string())],
            body: kind.body().as_bytes().to_vec(),
            response_type: ResponseType::Default,
        }
    }

    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Status in 200..=299
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Eligible for cache-first fill: exactly 200 and same-origin
    pub fn is_cacheable_asset(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> RelayResult<T> {
        serde_json::from_slice(&self.body).map_err(RelayError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("http://localhost:8000").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_fetch_dest_mapping() {
        assert_eq!(RequestDestination::from_fetch_dest("document"), RequestDestination::Document);
        assert_eq!(RequestDestination::from_fetch_dest("Document "), RequestDestination::Document);
        assert_eq!(RequestDestination::from_fetch_dest(""), RequestDestination::Empty);
        assert_eq!(
            RequestDestination::from_fetch_dest("iframe"),
            RequestDestination::Other("iframe".to_string())
        );
    }

    #[test]
    fn test_mutating_methods() {
        assert!(WorkerRequest::new("post", url("/v1/tts")).is_mutating());
        assert!(WorkerRequest::new("PUT", url("/v1/tts")).is_mutating());
        assert!(WorkerRequest::new("PATCH", url("/v1/tts")).is_mutating());
        assert!(!WorkerRequest::get(url("/v1/tts")).is_mutating());
        assert!(!WorkerRequest::new("DELETE", url("/v1/tts")).is_mutating());
    }

    #[test]
    fn test_only_get_and_head_are_cacheable() {
        assert!(WorkerRequest::get(url("/app.js")).is_cacheable_method());
        assert!(WorkerRequest::new("head", url("/app.js")).is_cacheable_method());
        assert!(!WorkerRequest::new("POST", url("/obs-config")).is_cacheable_method());
        assert!(!WorkerRequest::new("DELETE", url("/obs-config")).is_cacheable_method());
    }

    #[test]
    fn test_cache_key_is_full_url() {
        let request = WorkerRequest::get(url("/app.js?v=2"));
        assert_eq!(request.cache_key(), "http://localhost:8000/app.js?v=2");
        assert_eq!(request.path(), "/app.js");
    }

    #[test]
    fn test_offline_bodies_are_distinct() {
        let document = WorkerResponse::offline(OfflineKind::Document);
        let api = WorkerResponse::offline(OfflineKind::Api);
        let asset = WorkerResponse::offline(OfflineKind::Asset);

        assert_eq!(document.status, 503);
        assert_eq!(document.header("Content-Type"), Some("text/plain; charset=utf-8"));
        assert_ne!(document.body, api.body);
        assert_ne!(api.body, asset.body);
        assert_ne!(document.body, asset.body);
    }

    #[test]
    fn test_cacheable_asset_requires_200_basic() {
        assert!(WorkerResponse::new(200, "x").is_cacheable_asset());
        assert!(!WorkerResponse::new(204, "").is_cacheable_asset());
        assert!(!WorkerResponse::new(200, "x").with_type(ResponseType::Cors).is_cacheable_asset());
        assert!(!WorkerResponse::new(200, "x").with_type(ResponseType::Opaque).is_cacheable_asset());
    }

    #[test]
    fn test_post_json_sets_body_and_content_type() {
        let request = WorkerRequest::post_json(url("/v1/monitor/read-file"), &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.body, br#"{"a":1}"#.to_vec());
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "content-type" && v == "application/json"));
    }
}
