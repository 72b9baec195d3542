//! Interception of every non-relay request
//!
//! Converts between axum's types and the router's request/response
//! snapshots. The router itself never fails, so the only error path here is
//! a request whose URL cannot be mapped onto the upstream.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use shared::{component_warn, Component};

use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::relay_impl::AppState;
use crate::services::is_hop_by_hop;
use crate::types::{RequestDestination, WorkerRequest, WorkerResponse};

const FETCH_DEST_HEADER: &str = "sec-fetch-dest";

pub async fn proxy_handler(
    State(worker): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match to_worker_request(worker.config(), &method, &uri, &headers, body) {
        Ok(request) => into_response(worker.handle_fetch(request).await),
        Err(e) => {
            component_warn!(Component::Server, "⚠️ Rejected request {} {}: {}", method, uri, e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Map an incoming request onto the upstream origin
pub fn to_worker_request(
    config: &RelayConfig,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Bytes,
) -> RelayResult<WorkerRequest> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = config.upstream_url(path_and_query)?;

    let destination = headers
        .get(FETCH_DEST_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(RequestDestination::from_fetch_dest)
        .unwrap_or_default();

    let mut request = WorkerRequest::new(method.as_str(), url)
        .with_destination(destination)
        .with_body(body.to_vec());
    for (name, value) in headers.iter().filter(|(name, _)| !is_hop_by_hop(name.as_str())) {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    Ok(request)
}

/// Turn a response snapshot into an axum response, dropping unusable headers
pub fn into_response(response: WorkerResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut headers = HeaderMap::new();
    for (name, value) in &response.headers {
        if is_hop_by_hop(name) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            headers.append(name, value);
        }
    }

    (status, headers, Body::from(response.body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OfflineKind, ResponseType};

    #[test]
    fn test_request_mapping() {
        let config = RelayConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("accept", HeaderValue::from_static("text/html"));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));

        let uri: Uri = "/index.html?lang=pt".parse().unwrap();
        let request = to_worker_request(&config, &Method::GET, &uri, &headers, Bytes::new()).unwrap();

        assert_eq!(request.method, "GET");
        assert_eq!(request.url.as_str(), "http://127.0.0.1:8000/index.html?lang=pt");
        assert_eq!(request.destination, RequestDestination::Document);
        assert!(request.headers.iter().any(|(name, _)| name == "accept"));
        assert!(!request.headers.iter().any(|(name, _)| name == "connection"));
    }

    #[test]
    fn test_request_without_fetch_dest() {
        let config = RelayConfig::default();
        let uri: Uri = "/v1/tts".parse().unwrap();
        let request = to_worker_request(&config, &Method::POST, &uri, &HeaderMap::new(), Bytes::from_static(b"{}")).unwrap();

        assert_eq!(request.destination, RequestDestination::Empty);
        assert!(request.is_mutating());
        assert_eq!(request.body, b"{}".to_vec());
    }

    #[test]
    fn test_offline_response_conversion() {
        let response = into_response(WorkerResponse::offline(OfflineKind::Api));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_invalid_headers_are_dropped() {
        let snapshot = WorkerResponse::new(200, "ok")
            .with_type(ResponseType::Cors)
            .with_header("x-ok", "1")
            .with_header("bad header", "x")
            .with_header("transfer-encoding", "chunked");

        let response = into_response(snapshot);
        assert_eq!(response.headers().get("x-ok").unwrap(), "1");
        assert_eq!(response.headers().len(), 1);
    }
}
