//! Upstream network access via reqwest

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

use crate::error::{RelayError, RelayResult};
use crate::traits::Network;
use crate::types::{ResponseType, WorkerRequest, WorkerResponse};

/// Headers that describe a single connection and are never forwarded
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|hop| hop.eq_ignore_ascii_case(name))
}

/// Real network implementation
///
/// Responses whose final URL (after redirects) shares the upstream origin
/// are typed `Basic`; anything else is `Cors`.
#[derive(Debug, Clone)]
pub struct RealNetwork {
    client: reqwest::Client,
    upstream: Url,
}

impl RealNetwork {
    pub fn new(upstream: Url) -> Self {
        Self::with_client(reqwest::Client::new(), upstream)
    }

    pub fn with_client(client: reqwest::Client, upstream: Url) -> Self {
        Self { client, upstream }
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }
}

#[async_trait]
impl Network for RealNetwork {
    async fn fetch(&self, request: &WorkerRequest) -> RelayResult<WorkerResponse> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| RelayError::invalid_request(format!("unsupported method {}", request.method)))?;

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in request.headers.iter().filter(|(name, _)| !is_hop_by_hop(name)) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RelayError::transport(request.url.as_str(), e.to_string()))?;

        let response_type = if response.url().origin() == self.upstream.origin() {
            ResponseType::Basic
        } else {
            ResponseType::Cors
        };
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !is_hop_by_hop(name.as_str()))
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::transport(request.url.as_str(), e.to_string()))?;

        Ok(WorkerResponse {
            status,
            headers,
            body: body.to_vec(),
            response_type,
        })
    }
}
