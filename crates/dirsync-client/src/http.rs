//! reqwest-backed gateway.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use dirsync_core::SyncConfig;

use crate::gateway::{ApiError, ApiResponse, ApiResult, DirectoryApi, Method, SUCCESS_STATUSES};

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Blocking HTTP gateway to the directory API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    api_key_header: String,
    api_key: String,
    client: Client,
}

impl HttpGateway {
    pub fn new(config: &SyncConfig) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(concat!("dirsync/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key_header: config.api_key_header.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

impl DirectoryApi for HttpGateway {
    fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<ApiResponse> {
        debug!("API: {} {}", method, path);

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method.into(), &url)
            .header(ACCEPT, "application/json")
            .header(self.api_key_header.as_str(), self.api_key.as_str());

        if let Some(body) = body {
            debug!("API: {} {} body {}", method, path, body);
            request = request.json(body);
        }

        let response = request.send().map_err(|e| {
            warn!("API: {} {} failed: {}", method, path, e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|e| {
            warn!("API: {} {} returned {} with unreadable body: {}", method, path, status, e);
            ApiError::Transport(e.to_string())
        })?;

        if SUCCESS_STATUSES.contains(&status) {
            Ok(ApiResponse::from_body(&text))
        } else {
            warn!("API: {} {} returns: {} {}", method, path, status, text);
            Err(ApiError::Status { status, body: text })
        }
    }
}
