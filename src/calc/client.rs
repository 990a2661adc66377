use crate::calc::wire::{CalculateRequest, CalculateResponse};
use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

pub const CALCULATE_PATH: &str = "/calculate";

/// Failure at the remote calculation boundary. Requests are all-or-nothing,
/// so every variant means "no usable result".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    Encode(String),
    Transport(String),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(msg) => write!(f, "could not encode sketch: {msg}"),
            Self::Transport(msg) => write!(f, "calculation request failed: {msg}"),
            Self::Status(code) => write!(f, "calculation service answered with status {code}"),
            Self::Decode(msg) => write!(f, "unreadable calculation response: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// The opaque recogniser/solver behind the calculate button.
pub trait Solver: Send + Sync {
    fn solve(&self, request: &CalculateRequest) -> Result<CalculateResponse, RemoteError>;
}

pub struct HttpSolver {
    client: Client,
    endpoint: String,
}

impl HttpSolver {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("sketch-calc")
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint_for(api_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn endpoint_for(api_url: &str) -> String {
    format!("{}{CALCULATE_PATH}", api_url.trim_end_matches('/'))
}

impl Solver for HttpSolver {
    fn solve(&self, request: &CalculateRequest) -> Result<CalculateResponse, RemoteError> {
        let body =
            serde_json::to_vec(request).map_err(|err| RemoteError::Encode(err.to_string()))?;
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let text = resp
            .text()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        tracing::debug!(bytes = text.len(), "calculation response received");
        serde_json::from_str(&text).map_err(|err| RemoteError::Decode(err.to_string()))
    }
}
