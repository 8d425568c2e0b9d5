//! Transport seam between the controllers and the HTTP library
//!
//! A [`Transport`] only moves bytes. Status classification and JSON decoding
//! happen here, so the error taxonomy does not depend on the HTTP client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::query::with_query;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Outgoing request, relative to the API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`, e.g. `/items/5`
    pub path: String,
    /// Encoded query string without the leading `?`
    pub query: String,
    /// JSON body
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: query.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            query: String::new(),
            body: None,
        }
    }

    pub fn post_json<B: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &B,
    ) -> ClientResult<Self> {
        let body = serde_json::to_string(body).map_err(|e| ClientError::Encode {
            message: e.to_string(),
        })?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            query: String::new(),
            body: Some(body),
        })
    }

    /// Path plus query, as it appears after the base URL
    pub fn target(&self) -> String {
        with_query(&self.path, &self.query)
    }
}

impl std::fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.target())
    }
}

/// Raw response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with [`ClientError::Status`] unless the status is 2xx
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decode a 2xx JSON body
    pub fn json<T: DeserializeOwned>(self) -> ClientResult<T> {
        let response = self.error_for_status()?;
        serde_json::from_str(&response.body).map_err(|e| ClientError::Parse {
            message: e.to_string(),
        })
    }
}

/// The request never produced a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<TransportError> for ClientError {
    fn from(error: TransportError) -> Self {
        ClientError::Transport {
            message: error.message,
        }
    }
}

/// Sends one request and returns whatever the server answered
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Send and decode a JSON response
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> ClientResult<T> {
    log::debug!("{}", request);
    let response = transport.send(request).await?;
    response.json()
}

/// Send and only check the status
pub async fn fetch_empty(transport: &dyn Transport, request: ApiRequest) -> ClientResult<()> {
    log::debug!("{}", request);
    transport.send(request).await?.error_for_status()?;
    Ok(())
}
