//! Remote admin/public API contract and HTTP client.
//!
//! # Responsibility
//! - Define the `RemoteApi` seam used by stores and seed providers.
//! - Classify failures into network, status and decode errors.
//!
//! # Invariants
//! - A `204 No Content` or empty body decodes to `Value::Null`.
//! - Identifiers are percent-encoded as single path segments.

use crate::model::collection::CollectionKind;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod http;
pub mod public;

pub use http::HttpApiClient;
pub use public::{ContactSubmission, MessageStatus};

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote API failure.
#[derive(Debug)]
pub enum ApiError {
    /// DNS, connection, timeout or client construction failure.
    Network(String),
    /// Server answered with a non-success status.
    Status { status: u16, body: String },
    /// Response body is not valid JSON.
    Decode(String),
    /// Request rejected before sending.
    InvalidRequest(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::Status { status, body } if body.is_empty() => write!(f, "HTTP {status}"),
            Self::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.to_string())
    }
}

/// REST endpoints consumed by the admin stores.
///
/// Paths are relative to the API root (`{base}/api`).
pub trait RemoteApi {
    /// `GET /admin/{collection}`
    fn fetch_admin(&self, kind: CollectionKind) -> ApiResult<Value>;
    /// `POST /admin/{collection}`
    fn create(&self, kind: CollectionKind, body: &Value) -> ApiResult<Value>;
    /// `PUT /admin/{collection}/{id}`, or `PUT /admin/{collection}` without an id.
    fn update(&self, kind: CollectionKind, id: Option<&str>, body: &Value) -> ApiResult<Value>;
    /// `DELETE /admin/{collection}/{id}`
    fn delete(&self, kind: CollectionKind, id: &str) -> ApiResult<()>;
    /// `GET /public/{key}`
    fn fetch_public(&self, key: &str) -> ApiResult<Value>;
}

impl<T: RemoteApi + ?Sized> RemoteApi for &T {
    fn fetch_admin(&self, kind: CollectionKind) -> ApiResult<Value> {
        (**self).fetch_admin(kind)
    }

    fn create(&self, kind: CollectionKind, body: &Value) -> ApiResult<Value> {
        (**self).create(kind, body)
    }

    fn update(&self, kind: CollectionKind, id: Option<&str>, body: &Value) -> ApiResult<Value> {
        (**self).update(kind, id, body)
    }

    fn delete(&self, kind: CollectionKind, id: &str) -> ApiResult<()> {
        (**self).delete(kind, id)
    }

    fn fetch_public(&self, key: &str) -> ApiResult<Value> {
        (**self).fetch_public(key)
    }
}

impl<T: RemoteApi + ?Sized> RemoteApi for Box<T> {
    fn fetch_admin(&self, kind: CollectionKind) -> ApiResult<Value> {
        (**self).fetch_admin(kind)
    }

    fn create(&self, kind: CollectionKind, body: &Value) -> ApiResult<Value> {
        (**self).create(kind, body)
    }

    fn update(&self, kind: CollectionKind, id: Option<&str>, body: &Value) -> ApiResult<Value> {
        (**self).update(kind, id, body)
    }

    fn delete(&self, kind: CollectionKind, id: &str) -> ApiResult<()> {
        (**self).delete(kind, id)
    }

    fn fetch_public(&self, key: &str) -> ApiResult<Value> {
        (**self).fetch_public(key)
    }
}

/// Offline stand-in used when no API is configured.
///
/// Every call fails with `ApiError::Network`, so stores fall back to local data.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineApi;

impl OfflineApi {
    fn unavailable<T>() -> ApiResult<T> {
        Err(ApiError::Network("offline: no API configured".to_string()))
    }
}

impl RemoteApi for OfflineApi {
    fn fetch_admin(&self, _kind: CollectionKind) -> ApiResult<Value> {
        Self::unavailable()
    }

    fn create(&self, _kind: CollectionKind, _body: &Value) -> ApiResult<Value> {
        Self::unavailable()
    }

    fn update(&self, _kind: CollectionKind, _id: Option<&str>, _body: &Value) -> ApiResult<Value> {
        Self::unavailable()
    }

    fn delete(&self, _kind: CollectionKind, _id: &str) -> ApiResult<()> {
        Self::unavailable()
    }

    fn fetch_public(&self, _key: &str) -> ApiResult<Value> {
        Self::unavailable()
    }
}
