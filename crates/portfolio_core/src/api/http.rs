//! Blocking HTTP implementation of `RemoteApi`.

use super::{ApiError, ApiResult, RemoteApi};
use crate::config::PortfolioConfig;
use crate::logging::single_line;
use crate::model::collection::CollectionKind;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Instant;

const MAX_LOGGED_BODY_CHARS: usize = 200;

/// JSON-over-HTTP client rooted at `{base_url}/api`.
pub struct HttpApiClient {
    client: Client,
    api_root: String,
    auth_token: Option<String>,
}

impl HttpApiClient {
    /// Builds a client from the API section of `config`.
    pub fn from_config(config: &PortfolioConfig) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            client,
            api_root: format!("{}/api", config.api_base_url.trim_end_matches('/')),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Absolute URL for a path relative to the API root.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    pub(crate) fn get(&self, path: &str) -> ApiResult<Value> {
        self.send(Method::GET, path, None)
    }

    pub(crate) fn post(&self, path: &str, body: &Value) -> ApiResult<Value> {
        self.send(Method::POST, path, Some(body))
    }

    pub(crate) fn put(&self, path: &str, body: &Value) -> ApiResult<Value> {
        self.send(Method::PUT, path, Some(body))
    }

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<Value> {
        let started_at = Instant::now();
        let url = self.url(path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|err| {
            warn!(
                "event=api_request module=api status=error method={} path={} duration_ms={} error={}",
                method,
                path,
                started_at.elapsed().as_millis(),
                err
            );
            ApiError::from(err)
        })?;

        let status = response.status();
        let text = response.text()?;
        debug!(
            "event=api_request module=api status=done method={} path={} http_status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            started_at.elapsed().as_millis()
        );

        if !status.is_success() {
            warn!(
                "event=api_request module=api status=rejected method={} path={} http_status={} body={}",
                method,
                path,
                status.as_u16(),
                single_line(&text, MAX_LOGGED_BODY_CHARS)
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_body(status, &text)
    }
}

fn decode_body(status: StatusCode, text: &str) -> ApiResult<Value> {
    if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|err| ApiError::Decode(err.to_string()))
}

/// `{collection}/{percent-encoded id}`
pub(crate) fn item_path(prefix: &str, key: &str, id: &str) -> String {
    format!("{prefix}/{key}/{}", urlencoding::encode(id))
}

impl RemoteApi for HttpApiClient {
    fn fetch_admin(&self, kind: CollectionKind) -> ApiResult<Value> {
        self.get(&format!("admin/{}", kind.key()))
    }

    fn create(&self, kind: CollectionKind, body: &Value) -> ApiResult<Value> {
        self.post(&format!("admin/{}", kind.key()), body)
    }

    fn update(&self, kind: CollectionKind, id: Option<&str>, body: &Value) -> ApiResult<Value> {
        let path = match id {
            Some(id) => item_path("admin", kind.key(), id),
            None => format!("admin/{}", kind.key()),
        };
        self.put(&path, body)
    }

    fn delete(&self, kind: CollectionKind, id: &str) -> ApiResult<()> {
        self.send(Method::DELETE, &item_path("admin", kind.key(), id), None)
            .map(|_| ())
    }

    fn fetch_public(&self, key: &str) -> ApiResult<Value> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::InvalidRequest("empty public resource key".to_string()));
        }
        self.get(&format!("public/{}", urlencoding::encode(key)))
    }
}
