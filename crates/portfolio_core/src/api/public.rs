//! Read-only site endpoints, contact form and message inbox.
//!
//! These are thin typed wrappers over `HttpApiClient`; they do not touch
//! local storage and are not part of the hybrid store flow.

use super::http::item_path;
use super::{ApiError, ApiResult, HttpApiClient};
use crate::model::collection::normalize_list;
use crate::model::item::{ContentItem, ItemId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Contact form payload accepted by `POST /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Checks required fields before anything is sent.
    pub fn validate(&self) -> ApiResult<()> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ApiError::InvalidRequest(format!("`{field}` is required")));
        }
        if !self.email.contains('@') {
            return Err(ApiError::InvalidRequest(format!(
                "`{}` is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}

/// Inbox state of a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    New,
    Read,
    Replied,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Some(Self::New),
            "read" => Some(Self::Read),
            "replied" => Some(Self::Replied),
            _ => None,
        }
    }
}

impl HttpApiClient {
    /// `GET /{collection}` on the public site API.
    pub fn public_list(&self, collection: &str) -> ApiResult<Vec<ContentItem>> {
        self.get(collection.trim_matches('/')).map(into_items)
    }

    /// `GET /{collection}/{id}`
    pub fn public_item(&self, collection: &str, id: &str) -> ApiResult<ContentItem> {
        self.get(&item_path("", collection.trim_matches('/'), id))
            .and_then(into_item)
    }

    /// `GET /{collection}/featured` (projects and blog).
    pub fn featured(&self, collection: &str) -> ApiResult<Vec<ContentItem>> {
        self.get(&format!("{}/featured", collection.trim_matches('/')))
            .map(into_items)
    }

    /// `GET /blog`, optionally limited.
    pub fn blog_posts(&self, limit: Option<u32>) -> ApiResult<Vec<ContentItem>> {
        let path = match limit {
            Some(limit) => format!("blog?limit={limit}"),
            None => "blog".to_string(),
        };
        self.get(&path).map(into_items)
    }

    /// `GET /blog/{slug}`
    pub fn blog_post_by_slug(&self, slug: &str) -> ApiResult<ContentItem> {
        self.get(&item_path("", "blog", slug)).and_then(into_item)
    }

    /// `POST /contact`; returns the server-assigned message id when present.
    pub fn submit_contact(&self, submission: &ContactSubmission) -> ApiResult<Option<ItemId>> {
        submission.validate()?;
        let body = serde_json::to_value(submission)
            .map_err(|err| ApiError::InvalidRequest(err.to_string()))?;
        let response = self.post("contact", &body)?;
        Ok(ContentItem::from_value(response).and_then(|item| item.normalized().id()))
    }

    /// `GET /admin/messages`
    pub fn messages(&self) -> ApiResult<Vec<ContentItem>> {
        self.get("admin/messages").map(into_items)
    }

    /// `PUT /admin/messages/{id}` with `{ "status": ... }`.
    pub fn update_message_status(&self, id: &str, status: MessageStatus) -> ApiResult<()> {
        self.put(
            &item_path("admin", "messages", id),
            &json!({ "status": status.as_str() }),
        )
        .map(|_| ())
    }
}

fn into_items(value: Value) -> Vec<ContentItem> {
    match value {
        Value::Array(entries) => normalize_list(entries),
        _ => Vec::new(),
    }
}

fn into_item(value: Value) -> ApiResult<ContentItem> {
    ContentItem::from_value(value)
        .map(ContentItem::normalized)
        .ok_or_else(|| ApiError::Decode("expected a JSON object".to_string()))
}

#[cfg(test)]
mod tests {
    use super::{ContactSubmission, MessageStatus};
    use crate::api::ApiError;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Nice site".to_string(),
        }
    }

    #[test]
    fn validate_accepts_complete_submission() {
        submission().validate().unwrap();
    }

    #[test]
    fn validate_rejects_blank_fields_and_bad_email() {
        let mut blank = submission();
        blank.subject = "  ".to_string();
        let err = blank.validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(ref m) if m.contains("subject")));

        let mut bad_email = submission();
        bad_email.email = "nobody".to_string();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn message_status_parses_known_values() {
        assert_eq!(MessageStatus::parse(" Replied "), Some(MessageStatus::Replied));
        assert_eq!(MessageStatus::parse("archived"), None);
        assert_eq!(MessageStatus::Read.as_str(), "read");
    }
}
