//! Content item: one record of an admin collection.
//!
//! # Responsibility
//! - Wrap a JSON object without imposing a per-collection schema.
//! - Normalize identifiers (`_id` → `id`) and derive post slugs.
//!
//! # Invariants
//! - An item is always a JSON object.
//! - `id()` never returns an empty string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

static NON_SLUG_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

const ID_FIELD: &str = "id";
const ALT_ID_FIELD: &str = "_id";
const GENERATED_ID_LEN: usize = 12;

/// Stable identifier of a content item in string form.
///
/// Numeric identifiers coming from the API compare by their decimal text.
pub type ItemId = String;

/// A single content record (project, post, skill, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentItem(Map<String, Value>);

impl ContentItem {
    /// Creates an empty item without an identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty item carrying `id`.
    pub fn with_id(id: impl Into<String>) -> Self {
        let mut item = Self::new();
        item.set(ID_FIELD, Value::String(id.into()));
        item
    }

    /// Wraps a JSON value; returns `None` for anything but an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder-style field setter.
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the item identifier, reading `id` first and `_id` second.
    pub fn id(&self) -> Option<ItemId> {
        id_text(self.0.get(ID_FIELD)).or_else(|| id_text(self.0.get(ALT_ID_FIELD)))
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id().as_deref() == Some(id)
    }

    /// Copies `_id` into `id` when the primary identifier is absent.
    pub fn normalized(mut self) -> Self {
        if id_text(self.0.get(ID_FIELD)).is_none() {
            if let Some(alt) = self.0.get(ALT_ID_FIELD).cloned() {
                if id_text(Some(&alt)).is_some() {
                    self.0.insert(ID_FIELD.to_string(), alt);
                }
            }
        }
        self
    }

    /// Fills `slug` from `title` when the slug is missing or blank.
    pub fn ensure_slug(&mut self) {
        let has_slug = self
            .get("slug")
            .and_then(Value::as_str)
            .is_some_and(|slug| !slug.trim().is_empty());
        if has_slug {
            return;
        }
        if let Some(title) = self.get("title").and_then(Value::as_str) {
            let slug = slugify(title);
            if !slug.is_empty() {
                self.set("slug", Value::String(slug));
            }
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Generates a short random identifier for locally created items.
pub fn new_item_id() -> ItemId {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(GENERATED_ID_LEN);
    id
}

/// Lowercases `title` and joins its ASCII alphanumeric runs with `-`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_SLUG_CHARS_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

fn id_text(value: Option<&Value>) -> Option<ItemId> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{new_item_id, slugify, ContentItem};
    use serde_json::json;

    #[test]
    fn normalized_copies_underscore_id() {
        let item = ContentItem::from_value(json!({"_id": "abc", "title": "x"}))
            .unwrap()
            .normalized();
        assert_eq!(item.get("id"), Some(&json!("abc")));
        assert_eq!(item.id().as_deref(), Some("abc"));
    }

    #[test]
    fn normalized_keeps_primary_id() {
        let item = ContentItem::from_value(json!({"id": "primary", "_id": "mongo"}))
            .unwrap()
            .normalized();
        assert_eq!(item.id().as_deref(), Some("primary"));
    }

    #[test]
    fn empty_primary_id_is_replaced() {
        let item = ContentItem::from_value(json!({"id": "", "_id": 7}))
            .unwrap()
            .normalized();
        assert_eq!(item.id().as_deref(), Some("7"));
    }

    #[test]
    fn non_objects_are_not_items() {
        assert!(ContentItem::from_value(json!([1, 2])).is_none());
        assert!(ContentItem::from_value(json!("text")).is_none());
    }

    #[test]
    fn slug_is_derived_only_when_missing() {
        let mut post = ContentItem::with_id("p1").field("title", "Hello, Rust World!");
        post.ensure_slug();
        assert_eq!(post.get("slug"), Some(&json!("hello-rust-world")));

        let mut custom = ContentItem::with_id("p2")
            .field("title", "Other")
            .field("slug", "keep-me");
        custom.ensure_slug();
        assert_eq!(custom.get("slug"), Some(&json!("keep-me")));
    }

    #[test]
    fn slugify_collapses_symbols() {
        assert_eq!(slugify("  C++ & Rust -- notes "), "c-rust-notes");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn generated_ids_are_short_and_distinct() {
        let a = new_item_id();
        let b = new_item_id();
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
    }
}
