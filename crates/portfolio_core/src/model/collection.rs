//! Admin collections and their in-memory values.
//!
//! # Responsibility
//! - Enumerate the managed collections and their storage keys.
//! - Convert raw JSON into list or singleton values.
//! - Provide the built-in defaults used as the last seed source.
//!
//! # Invariants
//! - `settings` is the only singleton collection.
//! - Shape conversion never fails; incompatible input yields the default.

use crate::model::item::{new_item_id, ContentItem, ItemId};
use log::warn;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const STORAGE_KEY_PREFIX: &str = "portfolio_";

/// Structural shape of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    List,
    Record,
}

/// One managed content collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    Overview,
    Projects,
    Posts,
    Skills,
    Experience,
    Settings,
}

impl CollectionKind {
    /// All collections in admin-panel order.
    pub const ALL: [CollectionKind; 6] = [
        Self::Overview,
        Self::Projects,
        Self::Posts,
        Self::Skills,
        Self::Experience,
        Self::Settings,
    ];

    /// Resource name used in API paths and static file names.
    pub fn key(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Projects => "projects",
            Self::Posts => "posts",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Settings => "settings",
        }
    }

    /// Local storage key holding the persisted snapshot.
    pub fn storage_key(self) -> String {
        format!("{STORAGE_KEY_PREFIX}{}", self.key())
    }

    pub fn shape(self) -> Shape {
        match self {
            Self::Settings => Shape::Record,
            _ => Shape::List,
        }
    }

    /// Built-in value used when no other seed source answers.
    pub fn default_value(self) -> CollectionValue {
        let items = match self {
            Self::Settings => {
                return CollectionValue::Record(item(json!({
                    "siteTitle": "Portfolio",
                    "defaultDark": false
                })))
            }
            Self::Overview => vec![
                item(json!({"id": new_item_id(), "label": "Total Projects", "value": 6})),
                item(json!({"id": new_item_id(), "label": "Blog Posts", "value": 3})),
                item(json!({"id": new_item_id(), "label": "Years Experience", "value": 2})),
            ],
            Self::Projects => vec![item(json!({
                "id": new_item_id(),
                "title": "My Portfolio",
                "tagline": "React + Tailwind responsive site",
                "url": "https://example.com",
                "repo": "https://github.com/you/portfolio",
                "tech": ["React", "Tailwind"],
                "description": "Clean UI, dark mode, sections for projects/skills/blog."
            }))],
            Self::Posts => vec![item(json!({
                "id": new_item_id(),
                "title": "Getting started with my portfolio",
                "slug": "hello-world",
                "date": "2025-01-01",
                "excerpt": "Why I built it and how it works.",
                "content": "Long form content..."
            }))],
            Self::Skills => vec![
                skill("JavaScript", 90, "Frontend"),
                skill("React", 85, "Frontend"),
                skill("Python", 80, "Backend"),
            ],
            Self::Experience => vec![item(json!({
                "id": new_item_id(),
                "company": "Acme Corp",
                "role": "Frontend Developer",
                "start": "2023-01",
                "end": "2024-06",
                "location": "Remote",
                "description": "Built reusable UI components and optimized performance."
            }))],
        };
        CollectionValue::List(items)
    }
}

impl Display for CollectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Unknown collection name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCollection(pub String);

impl Display for UnknownCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown collection `{}`; expected overview|projects|posts|skills|experience|settings",
            self.0
        )
    }
}

impl Error for UnknownCollection {}

impl FromStr for CollectionKind {
    type Err = UnknownCollection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == normalized)
            .ok_or(UnknownCollection(normalized))
    }
}

/// In-memory value of a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionValue {
    List(Vec<ContentItem>),
    Record(ContentItem),
}

impl CollectionValue {
    pub fn shape(&self) -> Shape {
        match self {
            Self::List(_) => Shape::List,
            Self::Record(_) => Shape::Record,
        }
    }

    /// Checks whether raw JSON fits the shape of `self`.
    ///
    /// Lists require an array; records require an object.
    pub fn is_compatible(&self, raw: &Value) -> bool {
        match self {
            Self::List(_) => raw.is_array(),
            Self::Record(_) => raw.is_object(),
        }
    }

    /// Builds a normalized value of the same shape as `self` from raw JSON.
    ///
    /// Incompatible input yields a clone of `self`.
    pub fn conform(&self, raw: Value) -> CollectionValue {
        match (self, raw) {
            (Self::List(_), Value::Array(entries)) => Self::List(normalize_list(entries)),
            (Self::Record(_), raw @ Value::Object(_)) => {
                Self::Record(ContentItem::from_value(raw).unwrap_or_default().normalized())
            }
            _ => self.clone(),
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        match self {
            Self::List(items) => items,
            Self::Record(record) => std::slice::from_ref(record),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&ContentItem> {
        self.items().iter().find(|item| item.has_id(id))
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items().iter().filter_map(ContentItem::id).collect()
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::List(items) => {
                Value::Array(items.iter().cloned().map(ContentItem::into_value).collect())
            }
            Self::Record(record) => record.clone().into_value(),
        }
    }
}

/// Normalizes every object entry; non-object entries are dropped.
pub fn normalize_list(entries: Vec<Value>) -> Vec<ContentItem> {
    let total = entries.len();
    let items: Vec<ContentItem> = entries
        .into_iter()
        .filter_map(ContentItem::from_value)
        .map(ContentItem::normalized)
        .collect();
    if items.len() != total {
        warn!(
            "event=normalize_list module=model status=partial dropped={}",
            total - items.len()
        );
    }
    items
}

fn item(value: Value) -> ContentItem {
    ContentItem::from_value(value).unwrap_or_default()
}

fn skill(name: &str, level: u8, category: &str) -> ContentItem {
    item(json!({"id": new_item_id(), "name": name, "level": level, "category": category}))
}
