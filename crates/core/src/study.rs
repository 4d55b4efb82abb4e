//! Notes, shared resources and the login session.

use serde::{Deserialize, Serialize};
use crate::id::RecordId;
use crate::Time;

/// A study note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Backend id; absent until created
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Note title
    pub title: String,

    /// Body text
    #[serde(default)]
    pub content: String,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation time, set by the backend
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Time>,
}

impl Note {
    /// Create a new, unsaved note.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            created_at: None,
        }
    }
}

/// A shared study resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Backend id; absent until created
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Display title
    pub title: String,

    /// Where the resource lives
    pub url: String,

    /// Resource kind
    #[serde(default)]
    pub kind: ResourceKind,
}

/// Kind of shared resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Web link
    #[default]
    Link,
    /// Video
    Video,
    /// Document or PDF
    Document,
}

/// Credentials persisted after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token
    pub token: String,

    /// Logged-in user
    #[serde(default)]
    pub username: String,
}
