//! Comment records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::principal::PrincipalId;

/// Identifier of a comment, assigned by the remote store.
///
/// Remote stores may hand out integer keys; both JSON strings and integers
/// are accepted and the id is always carried as a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for CommentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CommentId(s),
            RawId::Unsigned(n) => CommentId(n.to_string()),
            RawId::Signed(n) => CommentId(n.to_string()),
        })
    }
}

/// A comment attached to one page.
///
/// Only the most recent edit is recorded: `modified_at` and `modified_by`
/// are overwritten by each edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: PrincipalId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<PrincipalId>,
}

impl Comment {
    /// A freshly created, never-edited comment.
    pub fn new(
        id: impl Into<CommentId>,
        content: impl Into<String>,
        author: impl Into<PrincipalId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            author: author.into(),
            created_at,
            modified_at: None,
            modified_by: None,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.modified_at.is_some()
    }

    pub fn is_authored_by(&self, principal: &PrincipalId) -> bool {
        &self.author == principal
    }

    /// Record an edit, replacing any previous edit marker.
    pub fn apply_edit(
        &mut self,
        content: impl Into<String>,
        editor: PrincipalId,
        at: DateTime<Utc>,
    ) {
        self.content = content.into();
        self.modified_at = Some(at);
        self.modified_by = Some(editor);
    }
}
