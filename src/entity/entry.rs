// src/entity/entry.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityId, EntryId};

/// Payload of an activity entry, discriminated by an explicit `kind` tag.
///
/// Attachments carry an opaque file reference; actual byte storage lives
/// outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryContent {
    Comment { text: String },
    Attachment { file_ref: String },
}

impl EntryContent {
    /// The discriminant stored in the `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryContent::Comment { .. } => "comment",
            EntryContent::Attachment { .. } => "attachment",
        }
    }

    /// The single body value stored alongside the discriminant.
    pub fn body(&self) -> &str {
        match self {
            EntryContent::Comment { text } => text,
            EntryContent::Attachment { file_ref } => file_ref,
        }
    }

    /// Rebuild from the stored `(kind, body)` pair.
    pub fn from_parts(kind: &str, body: &str) -> Option<Self> {
        match kind {
            "comment" => Some(EntryContent::Comment {
                text: body.to_string(),
            }),
            "attachment" => Some(EntryContent::Attachment {
                file_ref: body.to_string(),
            }),
            _ => None,
        }
    }
}

/// A free-form note or attachment hung off an activity. Entries only ever
/// surface nested under their activity; there is no standalone listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: EntryId,
    pub activity: ActivityId,
    pub content: EntryContent,
    pub add_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}
