// src/service/entries.rs
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::entity::{ActivityId, EntryContent, EntryId, UserId};
use crate::error::{Result, SkilltrackError};
use crate::projection::EntryFlat;
use crate::store::SqliteStore;

/// Entry payload. The activity comes from the nested route, never from the
/// body.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryInput {
    #[serde(flatten)]
    pub content: EntryContent,
}

impl EntryInput {
    /// Attachments without a file reference get an opaque handle minted
    /// server-side; byte storage happens elsewhere.
    fn into_content(self) -> EntryContent {
        match self.content {
            EntryContent::Attachment { file_ref } if file_ref.is_empty() => {
                EntryContent::Attachment {
                    file_ref: Uuid::new_v4().to_string(),
                }
            }
            other => other,
        }
    }
}

pub fn create(
    store: &SqliteStore,
    actor: UserId,
    activity: ActivityId,
    input: EntryInput,
) -> Result<EntryFlat> {
    if store.get_activity(actor, activity)?.is_none() {
        return Err(SkilltrackError::NotFound(format!("activity {}", activity)));
    }

    let content = input.into_content();
    let id = store.add_entry(activity, &content, Utc::now())?;
    tracing::debug!(entry = id, activity, "entry created");

    let entry = store
        .get_entry(actor, activity, id)?
        .ok_or_else(|| SkilltrackError::Storage("created entry vanished".to_string()))?;
    Ok(EntryFlat::from(&entry))
}

pub fn update(
    store: &SqliteStore,
    actor: UserId,
    activity: ActivityId,
    id: EntryId,
    input: EntryInput,
) -> Result<EntryFlat> {
    if store.get_entry(actor, activity, id)?.is_none() {
        return Err(SkilltrackError::NotFound(format!("entry {}", id)));
    }

    let content = input.into_content();
    store.update_entry(id, &content, Utc::now())?;

    let entry = store
        .get_entry(actor, activity, id)?
        .ok_or_else(|| SkilltrackError::Storage("updated entry vanished".to_string()))?;
    Ok(EntryFlat::from(&entry))
}

pub fn delete(
    store: &SqliteStore,
    actor: UserId,
    activity: ActivityId,
    id: EntryId,
) -> Result<()> {
    if store.get_entry(actor, activity, id)?.is_none() {
        return Err(SkilltrackError::NotFound(format!("entry {}", id)));
    }
    store.delete_entry(id)?;
    tracing::debug!(entry = id, activity, "entry deleted");
    Ok(())
}
