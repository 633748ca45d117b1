// src/entity/skill.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, SkillId, UserId};
use crate::error::{Result, SkilltrackError};

/// A skill being tracked. `(owner, name)` is unique; the category set is a
/// many-to-many association that survives category renames but drops rows
/// when a category is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub owner: UserId,
    pub name: String,
    pub categories: Vec<CategoryId>,
    pub add_date: DateTime<Utc>,
}

impl Skill {
    pub const NAME_MAX_LEN: usize = 128;

    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SkilltrackError::Validation(
                "skill name must not be empty".to_string(),
            ));
        }
        if name.len() > Self::NAME_MAX_LEN {
            return Err(SkilltrackError::Validation(format!(
                "skill name too long: {} characters (max {})",
                name.len(),
                Self::NAME_MAX_LEN
            )));
        }
        Ok(())
    }
}
