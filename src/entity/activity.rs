// src/entity/activity.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityId, CategoryId, SkillId};
use crate::error::{Result, SkilltrackError};

/// Something done under a skill, optionally filed in a category.
///
/// The category link is soft: deleting the category leaves the activity in
/// place with `category = None`. The skill link is hard: deleting the skill
/// deletes the activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub category: Option<CategoryId>,
    pub skill: SkillId,
    pub description: String,
    pub add_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl Activity {
    pub const TITLE_MAX_LEN: usize = 128;

    pub fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(SkilltrackError::Validation(
                "activity title must not be empty".to_string(),
            ));
        }
        if title.len() > Self::TITLE_MAX_LEN {
            return Err(SkilltrackError::Validation(format!(
                "activity title too long: {} characters (max {})",
                title.len(),
                Self::TITLE_MAX_LEN
            )));
        }
        Ok(())
    }
}
