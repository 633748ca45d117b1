// src/entity/category.rs
use serde::{Deserialize, Serialize};

use super::{CategoryId, UserId};
use crate::error::{Result, SkilltrackError};

/// A user-owned grouping for skills and activities.
///
/// Categories flagged `is_base_category` are attached to every new skill the
/// owner creates without explicit categories, and cannot be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub owner: UserId,
    pub name: String,
    pub is_base_category: bool,
    pub display_order: i32,
}

impl Category {
    pub const ORDER_MIN: i32 = -100;
    pub const ORDER_MAX: i32 = 100;
    pub const NAME_MAX_LEN: usize = 128;

    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SkilltrackError::Validation(
                "category name must not be empty".to_string(),
            ));
        }
        if name.len() > Self::NAME_MAX_LEN {
            return Err(SkilltrackError::Validation(format!(
                "category name too long: {} characters (max {})",
                name.len(),
                Self::NAME_MAX_LEN
            )));
        }
        Ok(())
    }

    pub fn validate_display_order(order: i32) -> Result<()> {
        if !(Self::ORDER_MIN..=Self::ORDER_MAX).contains(&order) {
            return Err(SkilltrackError::Validation(format!(
                "display_order {} out of range [{}, {}]",
                order,
                Self::ORDER_MIN,
                Self::ORDER_MAX
            )));
        }
        Ok(())
    }
}
