mod activity;
mod category;
mod entry;
mod skill;

pub use activity::Activity;
pub use category::Category;
pub use entry::{ActivityEntry, EntryContent};
pub use skill::Skill;

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type CategoryId = i64;
pub type SkillId = i64;
pub type ActivityId = i64;
pub type EntryId = i64;

/// An authentication principal. Authentication itself happens outside this
/// crate; the row exists to anchor ownership of categories and skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}
