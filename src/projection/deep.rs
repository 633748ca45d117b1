// src/projection/deep.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::flat::{ActivityFlat, EntryFlat};
use crate::entity::{
    Activity, ActivityEntry, ActivityId, Category, CategoryId, Skill, SkillId,
};

/// Category summary as nested inside a skill: no owner, no base flag.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInSkill {
    pub id: CategoryId,
    pub name: String,
    pub display_order: i32,
}

impl From<&Category> for CategoryInSkill {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            display_order: c.display_order,
        }
    }
}

/// Deep skill view: categories and activities expanded inline. Read-only.
#[derive(Debug, Clone, Serialize)]
pub struct SkillDeep {
    pub id: SkillId,
    pub name: String,
    pub add_date: DateTime<Utc>,
    pub categories: Vec<CategoryInSkill>,
    pub activities: Vec<ActivityFlat>,
}

impl SkillDeep {
    pub fn assemble(skill: &Skill, categories: &[Category], activities: &[Activity]) -> Self {
        Self {
            id: skill.id,
            name: skill.name.clone(),
            add_date: skill.add_date,
            categories: categories.iter().map(CategoryInSkill::from).collect(),
            activities: activities.iter().map(ActivityFlat::from).collect(),
        }
    }
}

/// Deep activity view: entries expanded inline, newest modification first.
/// Read-only.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityDeep {
    pub id: ActivityId,
    pub title: String,
    pub category: Option<CategoryId>,
    pub skill: SkillId,
    pub description: String,
    pub add_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
    pub entries: Vec<EntryFlat>,
}

impl ActivityDeep {
    pub fn assemble(activity: &Activity, entries: &[ActivityEntry]) -> Self {
        Self {
            id: activity.id,
            title: activity.title.clone(),
            category: activity.category,
            skill: activity.skill,
            description: activity.description.clone(),
            add_date: activity.add_date,
            modify_date: activity.modify_date,
            entries: entries.iter().map(EntryFlat::from).collect(),
        }
    }
}
