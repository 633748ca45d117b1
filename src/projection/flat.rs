// src/projection/flat.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dict::Keyed;
use crate::entity::{
    Activity, ActivityEntry, ActivityId, Category, CategoryId, EntryContent, EntryId, Skill,
    SkillId,
};

/// Flat category shape. The owner is never serialized to clients; it is
/// implied by the authenticated actor.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryFlat {
    pub id: CategoryId,
    pub name: String,
    pub is_base_category: bool,
    pub display_order: i32,
}

impl From<&Category> for CategoryFlat {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            is_base_category: c.is_base_category,
            display_order: c.display_order,
        }
    }
}

impl Keyed for CategoryFlat {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Flat skill shape with categories as bare ids.
#[derive(Debug, Clone, Serialize)]
pub struct SkillFlat {
    pub id: SkillId,
    pub name: String,
    pub categories: Vec<CategoryId>,
    pub add_date: DateTime<Utc>,
}

impl From<&Skill> for SkillFlat {
    fn from(s: &Skill) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            categories: s.categories.clone(),
            add_date: s.add_date,
        }
    }
}

impl Keyed for SkillFlat {
    fn key(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityFlat {
    pub id: ActivityId,
    pub title: String,
    pub category: Option<CategoryId>,
    pub skill: SkillId,
    pub description: String,
    pub add_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl From<&Activity> for ActivityFlat {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            category: a.category,
            skill: a.skill,
            description: a.description.clone(),
            add_date: a.add_date,
            modify_date: a.modify_date,
        }
    }
}

impl Keyed for ActivityFlat {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Flat entry shape. The activity id is write-only on the wire; entries only
/// appear nested under their activity.
#[derive(Debug, Clone, Serialize)]
pub struct EntryFlat {
    pub id: EntryId,
    #[serde(flatten)]
    pub content: EntryContent,
    pub add_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl From<&ActivityEntry> for EntryFlat {
    fn from(e: &ActivityEntry) -> Self {
        Self {
            id: e.id,
            content: e.content.clone(),
            add_date: e.add_date,
            modify_date: e.modify_date,
        }
    }
}

impl Keyed for EntryFlat {
    fn key(&self) -> i64 {
        self.id
    }
}
