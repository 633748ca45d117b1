// src/service/skills.rs
use chrono::Utc;
use serde::Deserialize;

use crate::entity::{CategoryId, Skill, SkillId, UserId};
use crate::error::{Result, SkilltrackError};
use crate::projection::{by_id, CategoryFlat, SkillDeep, SkillFlat, SkillListing};
use crate::store::SqliteStore;

#[derive(Debug, Clone, Deserialize)]
pub struct SkillInput {
    pub name: String,
    /// When absent, all of the actor's base categories are attached.
    #[serde(default)]
    pub categories: Option<Vec<CategoryId>>,
}

/// Rename payload. Category membership changes go through
/// [`add_category`] / [`remove_category`], never through update.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillUpdate {
    pub name: String,
}

/// Dictionary listing of the actor's skills plus the categories referenced
/// by at least one of them.
pub fn list(store: &SqliteStore, actor: UserId) -> Result<SkillListing> {
    let skills = store.list_skills(actor)?;
    let categories = store.categories_in_skills(actor)?;

    Ok(SkillListing {
        skills: by_id(skills.iter().map(SkillFlat::from).collect()),
        categories: by_id(categories.iter().map(CategoryFlat::from).collect()),
    })
}

pub fn create(store: &SqliteStore, actor: UserId, input: SkillInput) -> Result<SkillFlat> {
    Skill::validate_name(&input.name)?;

    if store.skill_name_exists(actor, &input.name, None)? {
        return Err(SkilltrackError::Validation(format!(
            "skill '{}' already exists",
            input.name
        )));
    }

    // Resolve the category set before touching anything: explicit ids must
    // exist in the actor's scope, absence means the actor's base categories.
    let category_ids = match &input.categories {
        Some(ids) => {
            for &id in ids {
                if store.get_category(actor, id)?.is_none() {
                    return Err(SkilltrackError::NotFound("Category not found".to_string()));
                }
            }
            ids.clone()
        }
        None => store.base_category_ids(actor)?,
    };

    let id = store.add_skill(actor, &input.name, &category_ids, Utc::now())?;
    tracing::debug!(skill = id, owner = actor, "skill created");

    let skill = store
        .get_skill(actor, id)?
        .ok_or_else(|| SkilltrackError::Storage("created skill vanished".to_string()))?;
    Ok(SkillFlat::from(&skill))
}

/// Deep view: nested category summaries and the flat activities under the
/// skill.
pub fn retrieve(store: &SqliteStore, actor: UserId, id: SkillId) -> Result<SkillDeep> {
    let skill = store
        .get_skill(actor, id)?
        .ok_or_else(|| SkilltrackError::NotFound(format!("skill {}", id)))?;

    let mut categories = Vec::with_capacity(skill.categories.len());
    for &category_id in &skill.categories {
        if let Some(category) = store.get_category(actor, category_id)? {
            categories.push(category);
        }
    }
    let activities = store.list_activities_for_skill(id)?;

    Ok(SkillDeep::assemble(&skill, &categories, &activities))
}

pub fn retrieve_flat(store: &SqliteStore, actor: UserId, id: SkillId) -> Result<SkillFlat> {
    let skill = store
        .get_skill(actor, id)?
        .ok_or_else(|| SkilltrackError::NotFound(format!("skill {}", id)))?;
    Ok(SkillFlat::from(&skill))
}

pub fn update(
    store: &SqliteStore,
    actor: UserId,
    id: SkillId,
    input: SkillUpdate,
) -> Result<SkillFlat> {
    Skill::validate_name(&input.name)?;

    if store.skill_name_exists(actor, &input.name, Some(id))? {
        return Err(SkilltrackError::Validation(format!(
            "skill '{}' already exists",
            input.name
        )));
    }

    if !store.rename_skill(actor, id, &input.name)? {
        return Err(SkilltrackError::NotFound(format!("skill {}", id)));
    }
    retrieve_flat(store, actor, id)
}

/// Deletes the skill and, through it, all of its activities and entries.
pub fn delete(store: &SqliteStore, actor: UserId, id: SkillId) -> Result<()> {
    if !store.delete_skill(actor, id)? {
        return Err(SkilltrackError::NotFound(format!("skill {}", id)));
    }
    tracing::debug!(skill = id, owner = actor, "skill deleted");
    Ok(())
}

pub fn add_category(
    store: &SqliteStore,
    actor: UserId,
    skill_id: SkillId,
    category_id: CategoryId,
) -> Result<()> {
    let (skill, category) = category_and_skill(store, actor, skill_id, category_id)?;
    store.attach_category(skill, category)?;
    Ok(())
}

pub fn remove_category(
    store: &SqliteStore,
    actor: UserId,
    skill_id: SkillId,
    category_id: CategoryId,
) -> Result<()> {
    let (skill, category) = category_and_skill(store, actor, skill_id, category_id)?;
    store.detach_category(skill, category)?;
    Ok(())
}

fn category_and_skill(
    store: &SqliteStore,
    actor: UserId,
    skill_id: SkillId,
    category_id: CategoryId,
) -> Result<(SkillId, CategoryId)> {
    if store.get_category(actor, category_id)?.is_none() {
        return Err(SkilltrackError::NotFound("Category not found".to_string()));
    }
    if store.get_skill(actor, skill_id)?.is_none() {
        return Err(SkilltrackError::NotFound(format!("skill {}", skill_id)));
    }
    Ok((skill_id, category_id))
}
