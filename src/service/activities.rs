// src/service/activities.rs
use chrono::Utc;
use serde::Deserialize;

use super::{clamp_paging, Page};
use crate::entity::{Activity, ActivityId, CategoryId, SkillId, UserId};
use crate::error::{Result, SkilltrackError};
use crate::projection::{ActivityDeep, ActivityFlat};
use crate::store::SqliteStore;

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityInput {
    pub title: String,
    pub skill: SkillId,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub description: String,
}

impl ActivityInput {
    /// Title validation plus scope checks on the referenced skill and
    /// category.
    fn validate(&self, store: &SqliteStore, actor: UserId) -> Result<()> {
        Activity::validate_title(&self.title)?;

        if store.get_skill(actor, self.skill)?.is_none() {
            return Err(SkilltrackError::NotFound(format!("skill {}", self.skill)));
        }
        if let Some(category) = self.category {
            if store.get_category(actor, category)?.is_none() {
                return Err(SkilltrackError::NotFound("Category not found".to_string()));
            }
        }
        Ok(())
    }
}

pub fn list(store: &SqliteStore, actor: UserId) -> Result<Vec<ActivityFlat>> {
    let activities = store.list_activities(actor)?;
    Ok(activities.iter().map(ActivityFlat::from).collect())
}

pub fn create(store: &SqliteStore, actor: UserId, input: ActivityInput) -> Result<ActivityFlat> {
    input.validate(store, actor)?;

    let id = store.add_activity(
        input.skill,
        input.category,
        &input.title,
        &input.description,
        Utc::now(),
    )?;
    tracing::debug!(activity = id, skill = input.skill, "activity created");

    let activity = store
        .get_activity(actor, id)?
        .ok_or_else(|| SkilltrackError::Storage("created activity vanished".to_string()))?;
    Ok(ActivityFlat::from(&activity))
}

/// Deep view: entries nested inline, newest modification first.
pub fn retrieve(store: &SqliteStore, actor: UserId, id: ActivityId) -> Result<ActivityDeep> {
    let activity = store
        .get_activity(actor, id)?
        .ok_or_else(|| SkilltrackError::NotFound(format!("activity {}", id)))?;
    let entries = store.entries_for_activity(id)?;
    Ok(ActivityDeep::assemble(&activity, &entries))
}

pub fn retrieve_flat(store: &SqliteStore, actor: UserId, id: ActivityId) -> Result<ActivityFlat> {
    let activity = store
        .get_activity(actor, id)?
        .ok_or_else(|| SkilltrackError::NotFound(format!("activity {}", id)))?;
    Ok(ActivityFlat::from(&activity))
}

/// Full replace. `modify_date` is bumped; `add_date` never changes.
pub fn update(
    store: &SqliteStore,
    actor: UserId,
    id: ActivityId,
    input: ActivityInput,
) -> Result<ActivityFlat> {
    if store.get_activity(actor, id)?.is_none() {
        return Err(SkilltrackError::NotFound(format!("activity {}", id)));
    }
    input.validate(store, actor)?;

    store.update_activity(
        id,
        input.skill,
        input.category,
        &input.title,
        &input.description,
        Utc::now(),
    )?;
    retrieve_flat(store, actor, id)
}

/// Deletes the activity and all of its entries.
pub fn delete(store: &SqliteStore, actor: UserId, id: ActivityId) -> Result<()> {
    if !store.delete_activity(actor, id)? {
        return Err(SkilltrackError::NotFound(format!("activity {}", id)));
    }
    tracing::debug!(activity = id, "activity deleted");
    Ok(())
}

/// The actor's activities, most recently modified first, paginated.
pub fn recent(
    store: &SqliteStore,
    actor: UserId,
    page: Option<u64>,
    per_page: Option<u64>,
) -> Result<Page<ActivityFlat>> {
    let (page, per_page) = clamp_paging(page, per_page);
    let offset = (page - 1) * per_page;

    let items = store
        .recent_activities(actor, per_page, offset)?
        .iter()
        .map(ActivityFlat::from)
        .collect();
    let total = store.count_activities(actor)?;

    Ok(Page {
        items,
        total,
        page,
        per_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::skills::{self, SkillInput};

    fn setup() -> (SqliteStore, UserId, SkillId) {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = store.add_user("alice").unwrap();
        let skill = skills::create(
            &store,
            user,
            SkillInput {
                name: "Cooking".to_string(),
                categories: None,
            },
        )
        .unwrap()
        .id;
        (store, user, skill)
    }

    fn input(skill: SkillId, title: &str) -> ActivityInput {
        ActivityInput {
            title: title.to_string(),
            skill,
            category: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_create_sets_both_timestamps() {
        let (store, user, skill) = setup();

        let activity = create(&store, user, input(skill, "Bake bread")).unwrap();
        assert_eq!(activity.add_date, activity.modify_date);
        assert_eq!(activity.description, "");
    }

    #[test]
    fn test_create_under_unknown_skill_is_not_found() {
        let (store, user, _) = setup();

        let err = create(&store, user, input(999, "Bake bread")).unwrap_err();
        assert!(matches!(err, SkilltrackError::NotFound(_)));
    }

    #[test]
    fn test_create_under_other_users_skill_is_not_found() {
        let (store, _alice, skill) = setup();
        let bob = store.add_user("bob").unwrap();

        let err = create(&store, bob, input(skill, "Bake bread")).unwrap_err();
        assert!(matches!(err, SkilltrackError::NotFound(_)));
    }

    #[test]
    fn test_update_bumps_modify_date_only() {
        let (store, user, skill) = setup();
        let created = create(&store, user, input(skill, "Bake bread")).unwrap();

        let mut changed = input(skill, "Bake sourdough");
        changed.description = "with starter".to_string();
        let updated = update(&store, user, created.id, changed).unwrap();

        assert_eq!(updated.title, "Bake sourdough");
        assert_eq!(updated.add_date, created.add_date);
        assert!(updated.modify_date > created.modify_date);
    }

    #[test]
    fn test_recent_is_scoped_and_ordered() {
        let (store, alice, skill) = setup();
        let bob = store.add_user("bob").unwrap();
        let bobs_skill = skills::create(
            &store,
            bob,
            SkillInput {
                name: "Chess".to_string(),
                categories: None,
            },
        )
        .unwrap()
        .id;

        let a1 = create(&store, alice, input(skill, "First")).unwrap();
        let a2 = create(&store, alice, input(skill, "Second")).unwrap();
        create(&store, bob, input(bobs_skill, "Bob's move")).unwrap();

        update(&store, alice, a1.id, input(skill, "First, again")).unwrap();

        let page = recent(&store, alice, None, None).unwrap();
        assert_eq!(page.total, 2);
        let ids: Vec<_> = page.items.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a1.id, a2.id]);
    }

    #[test]
    fn test_recent_pagination() {
        let (store, user, skill) = setup();
        for i in 0..5 {
            create(&store, user, input(skill, &format!("Activity {}", i))).unwrap();
        }

        let page = recent(&store, user, Some(2), Some(2)).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 2);
    }

    #[test]
    fn test_delete_out_of_scope_is_not_found() {
        let (store, alice, skill) = setup();
        let bob = store.add_user("bob").unwrap();
        let activity = create(&store, alice, input(skill, "Bake bread")).unwrap();

        let err = delete(&store, bob, activity.id).unwrap_err();
        assert!(matches!(err, SkilltrackError::NotFound(_)));
        assert!(retrieve_flat(&store, alice, activity.id).is_ok());
    }
}
