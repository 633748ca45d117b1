// src/service/categories.rs
use std::collections::HashMap;

use serde::Deserialize;

use crate::entity::{Category, CategoryId, UserId};
use crate::error::{Result, SkilltrackError};
use crate::projection::{by_id, CategoryFlat};
use crate::store::SqliteStore;

/// Create/update payload. Carries no owner field; the owner is always the
/// actor.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub is_base_category: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl CategoryInput {
    fn validate(&self) -> Result<()> {
        Category::validate_name(&self.name)?;
        Category::validate_display_order(self.display_order)?;
        Ok(())
    }
}

pub fn list(store: &SqliteStore, actor: UserId) -> Result<HashMap<String, CategoryFlat>> {
    let categories = store.list_categories(actor)?;
    Ok(by_id(categories.iter().map(CategoryFlat::from).collect()))
}

pub fn create(store: &SqliteStore, actor: UserId, input: CategoryInput) -> Result<CategoryFlat> {
    input.validate()?;

    let id = store.add_category(actor, &input.name, input.is_base_category, input.display_order)?;
    tracing::debug!(category = id, owner = actor, "category created");

    let category = store
        .get_category(actor, id)?
        .ok_or_else(|| SkilltrackError::Storage("created category vanished".to_string()))?;
    Ok(CategoryFlat::from(&category))
}

pub fn retrieve(store: &SqliteStore, actor: UserId, id: CategoryId) -> Result<CategoryFlat> {
    let category = store
        .get_category(actor, id)?
        .ok_or_else(|| SkilltrackError::NotFound(format!("category {}", id)))?;
    Ok(CategoryFlat::from(&category))
}

/// Replaces name and display order. The base flag is fixed at creation and
/// ignored here; unflagging would let a base category slip past the delete
/// guard.
pub fn update(
    store: &SqliteStore,
    actor: UserId,
    id: CategoryId,
    input: CategoryInput,
) -> Result<CategoryFlat> {
    input.validate()?;

    let existing = store
        .get_category(actor, id)?
        .ok_or_else(|| SkilltrackError::NotFound(format!("category {}", id)))?;

    store.update_category(
        actor,
        id,
        &input.name,
        existing.is_base_category,
        input.display_order,
    )?;
    retrieve(store, actor, id)
}

/// Base categories cannot be deleted.
pub fn delete(store: &SqliteStore, actor: UserId, id: CategoryId) -> Result<()> {
    let category = store
        .get_category(actor, id)?
        .ok_or_else(|| SkilltrackError::NotFound(format!("category {}", id)))?;

    if category.is_base_category {
        return Err(SkilltrackError::Validation(
            "base category cannot be deleted".to_string(),
        ));
    }

    store.delete_category(actor, id)?;
    tracing::debug!(category = id, owner = actor, "category deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SqliteStore, UserId) {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = store.add_user("alice").unwrap();
        (store, user)
    }

    fn input(name: &str, is_base: bool) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            is_base_category: is_base,
            display_order: 0,
        }
    }

    #[test]
    fn test_create_and_list_as_dictionary() {
        let (store, user) = setup();

        let a = create(&store, user, input("Work", true)).unwrap();
        let b = create(&store, user, input("Fun", false)).unwrap();

        let dict = list(&store, user).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&a.id.to_string()).unwrap().name, "Work");
        assert_eq!(dict.get(&b.id.to_string()).unwrap().name, "Fun");
    }

    #[test]
    fn test_create_rejects_empty_name_and_bad_order() {
        let (store, user) = setup();

        assert!(matches!(
            create(&store, user, input("", false)),
            Err(SkilltrackError::Validation(_))
        ));

        let bad_order = CategoryInput {
            name: "Work".to_string(),
            is_base_category: false,
            display_order: 101,
        };
        assert!(matches!(
            create(&store, user, bad_order),
            Err(SkilltrackError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_base_category_rejected_and_row_survives() {
        let (store, user) = setup();
        let cat = create(&store, user, input("Work", true)).unwrap();

        let err = delete(&store, user, cat.id).unwrap_err();
        assert!(matches!(err, SkilltrackError::Validation(_)));

        // Still there
        assert!(retrieve(&store, user, cat.id).is_ok());
    }

    #[test]
    fn test_delete_non_base_category() {
        let (store, user) = setup();
        let cat = create(&store, user, input("Fun", false)).unwrap();

        delete(&store, user, cat.id).unwrap();
        assert!(matches!(
            retrieve(&store, user, cat.id),
            Err(SkilltrackError::NotFound(_))
        ));
    }

    #[test]
    fn test_cross_user_delete_is_not_found() {
        let (store, alice) = setup();
        let bob = store.add_user("bob").unwrap();
        let cat = create(&store, alice, input("Work", false)).unwrap();

        let err = delete(&store, bob, cat.id).unwrap_err();
        assert!(matches!(err, SkilltrackError::NotFound(_)));
        assert!(retrieve(&store, alice, cat.id).is_ok());
    }

    #[test]
    fn test_update_replaces_name_and_order_but_not_base_flag() {
        let (store, user) = setup();
        let cat = create(&store, user, input("Old", false)).unwrap();

        let updated = update(
            &store,
            user,
            cat.id,
            CategoryInput {
                name: "New".to_string(),
                is_base_category: true,
                display_order: -5,
            },
        )
        .unwrap();

        assert_eq!(updated.name, "New");
        assert!(!updated.is_base_category);
        assert_eq!(updated.display_order, -5);
    }

    #[test]
    fn test_update_cannot_unflag_base_category() {
        let (store, user) = setup();
        let cat = create(&store, user, input("Work", true)).unwrap();

        let updated = update(
            &store,
            user,
            cat.id,
            CategoryInput {
                name: "Work".to_string(),
                is_base_category: false,
                display_order: 0,
            },
        )
        .unwrap();
        assert!(updated.is_base_category);

        // The delete guard still holds
        let err = delete(&store, user, cat.id).unwrap_err();
        assert!(matches!(err, SkilltrackError::Validation(_)));
    }
}
