//! Wire-shape projections of entities.
//!
//! Every aggregate root has a flat shape (scalars plus bare foreign keys) and
//! a deep shape (related entities nested inline). Deep shapes exist to save
//! clients round trips and are strictly read-only. A dictionary variant
//! re-keys lists by id for O(1) client-side lookup.

mod deep;
mod dict;
mod flat;

pub use deep::{ActivityDeep, CategoryInSkill, SkillDeep};
pub use dict::{by_id, Keyed, SkillListing};
pub use flat::{ActivityFlat, CategoryFlat, EntryFlat, SkillFlat};

use crate::error::{Result, SkilltrackError};

/// Resource actions, as resolved by the routing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
    Recent,
    AddCategory,
    RemoveCategory,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::List => "list",
            Operation::Retrieve => "retrieve",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Recent => "recent",
            Operation::AddCategory => "add_category",
            Operation::RemoveCategory => "remove_category",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Categories,
    Skills,
    Activities,
    Entries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Flat,
    Deep,
    Dictionary,
}

impl std::fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectionKind::Flat => "flat",
            ProjectionKind::Deep => "deep",
            ProjectionKind::Dictionary => "dictionary",
        };
        write!(f, "{}", s)
    }
}

impl ProjectionKind {
    /// Deep views are never a write path.
    pub fn ensure_writable(self, op: Operation) -> Result<()> {
        match (self, op) {
            (ProjectionKind::Deep, Operation::Create | Operation::Update) => {
                Err(SkilltrackError::Validation(format!(
                    "{} is not allowed through a {} projection",
                    op, self
                )))
            }
            _ => Ok(()),
        }
    }
}

/// The operation-to-projection table. Kept explicit so the choice of shape is
/// visible at the routing boundary instead of branching inside handlers.
pub fn projection_for(resource: Resource, op: Operation) -> ProjectionKind {
    match (resource, op) {
        (Resource::Skills | Resource::Activities, Operation::Retrieve) => ProjectionKind::Deep,
        (Resource::Categories | Resource::Skills, Operation::List) => ProjectionKind::Dictionary,
        _ => ProjectionKind::Flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_uses_deep_projection() {
        assert_eq!(
            projection_for(Resource::Skills, Operation::Retrieve),
            ProjectionKind::Deep
        );
        assert_eq!(
            projection_for(Resource::Activities, Operation::Retrieve),
            ProjectionKind::Deep
        );
        assert_eq!(
            projection_for(Resource::Categories, Operation::Retrieve),
            ProjectionKind::Flat
        );
    }

    #[test]
    fn test_lists_use_dictionary_projection() {
        assert_eq!(
            projection_for(Resource::Skills, Operation::List),
            ProjectionKind::Dictionary
        );
        assert_eq!(
            projection_for(Resource::Categories, Operation::List),
            ProjectionKind::Dictionary
        );
        assert_eq!(
            projection_for(Resource::Activities, Operation::Recent),
            ProjectionKind::Flat
        );
    }

    #[test]
    fn test_deep_projection_rejects_writes() {
        let err = ProjectionKind::Deep
            .ensure_writable(Operation::Create)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("create"));
        assert!(msg.contains("deep"));

        assert!(ProjectionKind::Deep
            .ensure_writable(Operation::Update)
            .is_err());
        assert!(ProjectionKind::Deep
            .ensure_writable(Operation::Retrieve)
            .is_ok());
        assert!(ProjectionKind::Flat
            .ensure_writable(Operation::Create)
            .is_ok());
        assert!(ProjectionKind::Flat
            .ensure_writable(Operation::Update)
            .is_ok());
    }
}
