// src/projection/dict.rs
use std::collections::HashMap;

use serde::Serialize;

use super::flat::{CategoryFlat, SkillFlat};

/// Items that carry their own dictionary key.
pub trait Keyed {
    fn key(&self) -> i64;
}

/// Re-keys a list of items by their id. Produces exactly one map entry per
/// item; ordering is not guaranteed in this shape.
pub fn by_id<T: Keyed>(items: Vec<T>) -> HashMap<String, T> {
    items
        .into_iter()
        .map(|item| (item.key().to_string(), item))
        .collect()
}

/// Skill list response: skills plus the owner's categories referenced by at
/// least one of them, both keyed by id.
#[derive(Debug, Clone, Serialize)]
pub struct SkillListing {
    pub skills: HashMap<String, SkillFlat>,
    pub categories: HashMap<String, CategoryFlat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_by_id_produces_one_key_per_item() {
        let items = vec![
            CategoryFlat {
                id: 3,
                name: "C".to_string(),
                is_base_category: false,
                display_order: 0,
            },
            CategoryFlat {
                id: 1,
                name: "A".to_string(),
                is_base_category: true,
                display_order: 0,
            },
            CategoryFlat {
                id: 2,
                name: "B".to_string(),
                is_base_category: false,
                display_order: 0,
            },
        ];

        let dict = by_id(items);
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get("1").unwrap().name, "A");
        assert_eq!(dict.get("2").unwrap().name, "B");
        assert_eq!(dict.get("3").unwrap().name, "C");
    }

    #[test]
    fn test_by_id_keys_match_item_ids() {
        let items = vec![SkillFlat {
            id: 17,
            name: "Cooking".to_string(),
            categories: vec![],
            add_date: Utc::now(),
        }];

        let dict = by_id(items);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("17").unwrap().id, 17);
    }

    #[test]
    fn test_empty_list_gives_empty_dict() {
        let dict = by_id(Vec::<CategoryFlat>::new());
        assert!(dict.is_empty());
    }
}
