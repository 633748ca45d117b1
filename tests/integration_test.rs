use std::process::Command;

use tempfile::TempDir;

use skilltrack::entity::EntryContent;
use skilltrack::service::activities::{self, ActivityInput};
use skilltrack::service::categories::{self, CategoryInput};
use skilltrack::service::entries::{self, EntryInput};
use skilltrack::service::skills::{self, SkillInput};
use skilltrack::{SkilltrackError, SqliteStore};

fn skilltrack_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_skilltrack"))
}

#[test]
fn test_init_creates_database_file() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("skilltrack.db");

    let output = skilltrack_cmd()
        .args(["--db", db.to_str().unwrap(), "init"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(db.exists());
}

#[test]
fn test_user_add_and_duplicate_rejected() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("skilltrack.db");
    let db = db.to_str().unwrap();

    let output = skilltrack_cmd()
        .args(["--db", db, "user", "add", "alice"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created user alice"));

    let output = skilltrack_cmd()
        .args(["--db", db, "user", "add", "alice"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_full_tracking_workflow() {
    let tmp = TempDir::new().unwrap();
    let store = SqliteStore::open(&tmp.path().join("skilltrack.db")).unwrap();
    let alice = store.add_user("alice").unwrap();

    // A base category attaches itself to every new skill
    let work = categories::create(
        &store,
        alice,
        CategoryInput {
            name: "Work".to_string(),
            is_base_category: true,
            display_order: 0,
        },
    )
    .unwrap();

    let cooking = skills::create(
        &store,
        alice,
        SkillInput {
            name: "Cooking".to_string(),
            categories: None,
        },
    )
    .unwrap();
    assert_eq!(cooking.categories, vec![work.id]);

    let bread = activities::create(
        &store,
        alice,
        ActivityInput {
            title: "Bake bread".to_string(),
            skill: cooking.id,
            category: Some(work.id),
            description: "Weekly loaf".to_string(),
        },
    )
    .unwrap();

    entries::create(
        &store,
        alice,
        bread.id,
        EntryInput {
            content: EntryContent::Comment {
                text: "started".to_string(),
            },
        },
    )
    .unwrap();

    // Deep activity view nests the entry
    let deep = activities::retrieve(&store, alice, bread.id).unwrap();
    assert_eq!(deep.entries.len(), 1);
    assert_eq!(
        deep.entries[0].content,
        EntryContent::Comment {
            text: "started".to_string()
        }
    );

    // Deep skill view nests the category and the activity
    let deep = skills::retrieve(&store, alice, cooking.id).unwrap();
    assert_eq!(deep.categories.len(), 1);
    assert_eq!(deep.categories[0].name, "Work");
    assert_eq!(deep.activities.len(), 1);
    assert_eq!(deep.activities[0].title, "Bake bread");
}

#[test]
fn test_other_users_resources_are_invisible() {
    let tmp = TempDir::new().unwrap();
    let store = SqliteStore::open(&tmp.path().join("skilltrack.db")).unwrap();
    let alice = store.add_user("alice").unwrap();
    let bob = store.add_user("bob").unwrap();

    let cat = categories::create(
        &store,
        alice,
        CategoryInput {
            name: "Private".to_string(),
            is_base_category: false,
            display_order: 0,
        },
    )
    .unwrap();

    // Bob can neither see nor delete Alice's category
    assert!(matches!(
        categories::retrieve(&store, bob, cat.id),
        Err(SkilltrackError::NotFound(_))
    ));
    assert!(matches!(
        categories::delete(&store, bob, cat.id),
        Err(SkilltrackError::NotFound(_))
    ));
    assert!(categories::retrieve(&store, alice, cat.id).is_ok());
}

#[test]
fn test_skill_delete_cascades_to_activities_and_entries() {
    let tmp = TempDir::new().unwrap();
    let store = SqliteStore::open(&tmp.path().join("skilltrack.db")).unwrap();
    let alice = store.add_user("alice").unwrap();

    let skill = skills::create(
        &store,
        alice,
        SkillInput {
            name: "Chess".to_string(),
            categories: None,
        },
    )
    .unwrap();
    let activity = activities::create(
        &store,
        alice,
        ActivityInput {
            title: "Study openings".to_string(),
            skill: skill.id,
            category: None,
            description: String::new(),
        },
    )
    .unwrap();
    entries::create(
        &store,
        alice,
        activity.id,
        EntryInput {
            content: EntryContent::Comment {
                text: "e4".to_string(),
            },
        },
    )
    .unwrap();

    skills::delete(&store, alice, skill.id).unwrap();

    assert!(matches!(
        activities::retrieve_flat(&store, alice, activity.id),
        Err(SkilltrackError::NotFound(_))
    ));
    assert_eq!(store.count_activities(alice).unwrap(), 0);
}

#[test]
fn test_category_delete_detaches_activities() {
    let tmp = TempDir::new().unwrap();
    let store = SqliteStore::open(&tmp.path().join("skilltrack.db")).unwrap();
    let alice = store.add_user("alice").unwrap();

    let cat = categories::create(
        &store,
        alice,
        CategoryInput {
            name: "Fun".to_string(),
            is_base_category: false,
            display_order: 0,
        },
    )
    .unwrap();
    let skill = skills::create(
        &store,
        alice,
        SkillInput {
            name: "Chess".to_string(),
            categories: Some(vec![cat.id]),
        },
    )
    .unwrap();
    let activity = activities::create(
        &store,
        alice,
        ActivityInput {
            title: "Blitz night".to_string(),
            skill: skill.id,
            category: Some(cat.id),
            description: String::new(),
        },
    )
    .unwrap();
    assert_eq!(activity.category, Some(cat.id));

    categories::delete(&store, alice, cat.id).unwrap();

    // The activity survives; its category reference is cleared
    let reloaded = activities::retrieve_flat(&store, alice, activity.id).unwrap();
    assert_eq!(reloaded.category, None);
}
