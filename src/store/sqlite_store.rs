use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::entity::{
    Activity, ActivityEntry, ActivityId, Category, CategoryId, EntryContent, EntryId, Skill,
    SkillId, User, UserId,
};
use crate::error::Result;

/// SQLite-backed store for all entities.
///
/// Referential integrity is delegated to the schema: skill deletion cascades
/// to activities, activity deletion cascades to entries, category deletion
/// nulls out activity references and drops skill associations. The store
/// itself only declares the foreign keys and keeps them enabled.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a transient in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                owner INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                is_base_category INTEGER NOT NULL DEFAULT 0,
                display_order INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY,
                owner INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                add_date TEXT NOT NULL,
                UNIQUE (owner, name)
            );

            CREATE TABLE IF NOT EXISTS skill_categories (
                skill_id INTEGER NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                PRIMARY KEY (skill_id, category_id)
            );

            CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
                skill_id INTEGER NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
                description TEXT NOT NULL DEFAULT '',
                add_date TEXT NOT NULL,
                modify_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activity_entries (
                id INTEGER PRIMARY KEY,
                activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
                kind TEXT NOT NULL,
                body TEXT NOT NULL,
                add_date TEXT NOT NULL,
                modify_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_categories_owner ON categories(owner);
            CREATE INDEX IF NOT EXISTS idx_skills_owner ON skills(owner);
            CREATE INDEX IF NOT EXISTS idx_activities_skill ON activities(skill_id);
            CREATE INDEX IF NOT EXISTS idx_activities_modify ON activities(modify_date);
            CREATE INDEX IF NOT EXISTS idx_entries_activity ON activity_entries(activity_id);
            ",
        )?;
        Ok(())
    }

    // ========== User Methods ==========

    pub fn add_user(&self, username: &str) -> Result<UserId> {
        self.conn.execute(
            "INSERT INTO users (username) VALUES (?1)",
            [username],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?1",
                [id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            [username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Cascades to owned categories and skills, and through them to
    /// activities and entries.
    pub fn delete_user(&self, id: UserId) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    // ========== Category Methods ==========

    pub fn add_category(
        &self,
        owner: UserId,
        name: &str,
        is_base_category: bool,
        display_order: i32,
    ) -> Result<CategoryId> {
        self.conn.execute(
            "INSERT INTO categories (owner, name, is_base_category, display_order)
             VALUES (?1, ?2, ?3, ?4)",
            params![owner, name, is_base_category, display_order],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_category(&self, owner: UserId, id: CategoryId) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, owner, name, is_base_category, display_order
                 FROM categories WHERE id = ?1 AND owner = ?2",
                params![id, owner],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    pub fn list_categories(&self, owner: UserId) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, name, is_base_category, display_order
             FROM categories WHERE owner = ?1
             ORDER BY display_order, name",
        )?;
        let categories = stmt
            .query_map([owner], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Categories of the owner referenced by at least one of their skills.
    pub fn categories_in_skills(&self, owner: UserId) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT c.id, c.owner, c.name, c.is_base_category, c.display_order
             FROM categories c
             JOIN skill_categories sc ON sc.category_id = c.id
             JOIN skills s ON s.id = sc.skill_id
             WHERE s.owner = ?1",
        )?;
        let categories = stmt
            .query_map([owner], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn base_category_ids(&self, owner: UserId) -> Result<Vec<CategoryId>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM categories WHERE owner = ?1 AND is_base_category = 1",
        )?;
        let ids = stmt
            .query_map([owner], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    pub fn update_category(
        &self,
        owner: UserId,
        id: CategoryId,
        name: &str,
        is_base_category: bool,
        display_order: i32,
    ) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE categories SET name = ?1, is_base_category = ?2, display_order = ?3
             WHERE id = ?4 AND owner = ?5",
            params![name, is_base_category, display_order, id, owner],
        )?;
        Ok(affected > 0)
    }

    /// Activities referencing the category get `category = NULL`; join rows
    /// to skills are removed. The base-category guard lives in the service
    /// layer, not here.
    pub fn delete_category(&self, owner: UserId, id: CategoryId) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM categories WHERE id = ?1 AND owner = ?2",
            params![id, owner],
        )?;
        Ok(affected > 0)
    }

    // ========== Skill Methods ==========

    /// Inserts the skill and its category associations in one transaction;
    /// a failed association insert rolls the skill row back too.
    pub fn add_skill(
        &self,
        owner: UserId,
        name: &str,
        categories: &[CategoryId],
        add_date: DateTime<Utc>,
    ) -> Result<SkillId> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO skills (owner, name, add_date) VALUES (?1, ?2, ?3)",
            params![owner, name, add_date.to_rfc3339()],
        )?;
        let id = tx.last_insert_rowid();
        for &category in categories {
            tx.execute(
                "INSERT OR IGNORE INTO skill_categories (skill_id, category_id) VALUES (?1, ?2)",
                params![id, category],
            )?;
        }
        tx.commit()?;
        Ok(id)
    }

    pub fn skill_name_exists(
        &self,
        owner: UserId,
        name: &str,
        exclude: Option<SkillId>,
    ) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM skills
             WHERE owner = ?1 AND name = ?2 AND id != COALESCE(?3, -1)",
            params![owner, name, exclude],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn get_skill(&self, owner: UserId, id: SkillId) -> Result<Option<Skill>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, owner, name, add_date FROM skills
                 WHERE id = ?1 AND owner = ?2",
                params![id, owner],
                skill_from_row,
            )
            .optional()?;

        match row {
            Some(mut skill) => {
                skill.categories = self.skill_category_ids(skill.id)?;
                Ok(Some(skill))
            }
            None => Ok(None),
        }
    }

    pub fn list_skills(&self, owner: UserId) -> Result<Vec<Skill>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, name, add_date FROM skills
             WHERE owner = ?1 ORDER BY name",
        )?;
        let mut skills = stmt
            .query_map([owner], skill_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for skill in &mut skills {
            skill.categories = self.skill_category_ids(skill.id)?;
        }
        Ok(skills)
    }

    pub fn rename_skill(&self, owner: UserId, id: SkillId, name: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE skills SET name = ?1 WHERE id = ?2 AND owner = ?3",
            params![name, id, owner],
        )?;
        Ok(affected > 0)
    }

    /// Cascades to the skill's activities and their entries.
    pub fn delete_skill(&self, owner: UserId, id: SkillId) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM skills WHERE id = ?1 AND owner = ?2",
            params![id, owner],
        )?;
        Ok(affected > 0)
    }

    pub fn attach_category(&self, skill: SkillId, category: CategoryId) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO skill_categories (skill_id, category_id) VALUES (?1, ?2)",
            params![skill, category],
        )?;
        Ok(())
    }

    pub fn detach_category(&self, skill: SkillId, category: CategoryId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM skill_categories WHERE skill_id = ?1 AND category_id = ?2",
            params![skill, category],
        )?;
        Ok(())
    }

    fn skill_category_ids(&self, skill: SkillId) -> Result<Vec<CategoryId>> {
        let mut stmt = self.conn.prepare(
            "SELECT category_id FROM skill_categories
             WHERE skill_id = ?1 ORDER BY category_id",
        )?;
        let ids = stmt
            .query_map([skill], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    // ========== Activity Methods ==========

    pub fn add_activity(
        &self,
        skill: SkillId,
        category: Option<CategoryId>,
        title: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<ActivityId> {
        self.conn.execute(
            "INSERT INTO activities (title, category_id, skill_id, description, add_date, modify_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![title, category, skill, description, now.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Scoped transitively through skill ownership.
    pub fn get_activity(&self, owner: UserId, id: ActivityId) -> Result<Option<Activity>> {
        let activity = self
            .conn
            .query_row(
                "SELECT a.id, a.title, a.category_id, a.skill_id, a.description,
                        a.add_date, a.modify_date
                 FROM activities a
                 JOIN skills s ON s.id = a.skill_id
                 WHERE a.id = ?1 AND s.owner = ?2",
                params![id, owner],
                activity_from_row,
            )
            .optional()?;
        Ok(activity)
    }

    pub fn list_activities(&self, owner: UserId) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.title, a.category_id, a.skill_id, a.description,
                    a.add_date, a.modify_date
             FROM activities a
             JOIN skills s ON s.id = a.skill_id
             WHERE s.owner = ?1
             ORDER BY a.id",
        )?;
        let activities = stmt
            .query_map([owner], activity_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    /// Activities under one skill. Scope is the caller's responsibility.
    pub fn list_activities_for_skill(&self, skill: SkillId) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, category_id, skill_id, description, add_date, modify_date
             FROM activities WHERE skill_id = ?1 ORDER BY id",
        )?;
        let activities = stmt
            .query_map([skill], activity_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    pub fn update_activity(
        &self,
        id: ActivityId,
        skill: SkillId,
        category: Option<CategoryId>,
        title: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE activities
             SET title = ?1, category_id = ?2, skill_id = ?3, description = ?4, modify_date = ?5
             WHERE id = ?6",
            params![title, category, skill, description, now.to_rfc3339(), id],
        )?;
        Ok(())
    }

    /// Cascades to the activity's entries.
    pub fn delete_activity(&self, owner: UserId, id: ActivityId) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM activities WHERE id = ?1
             AND skill_id IN (SELECT id FROM skills WHERE owner = ?2)",
            params![id, owner],
        )?;
        Ok(affected > 0)
    }

    /// Most recently modified first. Ties broken by id so pages are stable.
    pub fn recent_activities(
        &self,
        owner: UserId,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.title, a.category_id, a.skill_id, a.description,
                    a.add_date, a.modify_date
             FROM activities a
             JOIN skills s ON s.id = a.skill_id
             WHERE s.owner = ?1
             ORDER BY a.modify_date DESC, a.id DESC
             LIMIT ?2 OFFSET ?3",
        )?;
        let activities = stmt
            .query_map(params![owner, limit as i64, offset as i64], activity_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    pub fn count_activities(&self, owner: UserId) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM activities a
             JOIN skills s ON s.id = a.skill_id
             WHERE s.owner = ?1",
            [owner],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ========== Entry Methods ==========

    pub fn add_entry(
        &self,
        activity: ActivityId,
        content: &EntryContent,
        now: DateTime<Utc>,
    ) -> Result<EntryId> {
        self.conn.execute(
            "INSERT INTO activity_entries (activity_id, kind, body, add_date, modify_date)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![activity, content.kind(), content.body(), now.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Scoped transitively through the activity -> skill -> owner chain.
    pub fn get_entry(
        &self,
        owner: UserId,
        activity: ActivityId,
        id: EntryId,
    ) -> Result<Option<ActivityEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT e.id, e.activity_id, e.kind, e.body, e.add_date, e.modify_date
                 FROM activity_entries e
                 JOIN activities a ON a.id = e.activity_id
                 JOIN skills s ON s.id = a.skill_id
                 WHERE e.id = ?1 AND e.activity_id = ?2 AND s.owner = ?3",
                params![id, activity, owner],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Entries for the deep activity view, newest modification first.
    pub fn entries_for_activity(&self, activity: ActivityId) -> Result<Vec<ActivityEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, activity_id, kind, body, add_date, modify_date
             FROM activity_entries WHERE activity_id = ?1
             ORDER BY modify_date DESC, id DESC",
        )?;
        let entries = stmt
            .query_map([activity], entry_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn update_entry(&self, id: EntryId, content: &EntryContent, now: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "UPDATE activity_entries SET kind = ?1, body = ?2, modify_date = ?3 WHERE id = ?4",
            params![content.kind(), content.body(), now.to_rfc3339(), id],
        )?;
        Ok(())
    }

    pub fn delete_entry(&self, id: EntryId) -> Result<()> {
        self.conn
            .execute("DELETE FROM activity_entries WHERE id = ?1", [id])?;
        Ok(())
    }
}

fn ts_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        is_base_category: row.get(3)?,
        display_order: row.get(4)?,
    })
}

fn skill_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Skill> {
    Ok(Skill {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        categories: Vec::new(),
        add_date: ts_col(row, 3)?,
    })
}

fn activity_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        skill: row.get(3)?,
        description: row.get(4)?,
        add_date: ts_col(row, 5)?,
        modify_date: ts_col(row, 6)?,
    })
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActivityEntry> {
    let kind: String = row.get(2)?;
    let body: String = row.get(3)?;
    let content = EntryContent::from_parts(&kind, &body).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown entry kind: {}", kind).into(),
        )
    })?;

    Ok(ActivityEntry {
        id: row.get(0)?,
        activity: row.get(1)?,
        content,
        add_date: ts_col(row, 4)?,
        modify_date: ts_col(row, 5)?,
    })
}
