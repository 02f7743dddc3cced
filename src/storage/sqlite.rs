use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};
use rusqlite::{params, Connection};

use super::traits::Repository;
use crate::model::TodoItem;

const DB_SCHEMA_VERSION: i64 = 1;

/// SQLite backend. The engine assigns ids (AUTOINCREMENT) and every mutation
/// commits immediately; the in-memory map mirrors the table between loads.
pub struct SqliteRepository {
    path: PathBuf,
    conn: Option<Connection>,
    data: BTreeMap<u64, TodoItem>,
    high_water: u64,
}

fn map_todo_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(u64, TodoItem)> {
    let id: i64 = row.get(0)?;
    let completed: i64 = row.get(3)?;
    Ok((
        id as u64,
        TodoItem {
            title: row.get(1)?,
            description: row.get(2)?,
            completed: completed != 0,
        },
    ))
}

fn db_load_all(conn: &Connection) -> rusqlite::Result<BTreeMap<u64, TodoItem>> {
    let mut stmt = conn.prepare("SELECT id, title, description, completed FROM todos")?;
    let items = stmt
        .query_map([], map_todo_row)?
        .collect::<rusqlite::Result<BTreeMap<_, _>>>();
    items
}

impl SqliteRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .with_context(|| format!("opening todo database {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;
        Self::migrate(&conn)?;

        Ok(Self {
            path,
            conn: Some(conn),
            data: BTreeMap::new(),
            high_water: 0,
        })
    }

    /// Deletes the database file if present.
    pub fn reset_all<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        if version == 0 {
            log::info!("SQLite schema migration: 0 -> {}", DB_SCHEMA_VERSION);
            conn.execute_batch(
                r#"
            CREATE TABLE todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                completed INTEGER NOT NULL CHECK (completed IN (0, 1))
            );
        "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset".to_string()),
        ))
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| anyhow!("todo database {} already closed", self.path.display()))
    }
}

impl Repository for SqliteRepository {
    fn load(&mut self) -> Result<()> {
        self.data = db_load_all(self.conn()?)?;
        self.high_water = self.data.keys().next_back().copied().unwrap_or(0);
        Ok(())
    }

    fn add(&mut self, item: TodoItem) -> Result<TodoItem> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO todos (title, description, completed) VALUES (?1, ?2, ?3)",
            params![item.title, item.description, item.completed as i64],
        )?;
        let id = conn.last_insert_rowid() as u64;
        self.data.insert(id, item.clone());
        self.high_water = self.high_water.max(id);
        Ok(item)
    }

    fn remove(&mut self, id: u64) -> Result<Option<TodoItem>> {
        self.conn()?
            .execute("DELETE FROM todos WHERE id = ?1", params![id as i64])?;
        // The delete is idempotent at the storage layer; whether the row
        // existed is answered from the map.
        Ok(self.data.remove(&id))
    }

    fn update(&mut self, id: u64, item: TodoItem) -> Result<Option<TodoItem>> {
        let affected = self.conn()?.execute(
            "UPDATE todos SET title = ?1, description = ?2, completed = ?3 WHERE id = ?4",
            params![item.title, item.description, item.completed as i64, id as i64],
        )?;
        if affected == 0 {
            return Ok(None);
        }
        self.data.insert(id, item.clone());
        Ok(Some(item))
    }

    fn flush(&mut self) -> Result<()> {
        // Every mutation is already committed.
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| err)?;
        }
        Ok(())
    }

    fn items(&self) -> &BTreeMap<u64, TodoItem> {
        &self.data
    }

    fn next_id_hint(&self) -> Option<u64> {
        // Ids are engine-assigned; callers resolve them from the map.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(title: &str) -> TodoItem {
        TodoItem {
            title: title.to_string(),
            description: format!("{title} description"),
            completed: false,
        }
    }

    fn open_in(dir: &TempDir) -> SqliteRepository {
        let mut repo = SqliteRepository::open(dir.path().join("todos.sqlite")).unwrap();
        repo.load().unwrap();
        repo
    }

    #[test]
    fn reset_all_ok_when_missing() {
        let dir = TempDir::new().unwrap();
        SqliteRepository::reset_all(dir.path().join("todos.sqlite")).unwrap();
    }

    #[test]
    fn reset_all_removes_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.sqlite");
        {
            let mut repo = SqliteRepository::open(&path).unwrap();
            repo.load().unwrap();
            repo.close().unwrap();
        }
        assert!(path.exists());
        SqliteRepository::reset_all(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn open_fails_on_mismatched_schema_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.sqlite");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 99).unwrap();
        }
        assert!(SqliteRepository::open(&path).is_err());
    }

    #[test]
    fn add_uses_engine_assigned_ids() {
        let dir = TempDir::new().unwrap();
        let mut repo = open_in(&dir);

        repo.add(sample("first")).unwrap();
        repo.add(sample("second")).unwrap();
        assert_eq!(
            repo.items().keys().copied().collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(repo.next_id_hint(), None);
    }

    #[test]
    fn state_survives_close_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.sqlite");

        let mut repo = SqliteRepository::open(&path).unwrap();
        repo.load().unwrap();
        repo.add(sample("persisted")).unwrap();
        let before = repo.items().clone();
        repo.flush().unwrap();
        repo.close().unwrap();

        let mut reopened = SqliteRepository::open(&path).unwrap();
        reopened.load().unwrap();
        assert_eq!(reopened.items(), &before);
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let dir = TempDir::new().unwrap();
        let mut repo = open_in(&dir);

        repo.add(sample("one")).unwrap();
        repo.add(sample("two")).unwrap();
        repo.remove(2).unwrap();
        repo.add(sample("three")).unwrap();

        assert_eq!(
            repo.items().keys().copied().collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn remove_unknown_id_returns_none_and_leaves_map_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut repo = open_in(&dir);
        repo.add(sample("keep")).unwrap();
        let before = repo.items().clone();

        assert!(repo.remove(9999).unwrap().is_none());
        assert_eq!(repo.items(), &before);
    }

    #[test]
    fn update_unknown_id_returns_none_and_never_inserts() {
        let dir = TempDir::new().unwrap();
        let mut repo = open_in(&dir);

        assert!(repo.update(9999, sample("ghost")).unwrap().is_none());
        assert!(repo.items().is_empty());
    }

    #[test]
    fn update_replaces_the_row_and_the_map_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.sqlite");

        let mut repo = SqliteRepository::open(&path).unwrap();
        repo.load().unwrap();
        repo.add(sample("old")).unwrap();

        let replacement = TodoItem {
            title: "new".to_string(),
            description: "new description".to_string(),
            completed: true,
        };
        let stored = repo.update(1, replacement.clone()).unwrap();
        assert_eq!(stored, Some(replacement.clone()));
        repo.close().unwrap();

        let mut reopened = SqliteRepository::open(&path).unwrap();
        reopened.load().unwrap();
        assert_eq!(reopened.items().get(&1), Some(&replacement));
    }

    #[test]
    fn operations_after_close_fail() {
        let dir = TempDir::new().unwrap();
        let mut repo = open_in(&dir);
        repo.close().unwrap();

        assert!(repo.load().is_err());
        assert!(repo.add(sample("late")).is_err());
    }
}
