use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::store::{SnapshotStore, StoreError};

pub const DB_FILE_NAME: &str = "teacherhub.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
pub fn open_in_memory() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;
    ensure_snapshots_updated_at(conn)?;
    Ok(())
}

// Early workspaces created the table without updated_at.
fn ensure_snapshots_updated_at(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "snapshots", "updated_at")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE snapshots ADD COLUMN updated_at TEXT", [])?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

impl SnapshotStore for Connection {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .query_row("SELECT value FROM snapshots WHERE key = ?", [key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.execute(
            "INSERT INTO snapshots(key, value, updated_at)
             VALUES(?, ?, strftime('%Y-%m-%dT%H:%M:%SZ','now'))
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            (key, value),
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.execute("DELETE FROM snapshots WHERE key = ?", [key])?;
        Ok(())
    }

    fn replace_all(&self, entries: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        let tx = self.unchecked_transaction()?;
        for (key, value) in entries {
            match value {
                Some(v) => tx.save(key, v)?,
                None => tx.remove(key)?,
            }
        }
        tx.commit()?;
        Ok(())
    }
}
