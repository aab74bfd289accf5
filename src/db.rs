// Copyright 2026 The lessonkit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! SQLite-backed autosave store.

use std::path::Path;

use lessonkit_core::error::ErrorReport;
use lessonkit_core::error::Fallible;
use lessonkit_core::export::snapshot::PersistenceError;
use lessonkit_core::storage::KeyValueStore;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

const SCHEMA: &str = "create table if not exists entries (
    key text primary key,
    value text not null
) strict;";

pub struct Database {
    conn: Connection,
}

fn storage_error(e: rusqlite::Error) -> PersistenceError {
    PersistenceError::Storage(e.to_string())
}

impl Database {
    pub fn open(path: &Path) -> Fallible<Self> {
        let conn = Connection::open(path)
            .map_err(|e| ErrorReport::new(format!("failed to open {}: {e}", path.display())))?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ErrorReport::new(format!("failed to open database: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| ErrorReport::new(format!("failed to create schema: {e}")))?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.conn
            .query_row(
                "select value from entries where key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.conn
            .execute(
                "insert into entries (key, value) values (?1, ?2)
                 on conflict (key) do update set value = excluded.value",
                params![key, value],
            )
            .map_err(storage_error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.conn
            .execute("delete from entries where key = ?1", params![key])
            .map_err(storage_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_last_write_wins() -> Fallible<()> {
        let db = Database::in_memory()?;
        assert_eq!(db.get("k")?, None);
        db.set("k", "one")?;
        db.set("k", "two")?;
        assert_eq!(db.get("k")?.as_deref(), Some("two"));
        db.remove("k")?;
        db.remove("k")?;
        assert_eq!(db.get("k")?, None);
        Ok(())
    }

    #[test]
    fn test_survives_reopen() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("autosave.db");
        Database::open(&path)?.set("lesson", "{}")?;
        assert_eq!(Database::open(&path)?.get("lesson")?.as_deref(), Some("{}"));
        Ok(())
    }
}
