//! SQLite-backed cache via libsql. Implements CachePort with one table per value kind.
//!
//! `cache_sets` holds one row per set member; `cache_records` holds one row per
//! record field. Both live in a single database file: data/calendar.db
//! All calls share one connection, so per-connection pragmas hold everywhere.

use crate::domain::{DomainError, FieldMap};
use crate::ports::CachePort;
use libsql::{Connection, Database, params};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

const SETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cache_sets (
    set_name TEXT NOT NULL,
    member TEXT NOT NULL,
    PRIMARY KEY (set_name, member)
)"#;

const RECORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cache_records (
    record_key TEXT NOT NULL,
    field TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (record_key, field)
)"#;

const UPSERT_FIELD: &str = r#"
INSERT INTO cache_records (record_key, field, value) VALUES (?1, ?2, ?3)
ON CONFLICT (record_key, field) DO UPDATE SET value = excluded.value
"#;

fn db_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Cache(e.to_string())
}

/// PRAGMA returns a row; use query and drain it (execute fails when rows are returned).
async fn pragma(conn: &Connection, sql: &str) -> Result<(), DomainError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DomainError::Cache(format!("{} failed: {}", sql, e)))?;
    while rows.next().await.map_err(db_err)?.is_some() {}
    Ok(())
}

async fn delete_in(conn: &Connection, key: &str) -> Result<(), DomainError> {
    conn.execute("DELETE FROM cache_sets WHERE set_name = ?1", params![key])
        .await
        .map_err(db_err)?;
    conn.execute(
        "DELETE FROM cache_records WHERE record_key = ?1",
        params![key],
    )
    .await
    .map_err(db_err)?;
    Ok(())
}

async fn upsert_in(conn: &Connection, key: &str, fields: &FieldMap) -> Result<(), DomainError> {
    for (field, value) in fields {
        conn.execute(UPSERT_FIELD, params![key, field.as_str(), value.as_str()])
            .await
            .map_err(db_err)?;
    }
    Ok(())
}

/// SQLite cache. One database file (calendar.db) in the given base directory.
pub struct SqliteCache {
    /// Owns the database the connection was opened from.
    _db: Database,
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteCache {
    /// Connect to (or create) the database and ensure the schema exists.
    /// Call once at startup; the returned cache is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(db_err)?;
        let db_path = base.join("calendar.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(db_err)?;
        let conn = db.connect().map_err(db_err)?;

        pragma(&conn, "PRAGMA journal_mode=WAL").await?;
        pragma(&conn, "PRAGMA synchronous=NORMAL").await?;

        conn.execute(SETS_TABLE, ()).await.map_err(db_err)?;
        conn.execute(RECORDS_TABLE, ()).await.map_err(db_err)?;

        info!(path = %db_path.display(), "SQLite cache connected with WAL mode");

        Ok(Self {
            _db: db,
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Current value of `PRAGMA synchronous` on the shared connection (1 = NORMAL).
    pub async fn synchronous_level(&self) -> Result<i64, DomainError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query("PRAGMA synchronous", ())
            .await
            .map_err(db_err)?;
        let row = rows
            .next()
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::Cache("PRAGMA synchronous returned no row".to_string()))?;
        row.get::<i64>(0).map_err(db_err)
    }
}

#[async_trait::async_trait]
impl CachePort for SqliteCache {
    async fn write_set(&self, set_name: &str, members: &[String]) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await.map_err(db_err)?;
        tx.execute(
            "DELETE FROM cache_records WHERE record_key = ?1",
            params![set_name],
        )
        .await
        .map_err(db_err)?;
        for member in members {
            tx.execute(
                r#"
                INSERT INTO cache_sets (set_name, member) VALUES (?1, ?2)
                ON CONFLICT (set_name, member) DO NOTHING
                "#,
                params![set_name, member.as_str()],
            )
            .await
            .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn read_set(&self, set_name: &str) -> Result<Vec<String>, DomainError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT member FROM cache_sets WHERE set_name = ?1 ORDER BY member",
                params![set_name],
            )
            .await
            .map_err(db_err)?;
        let mut members = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            members.push(row.get::<String>(0).map_err(db_err)?);
        }
        Ok(members)
    }

    async fn write_record(&self, key: &str, fields: &FieldMap) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await.map_err(db_err)?;
        tx.execute("DELETE FROM cache_sets WHERE set_name = ?1", params![key])
            .await
            .map_err(db_err)?;
        upsert_in(&tx, key, fields).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn read_record(&self, key: &str) -> Result<Option<FieldMap>, DomainError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT field, value FROM cache_records WHERE record_key = ?1",
                params![key],
            )
            .await
            .map_err(db_err)?;
        let mut fields = FieldMap::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            let field: String = row.get(0).map_err(db_err)?;
            let value: String = row.get(1).map_err(db_err)?;
            fields.insert(field, value);
        }
        Ok(if fields.is_empty() { None } else { Some(fields) })
    }

    async fn delete_key(&self, key: &str) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await.map_err(db_err)?;
        delete_in(&tx, key).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    /// Whole batch in one transaction.
    async fn replace_records(&self, records: &[(String, FieldMap)]) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await.map_err(db_err)?;
        for (key, fields) in records {
            delete_in(&tx, key).await?;
            upsert_in(&tx, key, fields).await?;
        }
        tx.commit().await.map_err(db_err)?;
        debug!(count = records.len(), "replaced records in one transaction");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sets_and_records_survive_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cache = SqliteCache::connect(dir.path()).await.unwrap();
            cache
                .write_set("t/weeks", &["2021-02".into(), "2021-01".into()])
                .await
                .unwrap();
            let mut fields = FieldMap::new();
            fields.insert("year".into(), "2021".into());
            fields.insert("week_number".into(), "1".into());
            cache.write_record("t/week/2021-01", &fields).await.unwrap();
            assert!(cache.db_path().ends_with("calendar.db"));
        }

        let cache = SqliteCache::connect(dir.path()).await.unwrap();
        assert_eq!(
            cache.read_set("t/weeks").await.unwrap(),
            vec!["2021-01", "2021-02"]
        );
        let record = cache.read_record("t/week/2021-01").await.unwrap().unwrap();
        assert_eq!(record["week_number"], "1");
    }

    #[tokio::test]
    async fn test_write_record_overwrites_fields_and_delete_clears() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SqliteCache::connect(dir.path()).await.unwrap();
        let mut fields = FieldMap::new();
        fields.insert("max_week_number".into(), "52".into());
        cache.write_record("t/year/2022", &fields).await.unwrap();
        fields.insert("max_week_number".into(), "53".into());
        cache.write_record("t/year/2022", &fields).await.unwrap();

        let record = cache.read_record("t/year/2022").await.unwrap().unwrap();
        assert_eq!(record["max_week_number"], "53");

        cache.delete_key("t/year/2022").await.unwrap();
        assert!(cache.read_record("t/year/2022").await.unwrap().is_none());
        assert!(cache.read_set("t/absent").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connection_uses_normal_sync() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SqliteCache::connect(dir.path()).await.unwrap();
        assert_eq!(cache.synchronous_level().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_records_drops_stale_fields() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SqliteCache::connect(dir.path()).await.unwrap();
        let mut stale = FieldMap::new();
        stale.insert("old".into(), "x".into());
        stale.insert("week_number".into(), "9".into());
        cache.write_record("t/week/2021-01", &stale).await.unwrap();

        let mut fresh = FieldMap::new();
        fresh.insert("week_number".into(), "1".into());
        let batch: Vec<(String, FieldMap)> = (1..=3)
            .map(|w| (format!("t/week/2021-{:02}", w), fresh.clone()))
            .collect();
        cache.replace_records(&batch).await.unwrap();

        let record = cache.read_record("t/week/2021-01").await.unwrap().unwrap();
        assert_eq!(record, fresh);
        assert!(cache.read_record("t/week/2021-03").await.unwrap().is_some());
    }
}
