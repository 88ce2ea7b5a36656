use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::AppError;

// ── Key/value store ──

pub fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>, AppError> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn kv_set(conn: &Connection, key: &str, value: &str) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

/// Returns whether a row was deleted.
pub fn kv_remove(conn: &Connection, key: &str) -> Result<bool, AppError> {
    let count = conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
    Ok(count > 0)
}

pub fn kv_keys_with_prefix(conn: &Connection, prefix: &str) -> Result<Vec<String>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT key FROM kv_store WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key ASC",
    )?;

    let rows = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;

    let mut keys = vec![];
    for row in rows {
        keys.push(row?);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_get_missing_key() {
        let conn = setup_db();
        assert_eq!(kv_get(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let conn = setup_db();
        kv_set(&conn, "k", "one").unwrap();
        kv_set(&conn, "k", "two").unwrap();
        assert_eq!(kv_get(&conn, "k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_remove() {
        let conn = setup_db();
        kv_set(&conn, "k", "v").unwrap();
        assert!(kv_remove(&conn, "k").unwrap());
        assert!(!kv_remove(&conn, "k").unwrap());
        assert_eq!(kv_get(&conn, "k").unwrap(), None);
    }

    #[test]
    fn test_prefix_scan_is_literal() {
        let conn = setup_db();
        kv_set(&conn, "velora-availability-b", "{}").unwrap();
        kv_set(&conn, "velora-availability-a", "{}").unwrap();
        kv_set(&conn, "velora-user", "{}").unwrap();
        kv_set(&conn, "other_availability-c", "{}").unwrap();

        let keys = kv_keys_with_prefix(&conn, "velora-availability-").unwrap();
        assert_eq!(keys, vec!["velora-availability-a", "velora-availability-b"]);

        // `_` must not act as a wildcard
        assert!(kv_keys_with_prefix(&conn, "other-").unwrap().is_empty());
    }
}
