use crate::models::{FeedbackRow, UserRow};
use crate::{Database, Result, StoreError};
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Insert a new user. Uniqueness of username and email is enforced by
    /// the storage layer itself: a constraint violation on the INSERT maps
    /// to `Duplicate`, so there is no check-then-insert race.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, email, first_name, last_name)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (username, password_hash, email, first_name, last_name),
            )
            .map_err(map_write_err)?;
            Ok(())
        })
    }

    pub fn get_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, username))
    }

    /// Delete a user. With foreign_keys=ON the schema cascades this to all
    /// feedback rows owned by the username, in the same statement.
    pub fn delete_user(&self, username: &str) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM users WHERE username = ?1", [username])?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Feedback --

    pub fn create_feedback(&self, title: &str, content: &str, owner: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO feedback (title, content, owner) VALUES (?1, ?2, ?3)",
                (title, content, owner),
            )
            .map_err(map_write_err)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_feedback(&self, id: i64) -> Result<Option<FeedbackRow>> {
        self.with_conn(|conn| query_feedback(conn, id))
    }

    pub fn list_feedback_for_user(&self, owner: &str) -> Result<Vec<FeedbackRow>> {
        self.with_conn(|conn| query_feedback_for_user(conn, owner))
    }

    /// Edit title and content in place. The owner column is never part of
    /// the update payload.
    pub fn update_feedback(&self, id: i64, title: &str, content: &str) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn
                .execute(
                    "UPDATE feedback SET title = ?1, content = ?2 WHERE id = ?3",
                    (title, content, id),
                )
                .map_err(map_write_err)?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    pub fn delete_feedback(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM feedback WHERE id = ?1", [id])?;
            if affected == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }
}

/// UNIQUE / PRIMARY KEY violations become `Duplicate`; everything else
/// passes through as a plain SQLite error.
fn map_write_err(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            StoreError::Duplicate
        }
        _ => StoreError::Sqlite(e),
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, password, email, first_name, last_name, created_at
         FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                password: row.get(1)?,
                email: row.get(2)?,
                first_name: row.get(3)?,
                last_name: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_feedback(conn: &Connection, id: i64) -> Result<Option<FeedbackRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, owner, created_at FROM feedback WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(FeedbackRow {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                owner: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_feedback_for_user(conn: &Connection, owner: &str) -> Result<Vec<FeedbackRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, owner, created_at
         FROM feedback
         WHERE owner = ?1
         ORDER BY created_at, id",
    )?;

    let rows = stmt
        .query_map([owner], |row| {
            Ok(FeedbackRow {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                owner: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
