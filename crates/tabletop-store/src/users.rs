use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::{timestamp_at, Database};
use crate::error::{not_found, Result, StoreError};
use crate::models::User;

const USER_COLUMNS: &str = "id, nickname, email, password_hash, created_at";

impl Database {
    /// Insert a user. `password_hash` must already be hashed.
    ///
    /// A duplicate email surfaces as [`StoreError::Constraint`].
    pub fn create_user(&self, nickname: &str, email: &str, password_hash: &str) -> Result<User> {
        let nickname = nickname.trim();
        let email = email.trim();
        if nickname.is_empty() {
            return Err(StoreError::Validation("nickname is required".into()));
        }
        if email.is_empty() {
            return Err(StoreError::Validation("email is required".into()));
        }

        let created_at = Utc::now();
        self.conn().execute(
            "INSERT INTO users (nickname, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![nickname, email, password_hash, created_at.to_rfc3339()],
        )?;
        let id = self.conn().last_insert_rowid();

        tracing::info!(user_id = id, email, "user created");
        self.get_user(id)
    }

    pub fn get_user(&self, id: i64) -> Result<User> {
        self.conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                row_to_user,
            )
            .map_err(not_found("user"))
    }

    /// Login lookup. `None` when no account uses this email.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email.trim()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        nickname: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::database::test_support::temp_db;
    use crate::error::StoreError;

    #[test]
    fn create_and_fetch() {
        let (_dir, db) = temp_db();
        let user = db.create_user("anna", "anna@example.com", "hash").unwrap();

        assert_eq!(db.get_user(user.id).unwrap(), user);
        let by_email = db.find_user_by_email("anna@example.com").unwrap();
        assert_eq!(by_email, Some(user));
    }

    #[test]
    fn duplicate_email_is_a_constraint_error() {
        let (_dir, db) = temp_db();
        db.create_user("anna", "anna@example.com", "hash").unwrap();

        let err = db.create_user("other", "anna@example.com", "hash").unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "{err:?}");
    }

    #[test]
    fn missing_user() {
        let (_dir, db) = temp_db();
        assert!(matches!(db.get_user(42), Err(StoreError::NotFound("user"))));
        assert_eq!(db.find_user_by_email("nobody@example.com").unwrap(), None);
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let (_dir, db) = temp_db();
        let user = db.create_user("anna", "anna@example.com", "secret-hash").unwrap();

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["nickname"], "anna");
    }
}
