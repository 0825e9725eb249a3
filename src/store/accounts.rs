//! Account and session rows

use rusqlite::{ErrorCode, OptionalExtension, Row};

use super::Database;
use crate::error::{BowoError, BowoResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Unix seconds
    pub created_at: i64,
}

impl AccountRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// One issued token pair. Only SHA-256 digests of the tokens are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub access_hash: String,
    pub refresh_hash: String,
    pub user_id: String,
    pub access_expires_at: i64,
    pub refresh_expires_at: i64,
    pub created_at: i64,
}

impl SessionRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            access_hash: row.get(0)?,
            refresh_hash: row.get(1)?,
            user_id: row.get(2)?,
            access_expires_at: row.get(3)?,
            refresh_expires_at: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, created_at";
const SESSION_COLUMNS: &str =
    "access_hash, refresh_hash, user_id, access_expires_at, refresh_expires_at, created_at";

impl Database {
    /// Insert a new account. A taken username (any case) is a conflict.
    pub fn insert_account(&self, account: &AccountRecord) -> BowoResult<()> {
        let conn = self.conn();
        let result = conn.execute(
            &format!("INSERT INTO accounts ({ACCOUNT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            (
                &account.id,
                &account.username,
                &account.email,
                &account.password_hash,
                account.created_at,
            ),
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(BowoError::Conflict(format!(
                    "username '{}' is taken",
                    account.username
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_account(&self, id: &str) -> BowoResult<Option<AccountRecord>> {
        let conn = self.conn();
        let account = conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
                [id],
                AccountRecord::from_row,
            )
            .optional()?;
        Ok(account)
    }

    /// Case-insensitive lookup
    pub fn find_account_by_username(&self, username: &str) -> BowoResult<Option<AccountRecord>> {
        let conn = self.conn();
        let account = conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = ?1"),
                [username],
                AccountRecord::from_row,
            )
            .optional()?;
        Ok(account)
    }

    /// Delete an account with its sessions, progress document and trick rows
    pub fn delete_account(&self, id: &str) -> BowoResult<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sessions WHERE user_id = ?1", [id])?;
        tx.execute("DELETE FROM trick_progress WHERE user_id = ?1", [id])?;
        tx.execute("DELETE FROM user_progress WHERE user_id = ?1", [id])?;
        let removed = tx.execute("DELETE FROM accounts WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(removed > 0)
    }

    pub fn insert_session(&self, session: &SessionRecord) -> BowoResult<()> {
        let conn = self.conn();
        conn.execute(
            &format!("INSERT INTO sessions ({SESSION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            (
                &session.access_hash,
                &session.refresh_hash,
                &session.user_id,
                session.access_expires_at,
                session.refresh_expires_at,
                session.created_at,
            ),
        )?;
        Ok(())
    }

    pub fn find_session_by_access(&self, access_hash: &str) -> BowoResult<Option<SessionRecord>> {
        let conn = self.conn();
        let session = conn
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE access_hash = ?1"),
                [access_hash],
                SessionRecord::from_row,
            )
            .optional()?;
        Ok(session)
    }

    pub fn find_session_by_refresh(&self, refresh_hash: &str) -> BowoResult<Option<SessionRecord>> {
        let conn = self.conn();
        let session = conn
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE refresh_hash = ?1"),
                [refresh_hash],
                SessionRecord::from_row,
            )
            .optional()?;
        Ok(session)
    }

    /// Replace the session holding `old_refresh_hash` with `next`.
    ///
    /// Returns false (and changes nothing) if the old session is already gone,
    /// so a refresh token can only be redeemed once.
    pub fn rotate_session(&self, old_refresh_hash: &str, next: &SessionRecord) -> BowoResult<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let removed =
            tx.execute("DELETE FROM sessions WHERE refresh_hash = ?1", [old_refresh_hash])?;
        if removed == 0 {
            return Ok(false);
        }
        tx.execute(
            &format!("INSERT INTO sessions ({SESSION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            (
                &next.access_hash,
                &next.refresh_hash,
                &next.user_id,
                next.access_expires_at,
                next.refresh_expires_at,
                next.created_at,
            ),
        )?;
        tx.commit()?;
        Ok(true)
    }

    /// Drop sessions whose refresh token has expired
    pub fn prune_sessions(&self, now: i64) -> BowoResult<usize> {
        let conn = self.conn();
        let removed = conn.execute("DELETE FROM sessions WHERE refresh_expires_at <= ?1", [now])?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::UserProgress;
    use crate::store::ProgressStore;

    fn account(id: &str, username: &str) -> AccountRecord {
        AccountRecord {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "salt$hash".to_string(),
            created_at: 1_700_000_000,
        }
    }

    fn session(user_id: &str, tag: &str) -> SessionRecord {
        SessionRecord {
            access_hash: format!("a-{tag}"),
            refresh_hash: format!("r-{tag}"),
            user_id: user_id.to_string(),
            access_expires_at: 100,
            refresh_expires_at: 1_000,
            created_at: 0,
        }
    }

    #[test]
    fn test_username_unique_ignoring_case() {
        let db = Database::open_in_memory().unwrap();
        db.insert_account(&account("1", "Tony")).unwrap();
        let err = db.insert_account(&account("2", "tony")).unwrap_err();
        assert!(matches!(err, BowoError::Conflict(_)));
        assert_eq!(db.find_account_by_username("TONY").unwrap().unwrap().id, "1");
    }

    #[test]
    fn test_rotate_session_once() {
        let db = Database::open_in_memory().unwrap();
        db.insert_account(&account("1", "rodney")).unwrap();
        db.insert_session(&session("1", "old")).unwrap();

        assert!(db.rotate_session("r-old", &session("1", "new")).unwrap());
        assert!(db.find_session_by_access("a-old").unwrap().is_none());
        assert!(db.find_session_by_refresh("r-new").unwrap().is_some());

        assert!(!db.rotate_session("r-old", &session("1", "again")).unwrap());
        assert!(db.find_session_by_access("a-again").unwrap().is_none());
    }

    #[test]
    fn test_delete_account_cascades() {
        let db = Database::open_in_memory().unwrap();
        db.insert_account(&account("1", "elissa")).unwrap();
        db.insert_session(&session("1", "s")).unwrap();
        db.save_progress("1", &UserProgress::default()).unwrap();

        assert!(db.delete_account("1").unwrap());
        assert!(db.find_account("1").unwrap().is_none());
        assert!(db.find_session_by_access("a-s").unwrap().is_none());
        assert!(db.load_progress("1").unwrap().is_none());
        assert!(!db.delete_account("1").unwrap());
    }

    #[test]
    fn test_prune_expired_sessions() {
        let db = Database::open_in_memory().unwrap();
        db.insert_account(&account("1", "lizzie")).unwrap();
        db.insert_session(&session("1", "s")).unwrap();
        assert_eq!(db.prune_sessions(999).unwrap(), 0);
        assert_eq!(db.prune_sessions(1_000).unwrap(), 1);
    }
}
