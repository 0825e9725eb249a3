//! `ProgressStore` over SQLite

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use super::{Database, ProgressStore};
use crate::error::{BowoError, BowoResult};
use crate::progression::{TrickLevel, UserProgress, UserTrickProgress};

impl ProgressStore for Database {
    fn load_progress(&self, user_id: &str) -> BowoResult<Option<UserProgress>> {
        let conn = self.conn();
        let doc: Option<String> = conn
            .query_row(
                "SELECT doc FROM user_progress WHERE user_id = ?1",
                [user_id],
                |r| r.get(0),
            )
            .optional()?;
        drop(conn);

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    fn save_progress(&self, user_id: &str, progress: &UserProgress) -> BowoResult<()> {
        let doc = serde_json::to_string(progress)?;
        let conn = self.conn();
        conn.execute(
            r#"INSERT INTO user_progress (user_id, doc, updated_at) VALUES (?1, ?2, ?3)
               ON CONFLICT(user_id)
               DO UPDATE SET doc = excluded.doc, updated_at = excluded.updated_at"#,
            (user_id, doc, Utc::now().timestamp()),
        )?;
        Ok(())
    }

    fn load_trick_progress(
        &self,
        user_id: &str,
        trick_id: &str,
    ) -> BowoResult<Option<UserTrickProgress>> {
        let conn = self.conn();
        let row: Option<TrickRow> = conn
            .query_row(
                "SELECT trick_id, level, last_question_at FROM trick_progress
                 WHERE user_id = ?1 AND trick_id = ?2",
                (user_id, trick_id),
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        drop(conn);

        row.map(from_row).transpose()
    }

    fn save_trick_progress(&self, user_id: &str, progress: &UserTrickProgress) -> BowoResult<()> {
        let conn = self.conn();
        conn.execute(
            r#"INSERT INTO trick_progress (user_id, trick_id, level, last_question_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(user_id, trick_id) DO UPDATE SET
                   level = excluded.level,
                   last_question_at = excluded.last_question_at"#,
            (
                user_id,
                &progress.trick_id,
                progress.level.value(),
                progress.last_question_at.map(|t| t.to_rfc3339()),
            ),
        )?;
        Ok(())
    }

    fn list_trick_progress(&self, user_id: &str) -> BowoResult<Vec<UserTrickProgress>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT trick_id, level, last_question_at FROM trick_progress
             WHERE user_id = ?1 ORDER BY trick_id",
        )?;
        let rows: Vec<TrickRow> = stmt
            .query_map([user_id], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
            .collect::<Result<_, _>>()?;
        drop(stmt);
        drop(conn);

        rows.into_iter().map(from_row).collect()
    }
}

type TrickRow = (String, u8, Option<String>);

fn from_row((trick_id, level, last_question_at): TrickRow) -> BowoResult<UserTrickProgress> {
    let last_question_at = last_question_at
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| BowoError::Internal(format!("bad timestamp '{raw}': {e}")))
        })
        .transpose()?;

    Ok(UserTrickProgress {
        trick_id,
        level: TrickLevel::new(level)?,
        last_question_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_document_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_progress("nobody").unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_whole_document() {
        let db = Database::open_in_memory().unwrap();
        let mut progress = UserProgress {
            xp: 40,
            ..Default::default()
        };
        progress.unlock_trick("kickflip");
        db.save_progress("u1", &progress).unwrap();

        let second = UserProgress {
            xp: 60,
            ..Default::default()
        };
        db.save_progress("u1", &second).unwrap();

        let loaded = db.load_progress("u1").unwrap().unwrap();
        assert_eq!(loaded.xp, 60);
        assert!(loaded.unlocked_tricks.is_empty());
        assert_eq!(db.user_count().unwrap(), 1);
    }

    #[test]
    fn test_trick_progress_upsert_and_list() {
        let db = Database::open_in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

        let mut ollie = UserTrickProgress::new("ollie");
        db.save_trick_progress("u1", &ollie).unwrap();
        ollie.level = TrickLevel::new(3).unwrap();
        ollie.last_question_at = Some(at);
        db.save_trick_progress("u1", &ollie).unwrap();
        db.save_trick_progress("u1", &UserTrickProgress::new("kickflip")).unwrap();
        db.save_trick_progress("u2", &UserTrickProgress::new("ollie")).unwrap();

        let loaded = db.load_trick_progress("u1", "ollie").unwrap().unwrap();
        assert_eq!(loaded.level.value(), 3);
        assert_eq!(loaded.last_question_at, Some(at));

        let listed = db.list_trick_progress("u1").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].trick_id, "kickflip");
    }
}
