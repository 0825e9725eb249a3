//! Persistence: progress documents, per-trick progress, accounts and sessions
//!
//! The use cases only see the `ProgressStore` trait. `Database` is the SQLite
//! implementation; account and session queries live on it directly since only
//! `auth` uses them.

mod accounts;
mod db;
mod progress;

pub use accounts::{AccountRecord, SessionRecord};
pub use db::Database;

use crate::error::BowoResult;
use crate::progression::{UserProgress, UserTrickProgress};

/// Storage seam for the reward use cases.
///
/// Progress documents are replaced whole on save, so concurrent writers for
/// the same user are last-write-wins.
pub trait ProgressStore: Send + Sync {
    /// None if the user has no document yet
    fn load_progress(&self, user_id: &str) -> BowoResult<Option<UserProgress>>;

    fn save_progress(&self, user_id: &str, progress: &UserProgress) -> BowoResult<()>;

    fn load_trick_progress(
        &self,
        user_id: &str,
        trick_id: &str,
    ) -> BowoResult<Option<UserTrickProgress>>;

    fn save_trick_progress(&self, user_id: &str, progress: &UserTrickProgress) -> BowoResult<()>;

    fn list_trick_progress(&self, user_id: &str) -> BowoResult<Vec<UserTrickProgress>>;
}
