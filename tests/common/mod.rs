//! Shared test utilities: fixed clock, temp database, flaky store wrapper

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use bowo::auth::AuthService;
use bowo::config::{AuthSettings, ProgressionSettings};
use bowo::content::ContentCatalog;
use bowo::progression::{UserProgress, UserTrickProgress};
use bowo::service::{Clock, ProgressService};
use bowo::store::{Database, ProgressStore};
use bowo::{BowoError, BowoResult};

/// Clock that only moves when told to
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::days(days);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::minutes(minutes);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 2026-05-04 10:00 UTC
pub fn start_time() -> DateTime<Utc> {
    utc(4, 10, 0)
}

/// A May 2026 UTC timestamp
pub fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, day, hour, minute, 0).unwrap()
}

/// A service over a fresh SQLite file in a temp dir
pub struct TestEnv {
    pub dir: TempDir,
    pub db: Database,
    pub clock: Arc<FixedClock>,
    pub service: ProgressService,
    pub auth: AuthService,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_settings(ProgressionSettings::default())
    }

    pub fn with_settings(settings: ProgressionSettings) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open(&dir.path().join("bowo.db")).expect("Failed to open db");
        let clock = FixedClock::at(start_time());
        let service = build_service(Arc::new(db.clone()), settings, clock.clone());
        let auth = AuthService::new(db.clone(), AuthSettings::default()).with_clock(clock.clone());
        Self {
            dir,
            db,
            clock,
            service,
            auth,
        }
    }

    /// Canonical answer of a question from the built-in content
    pub fn answer(&self, trick_id: &str, level: u8) -> String {
        self.service
            .content()
            .questions
            .get(trick_id, level)
            .expect("question exists")
            .answer
            .clone()
    }

    pub fn stored(&self, user_id: &str) -> UserProgress {
        self.db
            .load_progress(user_id)
            .unwrap()
            .expect("progress stored")
    }

    pub fn store_progress(&self, user_id: &str, progress: &UserProgress) {
        self.db.save_progress(user_id, progress).unwrap();
    }
}

pub fn build_service(
    store: Arc<dyn ProgressStore>,
    settings: ProgressionSettings,
    clock: Arc<FixedClock>,
) -> ProgressService {
    let content = ContentCatalog::embedded().expect("embedded content loads");
    ProgressService::new(store, Arc::new(content), settings).with_clock(clock)
}

/// Store that fails progress saves once a countdown runs out
pub struct FlakyStore {
    inner: Database,
    /// Saves left before every further save fails; usize::MAX disarms it
    saves_left: AtomicUsize,
    /// Progress loads fail too once the saves run out
    full_outage: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Database) -> Arc<Self> {
        Arc::new(Self {
            inner,
            saves_left: AtomicUsize::new(usize::MAX),
            full_outage: AtomicBool::new(false),
        })
    }

    /// Let `n` more progress saves through, then fail
    pub fn fail_after(&self, n: usize) {
        self.saves_left.store(n, Ordering::SeqCst);
    }

    /// Like `fail_after`, but progress loads fail as well afterwards
    pub fn outage_after(&self, n: usize) {
        self.full_outage.store(true, Ordering::SeqCst);
        self.fail_after(n);
    }
}

impl ProgressStore for FlakyStore {
    fn load_progress(&self, user_id: &str) -> BowoResult<Option<UserProgress>> {
        let outage = self.full_outage.load(Ordering::SeqCst);
        if outage && self.saves_left.load(Ordering::SeqCst) == 0 {
            return Err(BowoError::Internal("store unreachable".to_string()));
        }
        self.inner.load_progress(user_id)
    }

    fn save_progress(&self, user_id: &str, progress: &UserProgress) -> BowoResult<()> {
        let left = self.saves_left.load(Ordering::SeqCst);
        if left == 0 {
            return Err(BowoError::Internal("disk on fire".to_string()));
        }
        if left != usize::MAX {
            self.saves_left.store(left - 1, Ordering::SeqCst);
        }
        self.inner.save_progress(user_id, progress)
    }

    fn load_trick_progress(
        &self,
        user_id: &str,
        trick_id: &str,
    ) -> BowoResult<Option<UserTrickProgress>> {
        self.inner.load_trick_progress(user_id, trick_id)
    }

    fn save_trick_progress(&self, user_id: &str, progress: &UserTrickProgress) -> BowoResult<()> {
        self.inner.save_trick_progress(user_id, progress)
    }

    fn list_trick_progress(&self, user_id: &str) -> BowoResult<Vec<UserTrickProgress>> {
        self.inner.list_trick_progress(user_id)
    }
}
