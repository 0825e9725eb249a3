//! Register, login, token refresh, self-lookup and self-delete

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::password::{hash_password, verify_password};
use super::tokens::{generate_token, hash_token};
use crate::config::AuthSettings;
use crate::error::{BowoError, BowoResult};
use crate::service::{Clock, SystemClock};
use crate::store::{AccountRecord, Database, SessionRecord};

/// Public view of an account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<AccountRecord> for AccountView {
    fn from(record: AccountRecord) -> Self {
        let created_at = Utc
            .timestamp_opt(record.created_at, 0)
            .single()
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub account: AccountView,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    settings: AuthSettings,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(db: Database, settings: AuthSettings) -> Self {
        Self {
            db,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create an account and sign it in
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BowoResult<AuthResponse> {
        let username = username.trim();
        let email = email.trim();
        validate_username(username)?;
        validate_email(email)?;
        if password.chars().count() < self.settings.min_password_len {
            return Err(BowoError::InvalidInput(format!(
                "password must be at least {} characters",
                self.settings.min_password_len
            )));
        }

        let record = AccountRecord {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            created_at: self.clock.now().timestamp(),
        };
        self.db.insert_account(&record)?;
        info!("[bowo:auth] Registered '{}' as {}", record.username, record.id);

        let tokens = self.issue(&record.id)?;
        Ok(AuthResponse {
            account: record.into(),
            tokens,
        })
    }

    pub fn login(&self, username: &str, password: &str) -> BowoResult<AuthResponse> {
        let Some(record) = self.db.find_account_by_username(username.trim())? else {
            warn!("[bowo:auth] Login for unknown user '{}'", username.trim());
            return Err(BowoError::Unauthorized);
        };
        if !verify_password(password, &record.password_hash) {
            warn!("[bowo:auth] Wrong password for '{}'", record.username);
            return Err(BowoError::Unauthorized);
        }

        let tokens = self.issue(&record.id)?;
        Ok(AuthResponse {
            account: record.into(),
            tokens,
        })
    }

    /// Trade a refresh token for a new pair. The old pair stops working.
    pub fn refresh(&self, refresh_token: &str) -> BowoResult<TokenPair> {
        let old_hash = hash_token(refresh_token.trim());
        let session = self
            .db
            .find_session_by_refresh(&old_hash)?
            .ok_or(BowoError::Unauthorized)?;

        let now = self.clock.now().timestamp();
        if session.refresh_expires_at <= now {
            warn!("[bowo:auth] Expired refresh token for {}", session.user_id);
            return Err(BowoError::Unauthorized);
        }

        let (tokens, next) = self.new_session(&session.user_id)?;
        if !self.db.rotate_session(&old_hash, &next)? {
            return Err(BowoError::Unauthorized);
        }
        Ok(tokens)
    }

    /// User id behind a bearer access token
    pub fn authenticate(&self, access_token: &str) -> BowoResult<String> {
        let session = self
            .db
            .find_session_by_access(&hash_token(access_token.trim()))?
            .ok_or(BowoError::Unauthorized)?;
        if session.access_expires_at <= self.clock.now().timestamp() {
            return Err(BowoError::Unauthorized);
        }
        Ok(session.user_id)
    }

    pub fn me(&self, user_id: &str) -> BowoResult<AccountView> {
        self.db
            .find_account(user_id)?
            .map(AccountView::from)
            .ok_or_else(|| BowoError::not_found("account"))
    }

    /// Delete the account with its sessions and all progress
    pub fn delete_account(&self, user_id: &str) -> BowoResult<()> {
        if !self.db.delete_account(user_id)? {
            return Err(BowoError::not_found("account"));
        }
        info!("[bowo:auth] Deleted account {}", user_id);
        Ok(())
    }

    fn issue(&self, user_id: &str) -> BowoResult<TokenPair> {
        let (tokens, session) = self.new_session(user_id)?;
        self.db.insert_session(&session)?;
        Ok(tokens)
    }

    fn new_session(&self, user_id: &str) -> BowoResult<(TokenPair, SessionRecord)> {
        let now = self.clock.now();
        let access_ttl = Duration::minutes(self.settings.access_ttl_minutes);
        let refresh_ttl = Duration::days(self.settings.refresh_ttl_days);
        let access_token = generate_token()?;
        let refresh_token = generate_token()?;

        let session = SessionRecord {
            access_hash: hash_token(&access_token),
            refresh_hash: hash_token(&refresh_token),
            user_id: user_id.to_string(),
            access_expires_at: (now + access_ttl).timestamp(),
            refresh_expires_at: (now + refresh_ttl).timestamp(),
            created_at: now.timestamp(),
        };
        let tokens = TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: access_ttl.num_seconds(),
        };
        Ok((tokens, session))
    }
}

fn validate_username(username: &str) -> BowoResult<()> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(BowoError::InvalidInput(
            "username must be 3 to 32 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(BowoError::InvalidInput(
            "username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> BowoResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(BowoError::InvalidInput(format!("'{email}' is not an email address"))),
    }
}
