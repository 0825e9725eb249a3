//! Error type shared by the progression use cases, the store and the HTTP layer

/// Errors surfaced by BoWo operations.
///
/// Idempotent repeats (unlocking something already owned) are not errors;
/// the use cases report them through `already_*` flags instead.
#[derive(Debug, thiserror::Error)]
pub enum BowoError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("question level {0} is outside 1..=8")]
    InvalidLevel(u8),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("daily unlock limit of {limit} reached")]
    DailyLimitReached { limit: u32 },

    #[error("no alive-deck tokens available")]
    NoTokens,

    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },

    #[error("missing or invalid credentials")]
    Unauthorized,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type BowoResult<T> = Result<T, BowoError>;

impl BowoError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::InvalidLevel(_)
            | Self::InvalidInput(_)
            | Self::DailyLimitReached { .. }
            | Self::NoTokens
            | Self::InsufficientCoins { .. } => 400,
            Self::Unauthorized => 401,
            Self::Conflict(_) => 409,
            Self::Storage(_) | Self::Json(_) | Self::Io(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code sent to the client
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidLevel(_) => "invalid_level",
            Self::InvalidInput(_) => "invalid_input",
            Self::DailyLimitReached { .. } => "daily_limit_reached",
            Self::NoTokens => "no_tokens",
            Self::InsufficientCoins { .. } => "insufficient_coins",
            Self::Unauthorized => "unauthorized",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) | Self::Json(_) | Self::Io(_) | Self::Internal(_) => "internal_error",
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}
