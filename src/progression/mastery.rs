//! Per-trick mastery state machine
//!
//! Nine states, level 0 (untouched) to 8 (mastered). The only transition is a
//! correct answer to the question one level above the stored level.

use serde::{Deserialize, Serialize};

use crate::error::{BowoError, BowoResult};

/// Question levels run 1..=MASTERY_LEVEL
pub const MASTERY_LEVEL: u8 = 8;

/// Stored mastery level of one trick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TrickLevel(u8);

impl TrickLevel {
    pub const UNTOUCHED: TrickLevel = TrickLevel(0);
    pub const MASTERED: TrickLevel = TrickLevel(MASTERY_LEVEL);

    pub fn new(level: u8) -> BowoResult<Self> {
        if level > MASTERY_LEVEL {
            return Err(BowoError::InvalidLevel(level));
        }
        Ok(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_mastered(self) -> bool {
        self.0 == MASTERY_LEVEL
    }

    /// Level of the next question to ask, None once mastered
    pub fn next_question(self) -> Option<u8> {
        (!self.is_mastered()).then_some(self.0 + 1)
    }

    /// Apply an answer to the question at `question_level`.
    pub fn answer(self, question_level: u8, correct: bool) -> Transition {
        if self.is_mastered() {
            return Transition::Unchanged(HoldReason::AlreadyMastered);
        }
        if !correct {
            return Transition::Unchanged(HoldReason::WrongAnswer);
        }
        if question_level != self.0 + 1 {
            return Transition::Unchanged(HoldReason::OutOfOrder {
                expected: self.0 + 1,
            });
        }

        let to = TrickLevel(self.0 + 1);
        Transition::Advanced {
            from: self,
            to,
            mastered: to.is_mastered(),
        }
    }
}

impl TryFrom<u8> for TrickLevel {
    type Error = BowoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrickLevel> for u8 {
    fn from(level: TrickLevel) -> Self {
        level.0
    }
}

/// Validate a submitted question level (1..=8)
pub fn check_question_level(level: u8) -> BowoResult<u8> {
    if (1..=MASTERY_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(BowoError::InvalidLevel(level))
    }
}

/// Outcome of one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced {
        from: TrickLevel,
        to: TrickLevel,
        /// True exactly when `to` is the mastery level
        mastered: bool,
    },
    Unchanged(HoldReason),
}

impl Transition {
    pub fn level_after(&self, before: TrickLevel) -> TrickLevel {
        match self {
            Self::Advanced { to, .. } => *to,
            Self::Unchanged(_) => before,
        }
    }

    pub fn advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }

    pub fn reached_mastery(&self) -> bool {
        matches!(self, Self::Advanced { mastered: true, .. })
    }
}

/// Why an answer left the stored level as it was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    WrongAnswer,
    OutOfOrder { expected: u8 },
    AlreadyMastered,
}

/// Case-insensitive, whitespace-trimmed comparison
pub fn answer_matches(submitted: &str, canonical: &str) -> bool {
    submitted.trim().to_lowercase() == canonical.trim().to_lowercase()
}
