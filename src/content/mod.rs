//! Static trick content: trick catalog, mastery question bank and unlock quizzes
//!
//! Content is loaded once at startup, either from the JSON embedded in the
//! binary or from override files named in `[content]`, and is read-only after.

mod questions;
mod quizzes;
mod tricks;

pub use questions::{Question, QuestionBank, QuestionView};
pub use quizzes::{Quiz, QuizBook, QuizView};
pub use tricks::{Trick, TrickCatalog};

use std::path::Path;

use tracing::info;

use crate::config::ContentSettings;

const EMBEDDED_TRICKS: &str = include_str!("../../data/tricks.json");
const EMBEDDED_QUESTIONS: &str = include_str!("../../data/questions.json");
const EMBEDDED_QUIZZES: &str = include_str!("../../data/quizzes.json");

/// Error type for content loading
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid content: {0}")]
    Invalid(String),
}

/// All static content, shared read-only by the use cases
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    pub tricks: TrickCatalog,
    pub questions: QuestionBank,
    pub quizzes: QuizBook,
}

impl ContentCatalog {
    /// Content shipped with the binary
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_TRICKS, EMBEDDED_QUESTIONS, EMBEDDED_QUIZZES)
    }

    /// Load content, replacing each embedded file whose override path is set
    pub fn load(settings: &ContentSettings) -> Result<Self, ContentError> {
        let tricks = read_or(&settings.tricks_path, EMBEDDED_TRICKS)?;
        let questions = read_or(&settings.questions_path, EMBEDDED_QUESTIONS)?;
        let quizzes = read_or(&settings.quizzes_path, EMBEDDED_QUIZZES)?;
        let catalog = Self::from_json(&tricks, &questions, &quizzes)?;

        info!(
            "[bowo:content] Loaded {} tricks, {} question sets, {} quizzes",
            catalog.tricks.len(),
            catalog.questions.trick_count(),
            catalog.quizzes.len()
        );
        Ok(catalog)
    }

    pub fn from_json(tricks: &str, questions: &str, quizzes: &str) -> Result<Self, ContentError> {
        let tricks = TrickCatalog::from_json(tricks)?;
        let questions = QuestionBank::from_json(questions)?;
        let quizzes = QuizBook::from_json(quizzes)?;

        for trick_id in questions.trick_ids().chain(quizzes.trick_ids()) {
            if tricks.get(trick_id).is_none() {
                return Err(ContentError::Invalid(format!(
                    "content references unknown trick '{trick_id}'"
                )));
            }
        }

        Ok(Self {
            tricks,
            questions,
            quizzes,
        })
    }
}

fn read_or(path: &str, embedded: &str) -> Result<String, ContentError> {
    if path.trim().is_empty() {
        return Ok(embedded.to_string());
    }
    std::fs::read_to_string(Path::new(path)).map_err(|source| ContentError::Io {
        path: path.to_string(),
        source,
    })
}
