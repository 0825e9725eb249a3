//! Mastery question bank: one question per (trick, level 1..=8)

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::ContentError;
use crate::progression::MASTERY_LEVEL;
use crate::progression::mastery::answer_matches;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub level: u8,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Canonical answer
    pub answer: String,
    #[serde(default)]
    pub tip: Option<String>,
}

impl Question {
    pub fn is_correct(&self, submitted: &str) -> bool {
        answer_matches(submitted, &self.answer)
    }

    pub fn view(&self, trick_id: &str) -> QuestionView {
        QuestionView {
            trick_id: trick_id.to_string(),
            level: self.level,
            prompt: self.prompt.clone(),
            options: self.options.clone(),
            tip: self.tip.clone(),
        }
    }
}

/// Question as sent to the client (answer withheld)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub trick_id: String,
    pub level: u8,
    pub prompt: String,
    pub options: Vec<String>,
    pub tip: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    by_trick: HashMap<String, BTreeMap<u8, Question>>,
}

impl QuestionBank {
    /// Parse `{ "<trickId>": [question, ...] }`
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let raw: HashMap<String, Vec<Question>> = serde_json::from_str(json)?;
        let mut by_trick = HashMap::with_capacity(raw.len());

        for (trick_id, questions) in raw {
            let mut levels = BTreeMap::new();
            for question in questions {
                if !(1..=MASTERY_LEVEL).contains(&question.level) {
                    return Err(ContentError::Invalid(format!(
                        "question for '{}' has level {} outside 1..={}",
                        trick_id, question.level, MASTERY_LEVEL
                    )));
                }
                if question.answer.trim().is_empty() {
                    return Err(ContentError::Invalid(format!(
                        "question '{}' level {} has no answer",
                        trick_id, question.level
                    )));
                }
                let level = question.level;
                if levels.insert(level, question).is_some() {
                    return Err(ContentError::Invalid(format!(
                        "duplicate level {level} for '{trick_id}'"
                    )));
                }
            }
            by_trick.insert(trick_id, levels);
        }

        Ok(Self { by_trick })
    }

    pub fn get(&self, trick_id: &str, level: u8) -> Option<&Question> {
        self.by_trick.get(trick_id)?.get(&level)
    }

    pub fn trick_ids(&self) -> impl Iterator<Item = &str> {
        self.by_trick.keys().map(String::as_str)
    }

    pub fn trick_count(&self) -> usize {
        self.by_trick.len()
    }
}
