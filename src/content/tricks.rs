//! Trick catalog

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ContentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trick {
    pub id: String,
    pub name: String,
    pub category: String,
    /// 1 (first day) to 5
    pub difficulty: u8,
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Trick {
    /// Starter tricks are open to every user without an unlock
    pub fn is_starter(&self) -> bool {
        self.difficulty == 1
    }
}

/// Tricks in catalog order, indexed by id
#[derive(Debug, Clone, Default)]
pub struct TrickCatalog {
    tricks: Vec<Trick>,
    index: HashMap<String, usize>,
}

impl TrickCatalog {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let tricks: Vec<Trick> = serde_json::from_str(json)?;
        Self::new(tricks)
    }

    pub fn new(tricks: Vec<Trick>) -> Result<Self, ContentError> {
        let mut index = HashMap::with_capacity(tricks.len());
        for (i, trick) in tricks.iter().enumerate() {
            if trick.id.trim().is_empty() {
                return Err(ContentError::Invalid(format!("trick #{i} has an empty id")));
            }
            if !(1..=5).contains(&trick.difficulty) {
                return Err(ContentError::Invalid(format!(
                    "trick '{}' has difficulty {} outside 1..=5",
                    trick.id, trick.difficulty
                )));
            }
            if index.insert(trick.id.clone(), i).is_some() {
                return Err(ContentError::Invalid(format!("duplicate trick '{}'", trick.id)));
            }
        }
        Ok(Self { tricks, index })
    }

    pub fn get(&self, id: &str) -> Option<&Trick> {
        self.index.get(id).map(|&i| &self.tricks[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn all(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn len(&self) -> usize {
        self.tricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tricks.is_empty()
    }
}
