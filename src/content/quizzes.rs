//! Unlock quizzes: one multiple-choice question per trick

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ContentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub trick_id: String,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_index: usize,
}

impl Quiz {
    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_index
    }

    pub fn view(&self) -> QuizView {
        QuizView {
            trick_id: self.trick_id.clone(),
            question: self.question.clone(),
            answers: self.answers.clone(),
        }
    }
}

/// Quiz as sent to the client (answer key withheld)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub trick_id: String,
    pub question: String,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuizBook {
    by_trick: HashMap<String, Quiz>,
}

impl QuizBook {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let quizzes: Vec<Quiz> = serde_json::from_str(json)?;
        let mut by_trick = HashMap::with_capacity(quizzes.len());
        for quiz in quizzes {
            if quiz.correct_index >= quiz.answers.len() {
                return Err(ContentError::Invalid(format!(
                    "quiz for '{}' points at answer {} of {}",
                    quiz.trick_id,
                    quiz.correct_index,
                    quiz.answers.len()
                )));
            }
            if by_trick.insert(quiz.trick_id.clone(), quiz).is_some() {
                return Err(ContentError::Invalid("duplicate quiz".to_string()));
            }
        }
        Ok(Self { by_trick })
    }

    pub fn get(&self, trick_id: &str) -> Option<&Quiz> {
        self.by_trick.get(trick_id)
    }

    pub fn trick_ids(&self) -> impl Iterator<Item = &str> {
        self.by_trick.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_trick.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_trick.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_index_must_exist() {
        let json = r#"[{"trickId": "ollie", "question": "?", "answers": ["a", "b"], "correctIndex": 2}]"#;
        assert!(QuizBook::from_json(json).is_err());
    }

    #[test]
    fn test_view_hides_key() {
        let json = r#"[{"trickId": "ollie", "question": "What is an Ollie?", "answers": ["a", "b"], "correctIndex": 1}]"#;
        let book = QuizBook::from_json(json).unwrap();
        let quiz = book.get("ollie").unwrap();
        assert!(quiz.is_correct(1));
        assert!(!quiz.is_correct(0));
        let view = serde_json::to_value(quiz.view()).unwrap();
        assert!(view.get("correctIndex").is_none());
    }
}
