//! Quiz model shared by the quiz maker and the reading trainer.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::id::{QuestionId, RecordId};

/// Chosen option index per question.
pub type Answers = HashMap<QuestionId, usize>;

/// A quiz as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Backend id; absent until the quiz is created
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Quiz title
    pub title: String,

    /// Questions in display order
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Create a new, unsaved quiz.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            questions: Vec::new(),
        }
    }

    /// Add a question.
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question id, unique within its quiz
    pub id: QuestionId,

    /// Prompt text
    pub prompt: String,

    /// Answer options
    #[serde(default)]
    pub options: Vec<String>,

    /// Index of the correct option
    pub correct_answer: usize,
}

impl Question {
    /// Create a question.
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
            correct_answer,
        }
    }

    /// Whether the given answer is correct.
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer)
    }
}
