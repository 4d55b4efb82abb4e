//! Quiz scoring for the quiz maker and the reading trainer.

use serde::{Deserialize, Serialize};
use studyhub_core::{Answers, Question, QuestionId};

/// Errors raised while scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    /// A quiz without questions has no defined score
    #[error("cannot score a quiz with no questions")]
    EmptyQuiz,
}

/// Percentage of correctly answered questions, rounded half up.
///
/// Unanswered questions count as incorrect.
pub fn score(questions: &[Question], answers: &Answers) -> Result<u32, ScoreError> {
    let total = questions.len();
    if total == 0 {
        return Err(ScoreError::EmptyQuiz);
    }
    let correct = count_correct(questions, answers);
    Ok(percentage(correct, total))
}

fn count_correct(questions: &[Question], answers: &Answers) -> usize {
    questions
        .iter()
        .filter(|q| q.is_correct(answers.get(&q.id).copied()))
        .count()
}

fn percentage(correct: usize, total: usize) -> u32 {
    let (correct, total) = (correct as u64, total as u64);
    ((200 * correct + total) / (2 * total)) as u32
}

/// Review of one answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    /// Question reviewed
    pub id: QuestionId,
    /// Option chosen, if any
    pub chosen: Option<usize>,
    /// Correct option
    pub correct_answer: usize,
    /// Whether the chosen option was correct
    pub correct: bool,
}

/// Full result of a graded quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Correct answers
    pub correct: usize,
    /// Questions in the quiz
    pub total: usize,
    /// Rounded percentage
    pub percentage: u32,
    /// Per-question review, in quiz order
    pub review: Vec<QuestionReview>,
}

impl QuizResult {
    /// Grade a quiz.
    pub fn grade(questions: &[Question], answers: &Answers) -> Result<Self, ScoreError> {
        let percentage = score(questions, answers)?;
        let review: Vec<QuestionReview> = questions
            .iter()
            .map(|q| {
                let chosen = answers.get(&q.id).copied();
                QuestionReview {
                    id: q.id.clone(),
                    chosen,
                    correct_answer: q.correct_answer,
                    correct: q.is_correct(chosen),
                }
            })
            .collect();

        Ok(Self {
            correct: review.iter().filter(|r| r.correct).count(),
            total: questions.len(),
            percentage,
            review,
        })
    }

    /// Whether the percentage reaches a pass mark.
    pub fn passed(&self, pass_mark: u32) -> bool {
        self.percentage >= pass_mark
    }
}
