// src/attempt.rs

//! Client-side scoring of quiz attempts.
//!
//! An attempt is a user's in-memory answer selection for one fetched quiz.
//! Scoring is a pure function over the quiz tree and the selection map; it
//! never talks to the server and nothing here is persisted.

use std::collections::HashMap;

use crate::models::quiz::QuizDetail;

/// Outcome of scoring one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptScore {
    pub correct: usize,
    pub total: usize,
}

/// A user's answer selection, keyed by question id. Unanswered questions are
/// simply absent from the map.
#[derive(Debug, Default)]
pub struct QuizAttempt {
    answers: HashMap<i64, String>,
}

impl QuizAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects an option for a question, replacing any earlier choice.
    pub fn select_answer(&mut self, question_id: i64, option_text: impl Into<String>) {
        self.answers.insert(question_id, option_text.into());
    }

    pub fn answers(&self) -> &HashMap<i64, String> {
        &self.answers
    }

    pub fn score(&self, quiz: &QuizDetail) -> AttemptScore {
        score_attempt(quiz, &self.answers)
    }
}

/// Counts the questions whose selected option text equals the stored
/// correct-option text, by exact string equality. Unanswered or mismatched
/// questions contribute zero; there is no partial credit and no negative
/// scoring. Selections for question ids not in the quiz are ignored.
pub fn score_attempt(quiz: &QuizDetail, answers: &HashMap<i64, String>) -> AttemptScore {
    let correct = quiz
        .questions
        .iter()
        .filter(|question| answers.get(&question.id) == Some(&question.correct_option))
        .count();

    AttemptScore {
        correct,
        total: quiz.questions.len(),
    }
}
