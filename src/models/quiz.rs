// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,

    /// The chapter this quiz belongs to.
    pub chapter_id: i64,

    pub title: String,

    pub description: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,

    pub question_text: String,

    /// The literal text of the correct option, not an index. Must equal one
    /// of the question's option texts at creation time.
    pub correct_option: String,
}

/// Represents the 'options' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub option_text: String,
}

/// A question populated with its option rows, in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub id: i64,
    pub quiz_id: i64,
    pub question_text: String,
    pub correct_option: String,
    pub options: Vec<QuestionOption>,
}

/// A quiz populated with its full question→option tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetail {
    pub id: i64,
    pub chapter_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub questions: Vec<QuestionDetail>,
}

impl QuizDetail {
    pub fn new(quiz: Quiz, questions: Vec<QuestionDetail>) -> Self {
        Self {
            id: quiz.id,
            chapter_id: quiz.chapter_id,
            title: quiz.title,
            description: quiz.description,
            created_at: quiz.created_at,
            questions,
        }
    }
}

/// One question in a quiz-creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option: String,
}

/// DTO for creating a quiz together with its nested questions and options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionPayload>,
}

impl CreateQuizRequest {
    /// Checks the whole payload up front; nothing is written when any
    /// question is malformed.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title required".to_string()));
        }
        if self.questions.is_empty() {
            return Err(AppError::Validation(
                "at least one question required".to_string(),
            ));
        }
        for question in &self.questions {
            if question.question_text.trim().is_empty() || question.options.len() < 2 {
                return Err(AppError::Validation(
                    "each question needs text and at least two options".to_string(),
                ));
            }
            if question.options.iter().any(|opt| opt.trim().is_empty()) {
                return Err(AppError::Validation("option text required".to_string()));
            }
            if !question.options.contains(&question.correct_option) {
                return Err(AppError::Validation(
                    "correct option must be one of the provided options".to_string(),
                ));
            }
        }
        Ok(())
    }
}
