// src/form.rs

//! Draft state for the quiz authoring form.
//!
//! The form owns an explicit local state object with pure transition
//! functions; no shared or global mutation. Pre-submit validation mirrors
//! the server-side rules, so an invalid draft never produces a request
//! payload (and therefore never causes a network call).

use std::fmt;

use crate::models::quiz::{CreateQuizRequest, QuestionPayload};

/// Number of blank option slots a fresh question draft starts with.
const DEFAULT_OPTION_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Collapsed,
    Editing,
}

/// One question under construction.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option: String,
}

impl QuestionDraft {
    fn blank() -> Self {
        Self {
            question_text: String::new(),
            options: vec![String::new(); DEFAULT_OPTION_SLOTS],
            correct_option: String::new(),
        }
    }
}

/// Reasons a draft is rejected before any network call. Shown to the user
/// as an inline notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    TitleMissing,
    NoQuestions,
    QuestionIncomplete { index: usize },
    CorrectOptionNotListed { index: usize },
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::TitleMissing => write!(f, "Title is required."),
            DraftError::NoQuestions => write!(f, "At least one question is required."),
            DraftError::QuestionIncomplete { index } => write!(
                f,
                "Question {} needs text and at least two options.",
                index + 1
            ),
            DraftError::CorrectOptionNotListed { index } => write!(
                f,
                "Question {}: correct option must be one of the provided options.",
                index + 1
            ),
        }
    }
}

/// The authoring form: collapsed by default, editing a mutable draft while
/// open. Opening and closing are explicit; there are no intermediate states.
#[derive(Debug)]
pub struct QuizForm {
    state: FormState,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDraft>,
}

impl QuizForm {
    /// A collapsed form holding a fresh draft with one blank question.
    pub fn new() -> Self {
        Self {
            state: FormState::Collapsed,
            title: String::new(),
            description: String::new(),
            questions: vec![QuestionDraft::blank()],
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn open(&mut self) {
        self.state = FormState::Editing;
    }

    /// Closes the editor. The draft is kept and survives a reopen.
    pub fn close(&mut self) {
        self.state = FormState::Collapsed;
    }

    /// Appends a new blank question draft.
    pub fn add_question(&mut self) {
        self.questions.push(QuestionDraft::blank());
    }

    /// Removes the question draft at `index`; out-of-range positions are
    /// ignored.
    pub fn remove_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.questions.remove(index);
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_question_text(&mut self, index: usize, text: impl Into<String>) {
        if let Some(question) = self.questions.get_mut(index) {
            question.question_text = text.into();
        }
    }

    pub fn set_option(&mut self, question: usize, slot: usize, text: impl Into<String>) {
        if let Some(draft) = self.questions.get_mut(question) {
            if let Some(option) = draft.options.get_mut(slot) {
                *option = text.into();
            }
        }
    }

    pub fn set_correct_option(&mut self, index: usize, text: impl Into<String>) {
        if let Some(question) = self.questions.get_mut(index) {
            question.correct_option = text.into();
        }
    }

    /// Validates the draft and builds the request payload.
    ///
    /// Blank option slots are dropped first; the remaining draft must pass
    /// the same rules the server enforces. On success the form collapses
    /// and holds a fresh draft again; the caller is expected to refresh its
    /// quiz list.
    pub fn submit(&mut self) -> Result<CreateQuizRequest, DraftError> {
        let payload = self.build_payload()?;
        *self = Self::new();
        Ok(payload)
    }

    fn build_payload(&self) -> Result<CreateQuizRequest, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::TitleMissing);
        }
        if self.questions.is_empty() {
            return Err(DraftError::NoQuestions);
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for (index, draft) in self.questions.iter().enumerate() {
            let options: Vec<String> = draft
                .options
                .iter()
                .filter(|opt| !opt.trim().is_empty())
                .cloned()
                .collect();

            if draft.question_text.trim().is_empty() || options.len() < 2 {
                return Err(DraftError::QuestionIncomplete { index });
            }
            if !options.contains(&draft.correct_option) {
                return Err(DraftError::CorrectOptionNotListed { index });
            }

            questions.push(QuestionPayload {
                question_text: draft.question_text.clone(),
                options,
                correct_option: draft.correct_option.clone(),
            });
        }

        let description = if self.description.trim().is_empty() {
            None
        } else {
            Some(self.description.clone())
        };

        Ok(CreateQuizRequest {
            title: self.title.clone(),
            description,
            questions,
        })
    }
}

impl Default for QuizForm {
    fn default() -> Self {
        Self::new()
    }
}
