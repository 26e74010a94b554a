//! Validation results for the dynamic form.

use super::question::QuestionId;

/// Message for a question left unanswered.
pub const REQUIRED_MESSAGE: &str = "Este campo es obligatorio";

/// Form-level banner shown when any question fails.
pub const BANNER_MESSAGE: &str = "Por favor, completa todos los campos obligatorios.";

/// A single failed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub question_id: QuestionId,
    pub message: String,
}

/// Result of validating every question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// All questions passed.
    #[default]
    Valid,
    /// One or more questions failed, in question order.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Question to scroll into view.
    pub fn first_invalid(&self) -> Option<QuestionId> {
        self.first_error().map(|e| e.question_id)
    }
}
