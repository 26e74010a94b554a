//! Question descriptors.

use serde::{Deserialize, Serialize};

use super::FormError;

/// Question identifier.
pub type QuestionId = u64;

/// Option identifier. `0` is a valid id.
pub type OptionId = u64;

/// The closed set of question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    Text,
    Number,
    Date,
    File,
    SingleChoice,
    MultipleChoice,
    Dropdown,
}

impl QuestionKind {
    /// Whether the kind needs a non-empty option list.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            Self::SingleChoice | Self::MultipleChoice | Self::Dropdown
        )
    }

    /// Whether answers are free text (text, number, date).
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Number | Self::Date)
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: OptionId,
    pub label: String,
}

/// A question descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub label: String,
    /// Only meaningful for choice kinds.
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

impl Question {
    pub fn new(id: QuestionId, kind: QuestionKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            options: Vec::new(),
        }
    }

    /// Add an option.
    pub fn with_option(mut self, id: OptionId, label: impl Into<String>) -> Self {
        self.options.push(ChoiceOption {
            id,
            label: label.into(),
        });
        self
    }

    /// Look up an option by id.
    pub fn option(&self, id: OptionId) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Check the descriptor's shape.
    pub fn check(&self) -> Result<(), FormError> {
        if self.kind.has_options() && self.options.is_empty() {
            return Err(FormError::MissingOptions { question: self.id });
        }
        Ok(())
    }
}
