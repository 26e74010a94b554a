//! Answer values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::question::{OptionId, QuestionId, QuestionKind};

/// Metadata of an attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub name: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// An answer. Its shape follows the question kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// Text, number and date questions.
    Text(String),
    /// Single choice and dropdown questions.
    Choice(Option<OptionId>),
    /// Multiple choice questions. Always a list, possibly empty.
    Choices(Vec<OptionId>),
    /// File questions.
    File(Option<FileAttachment>),
}

/// Answers keyed by question id.
pub type AnswerMap = BTreeMap<QuestionId, Answer>;

impl Answer {
    /// The blank answer for a question kind.
    pub fn initial(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Text | QuestionKind::Number | QuestionKind::Date => {
                Self::Text(String::new())
            }
            QuestionKind::SingleChoice | QuestionKind::Dropdown => Self::Choice(None),
            QuestionKind::MultipleChoice => Self::Choices(Vec::new()),
            QuestionKind::File => Self::File(None),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<OptionId> {
        match self {
            Self::Choice(id) => *id,
            _ => None,
        }
    }

    pub fn choices(&self) -> &[OptionId] {
        match self {
            Self::Choices(ids) => ids,
            _ => &[],
        }
    }

    pub fn file(&self) -> Option<&FileAttachment> {
        match self {
            Self::File(file) => file.as_ref(),
            _ => None,
        }
    }

    /// Whether the answer satisfies the required-field rule.
    ///
    /// Blank text fails; an unselected choice fails (option `0` passes);
    /// an empty multiple choice fails; a missing file fails.
    pub fn is_answered(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            Self::Choice(id) => id.is_some(),
            Self::Choices(ids) => !ids.is_empty(),
            Self::File(file) => file.is_some(),
        }
    }
}
