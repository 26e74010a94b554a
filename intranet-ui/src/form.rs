//! Dynamic question/answer form.
//!
//! # Example
//!
//! ```ignore
//! let mut form = DynamicForm::new(questions)?;
//! form.set_text(1, "Informe anual")?;
//! form.toggle_choice(2, 0, true)?;
//!
//! match form.submit(|answers| serde_json::to_value(answers)) {
//!     Ok(body) => send(body?).await,
//!     Err(_) => scroll_to(form.scroll_target()),
//! }
//! ```

mod answer;
mod question;
mod render;
mod validation;

use std::collections::{BTreeMap, HashSet};

pub use answer::{Answer, AnswerMap, FileAttachment};
pub use question::{ChoiceOption, OptionId, Question, QuestionId, QuestionKind};
pub use render::{OptionView, QuestionView, SELECT_PLACEHOLDER, Widget, render_widget};
pub use validation::{BANNER_MESSAGE, FieldError, REQUIRED_MESSAGE, ValidationResult};

/// Errors from building or editing a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A choice question has no options.
    #[error("Question {question} needs at least one option")]
    MissingOptions { question: QuestionId },

    /// Two questions share an id.
    #[error("Duplicate question id {question}")]
    DuplicateQuestion { question: QuestionId },

    /// No question with this id.
    #[error("Unknown question {0}")]
    UnknownQuestion(QuestionId),

    /// The edit does not fit the question kind.
    #[error("Question {question} is not a {expected} question")]
    KindMismatch {
        question: QuestionId,
        expected: &'static str,
    },

    /// The option does not belong to the question.
    #[error("Option {option} does not belong to question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },

    /// Submission blocked by validation.
    #[error("{} question(s) are missing an answer", .0.len())]
    Invalid(Vec<FieldError>),
}

/// Form state over a fixed list of questions.
#[derive(Debug, Clone)]
pub struct DynamicForm {
    questions: Vec<Question>,
    answers: AnswerMap,
    errors: BTreeMap<QuestionId, Option<String>>,
    banner: Option<&'static str>,
    scroll_target: Option<QuestionId>,
}

impl DynamicForm {
    /// Create a form with blank answers.
    pub fn new(questions: Vec<Question>) -> Result<Self, FormError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            question.check()?;
            if !seen.insert(question.id) {
                return Err(FormError::DuplicateQuestion {
                    question: question.id,
                });
            }
        }

        let answers = questions
            .iter()
            .map(|q| (q.id, Answer::initial(q.kind)))
            .collect();
        let errors = questions.iter().map(|q| (q.id, None)).collect();

        Ok(Self {
            questions,
            answers,
            errors,
            banner: None,
            scroll_target: None,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer(&self, id: QuestionId) -> Option<&Answer> {
        self.answers.get(&id)
    }

    /// Error per question; `None` means no error.
    pub fn errors(&self) -> &BTreeMap<QuestionId, Option<String>> {
        &self.errors
    }

    pub fn error(&self, id: QuestionId) -> Option<&str> {
        self.errors.get(&id).and_then(|e| e.as_deref())
    }

    pub fn has_errors(&self) -> bool {
        self.errors.values().any(Option::is_some)
    }

    /// Form-level error banner.
    pub fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    /// First failing question of the last submit, to scroll into view.
    pub fn scroll_target(&self) -> Option<QuestionId> {
        self.scroll_target
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    fn kind_of(&self, id: QuestionId) -> Result<QuestionKind, FormError> {
        self.question(id)
            .map(|q| q.kind)
            .ok_or(FormError::UnknownQuestion(id))
    }

    fn check_option(&self, id: QuestionId, option: OptionId) -> Result<(), FormError> {
        let known = self.question(id).is_some_and(|q| q.option(option).is_some());
        if known {
            Ok(())
        } else {
            Err(FormError::UnknownOption {
                question: id,
                option,
            })
        }
    }

    fn clear_error(&mut self, id: QuestionId) {
        if let Some(error) = self.errors.get_mut(&id) {
            *error = None;
        }
        if !self.has_errors() {
            self.banner = None;
        }
    }

    /// Set the value of a text, number or date question.
    pub fn set_text(&mut self, id: QuestionId, value: impl Into<String>) -> Result<(), FormError> {
        if !self.kind_of(id)?.is_textual() {
            return Err(FormError::KindMismatch {
                question: id,
                expected: "text",
            });
        }
        self.answers.insert(id, Answer::Text(value.into()));
        self.clear_error(id);
        Ok(())
    }

    /// Select (or unselect with `None`) the option of a single-choice or
    /// dropdown question.
    pub fn select(&mut self, id: QuestionId, option: Option<OptionId>) -> Result<(), FormError> {
        match self.kind_of(id)? {
            QuestionKind::SingleChoice | QuestionKind::Dropdown => {}
            _ => {
                return Err(FormError::KindMismatch {
                    question: id,
                    expected: "single choice",
                });
            }
        }
        if let Some(option) = option {
            self.check_option(id, option)?;
        }
        self.answers.insert(id, Answer::Choice(option));
        self.clear_error(id);
        Ok(())
    }

    /// Check or uncheck an option of a multiple-choice question.
    ///
    /// Checking never duplicates an id; unchecking removes one occurrence.
    pub fn toggle_choice(
        &mut self,
        id: QuestionId,
        option: OptionId,
        checked: bool,
    ) -> Result<(), FormError> {
        if self.kind_of(id)? != QuestionKind::MultipleChoice {
            return Err(FormError::KindMismatch {
                question: id,
                expected: "multiple choice",
            });
        }
        self.check_option(id, option)?;

        let mut selected = self
            .answers
            .get(&id)
            .map(|a| a.choices().to_vec())
            .unwrap_or_default();
        if checked {
            if !selected.contains(&option) {
                selected.push(option);
            }
        } else if let Some(pos) = selected.iter().position(|o| *o == option) {
            selected.remove(pos);
        }
        self.answers.insert(id, Answer::Choices(selected));
        self.clear_error(id);
        Ok(())
    }

    /// Attach (or remove with `None`) the file of a file question.
    pub fn attach_file(
        &mut self,
        id: QuestionId,
        file: Option<FileAttachment>,
    ) -> Result<(), FormError> {
        if self.kind_of(id)? != QuestionKind::File {
            return Err(FormError::KindMismatch {
                question: id,
                expected: "file",
            });
        }
        self.answers.insert(id, Answer::File(file));
        self.clear_error(id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Validation and submit
    // -------------------------------------------------------------------------

    /// Validate every question at once.
    ///
    /// Failures are all marked together; the banner and scroll target are
    /// set from them. Passing questions have their error cleared.
    pub fn validate(&mut self) -> ValidationResult {
        let mut failures = Vec::new();

        for question in &self.questions {
            let answered = self
                .answers
                .get(&question.id)
                .is_some_and(Answer::is_answered);
            let slot = self.errors.entry(question.id).or_default();
            if answered {
                *slot = None;
            } else {
                *slot = Some(REQUIRED_MESSAGE.to_string());
                failures.push(FieldError {
                    question_id: question.id,
                    message: REQUIRED_MESSAGE.to_string(),
                });
            }
        }

        if failures.is_empty() {
            self.banner = None;
            self.scroll_target = None;
            ValidationResult::Valid
        } else {
            log::debug!("[form] {} question(s) failed validation", failures.len());
            self.banner = Some(BANNER_MESSAGE);
            self.scroll_target = failures.first().map(|f| f.question_id);
            ValidationResult::Invalid(failures)
        }
    }

    /// Validate, then hand the full answer map to `on_submit`.
    ///
    /// The form performs no I/O; `on_submit` decides what to do with the answers.
    pub fn submit<R>(&mut self, on_submit: impl FnOnce(&AnswerMap) -> R) -> Result<R, FormError> {
        match self.validate() {
            ValidationResult::Valid => Ok(on_submit(&self.answers)),
            ValidationResult::Invalid(errors) => Err(FormError::Invalid(errors)),
        }
    }

    /// Forget all answers and errors.
    pub fn reset(&mut self) {
        for question in &self.questions {
            self.answers.insert(question.id, Answer::initial(question.kind));
            self.errors.insert(question.id, None);
        }
        self.banner = None;
        self.scroll_target = None;
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// One view per question, in order.
    pub fn render(&self) -> Vec<QuestionView> {
        self.questions
            .iter()
            .map(|q| {
                let initial;
                let answer = match self.answers.get(&q.id) {
                    Some(answer) => answer,
                    None => {
                        initial = Answer::initial(q.kind);
                        &initial
                    }
                };
                QuestionView {
                    id: q.id,
                    label: q.label.clone(),
                    widget: render_widget(q, answer),
                    error: self.error(q.id).map(str::to_string),
                }
            })
            .collect()
    }
}
