//! Question renderer: maps each question kind to its input widget.

use super::answer::{Answer, FileAttachment};
use super::question::{ChoiceOption, OptionId, Question, QuestionId, QuestionKind};

/// Placeholder of an empty dropdown.
pub const SELECT_PLACEHOLDER: &str = "Selecciona una opción";

/// A radio or checkbox entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: OptionId,
    pub label: String,
    pub checked: bool,
}

/// Input widget for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    TextInput { value: String },
    NumberInput { value: String },
    DateInput { value: String },
    FilePicker { file: Option<FileAttachment> },
    RadioGroup { options: Vec<OptionView> },
    CheckboxGroup { options: Vec<OptionView> },
    Select {
        options: Vec<ChoiceOption>,
        selected: Option<OptionId>,
        placeholder: &'static str,
    },
}

/// A rendered question: label, widget and inline error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    pub label: String,
    pub widget: Widget,
    pub error: Option<String>,
}

fn option_views(question: &Question, checked: impl Fn(OptionId) -> bool) -> Vec<OptionView> {
    question
        .options
        .iter()
        .map(|o| OptionView {
            id: o.id,
            label: o.label.clone(),
            checked: checked(o.id),
        })
        .collect()
}

/// Build the widget for a question and its current answer.
pub fn render_widget(question: &Question, answer: &Answer) -> Widget {
    let text = || answer.text().unwrap_or_default().to_string();
    match question.kind {
        QuestionKind::Text => Widget::TextInput { value: text() },
        QuestionKind::Number => Widget::NumberInput { value: text() },
        QuestionKind::Date => Widget::DateInput { value: text() },
        QuestionKind::File => Widget::FilePicker {
            file: answer.file().cloned(),
        },
        QuestionKind::SingleChoice => Widget::RadioGroup {
            options: option_views(question, |id| answer.selected() == Some(id)),
        },
        QuestionKind::MultipleChoice => Widget::CheckboxGroup {
            options: option_views(question, |id| answer.choices().contains(&id)),
        },
        QuestionKind::Dropdown => Widget::Select {
            options: question.options.clone(),
            selected: answer.selected(),
            placeholder: SELECT_PLACEHOLDER,
        },
    }
}
