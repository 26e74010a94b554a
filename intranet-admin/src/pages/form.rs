//! Form page: loads a question set and submits the answers.

use std::mem;

use intranet_api::api::ResourceApi;
use intranet_api::error::Error;
use intranet_ui::form::DynamicForm;
use intranet_ui::form::FormError;
use intranet_ui::form::Question;
use intranet_ui::form::QuestionView;
use intranet_ui::toast::Toast;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

pub const NOT_FOUND_MESSAGE: &str = "Formulario no encontrado";
pub const SUBMITTED_MESSAGE: &str = "Respuestas enviadas correctamente";

/// Question set as served by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormDefinition {
    #[serde(default, alias = "titulo")]
    pub title: String,
    #[serde(alias = "preguntas")]
    pub questions: Vec<Question>,
}

/// Where the page is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Nothing loaded yet.
    Idle,
    Loading,
    Ready,
    /// Rendered inline instead of the form.
    NotFound,
    /// Loading failed; carries the message shown inline.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the answers; the form was reset.
    Sent,
    /// Validation failed; errors are marked on the form.
    Invalid,
    /// The request failed; answers are kept.
    Failed,
    /// No form loaded.
    NotReady,
    /// A previous submission is still in flight.
    Busy,
}

/// Owns a [`DynamicForm`] and its backend round-trips.
///
/// Questions come from `GET /{form_resource}/{form_id}`; answers are posted
/// to `POST /{answers_resource}` as
/// `{ "formularioId": .., "respuestas": { "<question id>": <answer> } }`.
pub struct FormPage<A: ResourceApi> {
    api: A,
    form_resource: String,
    answers_resource: String,
    form_id: String,
    title: String,
    form: Option<DynamicForm>,
    status: FormStatus,
    submitting: bool,
    toasts: Vec<Toast>,
}

impl<A: ResourceApi> FormPage<A> {
    pub fn new(
        api: A,
        form_resource: impl Into<String>,
        answers_resource: impl Into<String>,
        form_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            form_resource: form_resource.into(),
            answers_resource: answers_resource.into(),
            form_id: form_id.into(),
            title: String::new(),
            form: None,
            status: FormStatus::Idle,
            submitting: false,
            toasts: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn form(&self) -> Option<&DynamicForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut DynamicForm> {
        self.form.as_mut()
    }

    /// Inline message to show instead of the form, if any.
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            FormStatus::NotFound => Some(NOT_FOUND_MESSAGE),
            FormStatus::Failed(message) => Some(message),
            FormStatus::Idle | FormStatus::Loading | FormStatus::Ready => None,
        }
    }

    /// Render model of the questions (empty until loaded).
    pub fn questions(&self) -> Vec<QuestionView> {
        self.form.as_ref().map(DynamicForm::render).unwrap_or_default()
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        mem::take(&mut self.toasts)
    }

    /// Fetch the question set and build the form.
    pub async fn load(&mut self) {
        self.begin_load();
        let result = self.api.get(&self.form_resource, &self.form_id).await;
        self.finish_load(result);
    }

    /// Drop the current form and mark the page as loading.
    pub fn begin_load(&mut self) {
        self.title.clear();
        self.form = None;
        self.status = FormStatus::Loading;
    }

    /// Build the form from the definition fetched after
    /// [`begin_load`](Self::begin_load).
    pub fn finish_load(&mut self, result: Result<Value, Error>) {
        let body = match result {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                log::info!("[form] {}/{} not found", self.form_resource, self.form_id);
                self.status = FormStatus::NotFound;
                return;
            }
            Err(e) => {
                log::warn!("[form] failed to load {}: {}", self.form_id, e);
                self.toasts.push(Toast::error(e.user_message()));
                self.status = FormStatus::Failed(e.user_message());
                return;
            }
        };

        match build_form(body) {
            Ok((title, form)) => {
                log::debug!(
                    "[form] loaded {} with {} question(s)",
                    self.form_id,
                    form.questions().len()
                );
                self.title = title;
                self.form = Some(form);
                self.status = FormStatus::Ready;
            }
            Err(message) => {
                log::warn!("[form] invalid definition for {}: {}", self.form_id, message);
                self.toasts
                    .push(Toast::error("El formulario no es válido"));
                self.status = FormStatus::Failed(message);
            }
        }
    }

    /// Validate and post the answers.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let body = match self.begin_submit() {
            Ok(body) => body,
            Err(outcome) => return outcome,
        };
        let result = self.api.create(&self.answers_resource, body).await;
        self.finish_submit(result)
    }

    /// Validate the answers and mark the page as submitting.
    ///
    /// Returns the request body, or the outcome when there is nothing to
    /// send.
    pub fn begin_submit(&mut self) -> Result<Value, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::Busy);
        }
        let form_id = self.form_id.clone();
        let form = self.form.as_mut().ok_or(SubmitOutcome::NotReady)?;

        let body = form
            .submit(|answers| json!({ "formularioId": form_id, "respuestas": answers }))
            .map_err(|_| SubmitOutcome::Invalid)?;
        self.submitting = true;
        Ok(body)
    }

    /// Settle the submission started by [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, result: Result<Value, Error>) -> SubmitOutcome {
        self.submitting = false;

        match result {
            Ok(_) => {
                log::info!("[form] answers for {} sent", self.form_id);
                if let Some(form) = self.form.as_mut() {
                    form.reset();
                }
                self.toasts.push(Toast::success(SUBMITTED_MESSAGE));
                SubmitOutcome::Sent
            }
            Err(e) => {
                log::warn!("[form] submit for {} failed: {}", self.form_id, e);
                self.toasts.push(Toast::error(e.user_message()));
                SubmitOutcome::Failed
            }
        }
    }
}

/// Parse a definition body. Accepts `{ titulo, preguntas }` or a bare
/// question array.
fn build_form(body: Value) -> Result<(String, DynamicForm), String> {
    let definition = if body.is_array() {
        serde_json::from_value(body).map(|questions| FormDefinition {
            title: String::new(),
            questions,
        })
    } else {
        serde_json::from_value::<FormDefinition>(body)
    }
    .map_err(|e| e.to_string())?;

    let form = DynamicForm::new(definition.questions).map_err(|e: FormError| e.to_string())?;
    Ok((definition.title, form))
}
