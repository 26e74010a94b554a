//! Tests for the list and form pages against an in-memory backend.

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use intranet_admin::pages::{
    FormPage, FormStatus, ListPage, NOT_FOUND_MESSAGE, REVERT_TOAST_DURATION, SubmitOutcome,
};
use intranet_api::api::{ListQuery, ListResponse, ResourceApi};
use intranet_api::error::{ApiError, Error};
use intranet_ui::form::{BANNER_MESSAGE, REQUIRED_MESSAGE};
use intranet_ui::table::{
    BodyRow, ColumnDef, ColumnSet, DataTable, RowAction, TableEvent, TableState,
};
use intranet_ui::toast::ToastLevel;
use intranet_ui::updates::{RowUpdateError, UpdatePhase};
use serde_json::{Value, json};

// =============================================================================
// Fake backend
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List(ListQuery),
    Get(String),
    Create(Value),
    Update(String, Value),
    Delete(String),
    Copy(String, String),
}

#[derive(Default)]
struct FakeApi {
    rows: Mutex<Vec<Value>>,
    forms: Mutex<Vec<Value>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<BTreeSet<&'static str>>,
}

impl FakeApi {
    fn with_projects(count: usize) -> Self {
        let rows = (1..=count)
            .map(|i| json!({ "id": i, "nombre": format!("Proyecto {:02}", i), "estado": i % 2 == 0 }))
            .collect();
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    fn with_form(form: Value) -> Self {
        Self {
            forms: Mutex::new(vec![form]),
            ..Self::default()
        }
    }

    fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn last_query(&self) -> Option<ListQuery> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::List(q) => Some(q),
            _ => None,
        })
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: &'static str) -> Result<(), Error> {
        if self.failing.lock().unwrap().contains(operation) {
            return Err(ApiError::http(500, format!("{} rechazado", operation)).into());
        }
        Ok(())
    }

    fn stored(&self, id: &str) -> Option<Value> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r["id"].to_string() == id)
            .cloned()
    }
}

#[async_trait]
impl ResourceApi for FakeApi {
    async fn list(&self, _resource: &str, query: &ListQuery) -> Result<ListResponse<Value>, Error> {
        self.record(Call::List(query.clone()));
        self.check("list")?;

        let mut rows: Vec<Value> = self.rows.lock().unwrap().clone();
        if let Some(search) = &query.search {
            rows.retain(|r| r["nombre"].as_str().is_some_and(|n| n.contains(search.as_str())));
        }
        if let Some(estado) = query.filters.get("estado") {
            rows.retain(|r| r["estado"].to_string() == *estado);
        }
        if let Some((field, direction)) = &query.sort {
            rows.sort_by(|a, b| a[field].to_string().cmp(&b[field].to_string()));
            if direction == "desc" {
                rows.reverse();
            }
        }

        let total = rows.len();
        let data = rows
            .into_iter()
            .skip((query.page - 1) * query.limit)
            .take(query.limit)
            .collect();
        Ok(ListResponse::new(data, total))
    }

    async fn get(&self, resource: &str, id: &str) -> Result<Value, Error> {
        self.record(Call::Get(id.to_string()));
        self.check("get")?;
        self.forms
            .lock()
            .unwrap()
            .iter()
            .find(|f| f["id"].to_string() == id)
            .cloned()
            .ok_or_else(|| {
                ApiError::NotFound {
                    resource: resource.to_string(),
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn create(&self, _resource: &str, body: Value) -> Result<Value, Error> {
        self.record(Call::Create(body.clone()));
        self.check("create")?;
        Ok(json!({ "id": 1 }))
    }

    async fn update(&self, _resource: &str, id: &str, changes: Value) -> Result<Value, Error> {
        self.record(Call::Update(id.to_string(), changes.clone()));
        self.check("update")?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r["id"].to_string() == id)
            .ok_or_else(|| Error::from(ApiError::http(404, "Not Found")))?;
        if let (Some(row), Some(changes)) = (row.as_object_mut(), changes.as_object()) {
            for (key, value) in changes {
                row.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, _resource: &str, id: &str) -> Result<(), Error> {
        self.record(Call::Delete(id.to_string()));
        self.check("delete")?;
        self.rows.lock().unwrap().retain(|r| r["id"].to_string() != id);
        Ok(())
    }

    async fn copy(&self, _resource: &str, id: &str, new_name: &str) -> Result<Value, Error> {
        self.record(Call::Copy(id.to_string(), new_name.to_string()));
        self.check("copy")?;
        let mut rows = self.rows.lock().unwrap();
        let next_id = rows.len() + 100;
        let copy = json!({ "id": next_id, "nombre": new_name, "estado": false });
        rows.push(copy.clone());
        Ok(copy)
    }
}

fn project_table() -> DataTable<Value> {
    let columns = ColumnSet::new(vec![
        ColumnDef::new("nombre", "Nombre").sortable(),
        ColumnDef::new("estado", "Estado").sortable(),
    ])
    .unwrap();
    DataTable::new(columns).with_row_actions([RowAction::Edit, RowAction::Delete, RowAction::Copy])
}

async fn loaded_page(count: usize) -> ListPage<Value, FakeApi> {
    let mut page = ListPage::new(FakeApi::with_projects(count), "proyectos", project_table());
    page.refresh().await;
    page
}

// =============================================================================
// List page
// =============================================================================

#[tokio::test]
async fn test_refresh_loads_first_page() {
    let page = loaded_page(23).await;

    assert_eq!(page.rows().len(), 10);
    assert_eq!(page.total_count(), 23);
    assert!(!page.is_loading());
    assert_eq!(page.view().pagination.label(), "Mostrando 1-10 de 23");

    let query = page.api().last_query().unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(query.limit, 10);
}

#[tokio::test]
async fn test_loading_row_shown_between_phases() {
    let mut page = loaded_page(23).await;
    page.table_mut().next_page(23);

    let query = page.begin_refresh();
    assert_eq!(query.page, 2);
    assert!(page.is_loading());
    let view = page.view();
    assert!(matches!(view.rows.as_slice(), [BodyRow::Loading { .. }]));

    let result = page.api().list("proyectos", &query).await;
    assert!(!page.finish_refresh(result));
    assert!(!page.is_loading());
    assert_eq!(page.view().pagination.label(), "Mostrando 11-20 de 23");
}

#[tokio::test]
async fn test_paging_sends_one_based_page() {
    let mut page = loaded_page(23).await;

    page.interact(|table, total| table.last_page(total)).await;

    assert_eq!(page.api().last_query().unwrap().page, 3);
    assert_eq!(page.rows().len(), 3);
    assert_eq!(page.view().pagination.label(), "Mostrando 21-23 de 23");
}

#[tokio::test]
async fn test_sort_and_search_reach_the_query() {
    let mut page = loaded_page(23).await;
    page.interact(|table, total| table.next_page(total)).await;

    page.interact(|table, _| table.click_header("nombre")).await;
    page.interact(|table, _| table.click_header("nombre")).await;
    let query = page.api().last_query().unwrap();
    assert_eq!(query.sort, Some(("nombre".to_string(), "desc".to_string())));

    let event = page.table_mut().search("Proyecto 1");
    page.handle(event).await;
    let query = page.api().last_query().unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(query.search.as_deref(), Some("Proyecto 1"));
    assert_eq!(page.total_count(), 10);
}

#[tokio::test]
async fn test_filter_values_are_stringified() {
    let mut page = loaded_page(6).await;
    let event = page.table_mut().set_filter("estado", json!(true));
    page.handle(event).await;

    let query = page.api().last_query().unwrap();
    assert_eq!(query.filters.get("estado").map(String::as_str), Some("true"));
    assert_eq!(page.total_count(), 3);
}

#[tokio::test]
async fn test_visibility_change_does_not_fetch() {
    let mut page = loaded_page(5).await;
    let before = page.api().calls().len();

    let edit = page.interact(|table, _| table.toggle_column("estado")).await;

    assert_eq!(edit, None);
    assert_eq!(page.api().calls().len(), before);
    assert_eq!(page.view().headers.len(), 1);
}

#[tokio::test]
async fn test_list_failure_becomes_toast() {
    let api = FakeApi::with_projects(3);
    api.fail("list");
    let mut page = ListPage::new(api, "proyectos", project_table());

    page.refresh().await;

    assert!(page.rows().is_empty());
    let toasts = page.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);
    assert_eq!(toasts[0].message, "list rechazado");
    assert!(page.take_toasts().is_empty());
}

#[tokio::test]
async fn test_edit_action_is_returned_to_caller() {
    let mut page = loaded_page(3).await;
    let target = page
        .handle(TableEvent::RowAction {
            row_id: "2".to_string(),
            action: RowAction::Edit,
        })
        .await;
    assert_eq!(target.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_delete_reloads_and_toasts() {
    let mut page = loaded_page(3).await;

    let event = page.table().row_action("2", RowAction::Delete).unwrap();
    page.handle(event).await;

    assert_eq!(page.total_count(), 2);
    assert!(page.row("2").is_none());
    let toasts = page.take_toasts();
    assert_eq!(toasts[0].level, ToastLevel::Success);
}

#[tokio::test]
async fn test_deleting_last_row_of_last_page_moves_back() {
    let mut page = loaded_page(11).await;
    page.interact(|table, total| table.last_page(total)).await;
    assert_eq!(page.table().state().page_index(), 1);

    page.delete_row("11").await;

    assert_eq!(page.table().state().page_index(), 0);
    assert_eq!(page.rows().len(), 10);
}

#[tokio::test]
async fn test_copy_uses_copy_prefix() {
    let mut page = loaded_page(2).await;

    page.copy_row("1").await;

    assert!(page.api().calls().contains(&Call::Copy(
        "1".to_string(),
        "Copia de Proyecto 01".to_string()
    )));
    assert_eq!(page.total_count(), 3);
}

#[tokio::test]
async fn test_failed_delete_keeps_rows() {
    let mut page = loaded_page(2).await;
    page.api().fail("delete");

    assert!(!page.delete_row("1").await);
    assert_eq!(page.rows().len(), 2);
    assert_eq!(page.take_toasts()[0].level, ToastLevel::Error);
}

// =============================================================================
// Optimistic updates
// =============================================================================

#[tokio::test]
async fn test_toggle_commits_and_sends_only_the_field() {
    let mut page = loaded_page(3).await;

    let phase = page.toggle_field("1", "estado").await.unwrap();

    assert_eq!(phase, UpdatePhase::Committed);
    assert_eq!(page.row("1").unwrap()["estado"], json!(true));
    assert!(
        page.api()
            .calls()
            .contains(&Call::Update("1".to_string(), json!({ "estado": true })))
    );
    assert_eq!(page.api().stored("1").unwrap()["estado"], json!(true));
    assert!(page.take_toasts().is_empty());
}

#[tokio::test]
async fn test_toggle_failure_reverts_and_toasts() {
    let mut page = loaded_page(3).await;
    page.api().fail("update");

    let phase = page.toggle_field("2", "estado").await.unwrap();

    assert_eq!(phase, UpdatePhase::Reverted);
    assert_eq!(page.row("2").unwrap()["estado"], json!(true));
    assert_eq!(page.updates().phase("2"), Some(UpdatePhase::Reverted));
    let toasts = page.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].is_error());
    assert!(toasts[0].message.starts_with("No se pudo actualizar"));
    assert_eq!(toasts[0].duration, REVERT_TOAST_DURATION);
}

#[tokio::test]
async fn test_second_update_refused_while_first_in_flight() {
    let mut page = loaded_page(3).await;

    let body = page.begin_update("1", "estado", json!(true)).unwrap();
    assert_eq!(body, json!({ "estado": true }));
    assert!(page.updates().is_pending("1"));
    assert_eq!(page.updates().phase("1"), Some(UpdatePhase::Pending));
    assert_eq!(page.row("1").unwrap()["estado"], json!(true));

    let err = page.begin_update("1", "estado", json!(false)).unwrap_err();
    assert_eq!(err, RowUpdateError::InFlight("1".to_string()));
    assert_eq!(page.row("1").unwrap()["estado"], json!(true));

    let result = page.api().update("proyectos", "1", body).await;
    assert_eq!(
        page.finish_update("1", "estado", result),
        Ok(UpdatePhase::Committed)
    );
    assert!(!page.updates().is_pending("1"));
}

#[tokio::test]
async fn test_revert_removes_field_the_row_did_not_have() {
    let mut page = loaded_page(3).await;
    page.api().fail("update");

    let phase = page.update_field("1", "archivado", json!(true)).await.unwrap();

    assert_eq!(phase, UpdatePhase::Reverted);
    let row = page.row("1").unwrap();
    assert!(row.get("archivado").is_none());
    assert_eq!(row, &json!({ "id": 1, "nombre": "Proyecto 01", "estado": false }));
}

#[tokio::test]
async fn test_update_unknown_row_is_rejected() {
    let mut page = loaded_page(3).await;
    let err = page.toggle_field("99", "estado").await.unwrap_err();
    assert_eq!(err, RowUpdateError::UnknownRow("99".to_string()));
}

#[tokio::test]
async fn test_settled_update_allows_next_toggle() {
    let mut page = loaded_page(3).await;

    page.toggle_field("1", "estado").await.unwrap();
    page.toggle_field("1", "estado").await.unwrap();

    assert_eq!(page.row("1").unwrap()["estado"], json!(false));
    let updates = page
        .api()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Update(..)))
        .count();
    assert_eq!(updates, 2);
}

#[tokio::test]
async fn test_page_size_from_config_state() {
    let table = project_table().with_state(TableState::new().with_page_size(20));
    let mut page = ListPage::new(FakeApi::with_projects(23), "proyectos", table);
    page.refresh().await;

    assert_eq!(page.rows().len(), 20);
    match &page.view().rows[0] {
        BodyRow::Data { actions, .. } => assert_eq!(actions.len(), 3),
        other => panic!("expected data row, got {:?}", other),
    }
}

// =============================================================================
// Form page
// =============================================================================

fn survey() -> Value {
    json!({
        "id": 5,
        "titulo": "Encuesta de satisfacción",
        "preguntas": [
            { "id": 1, "type": "TEXT", "label": "Nombre" },
            { "id": 2, "type": "MULTIPLECHOICE", "label": "Servicios",
              "options": [{ "id": 0, "label": "Soporte" }, { "id": 1, "label": "Redes" }] }
        ]
    })
}

#[tokio::test]
async fn test_form_loads_questions() {
    let mut page = FormPage::new(FakeApi::with_form(survey()), "formularios", "respuestas", "5");
    page.load().await;

    assert_eq!(page.status(), &FormStatus::Ready);
    assert_eq!(page.title(), "Encuesta de satisfacción");
    assert_eq!(page.questions().len(), 2);
    assert_eq!(page.message(), None);
}

#[tokio::test]
async fn test_missing_form_shows_not_found() {
    let mut page = FormPage::new(FakeApi::default(), "formularios", "respuestas", "404");
    page.load().await;

    assert_eq!(page.status(), &FormStatus::NotFound);
    assert_eq!(page.message(), Some(NOT_FOUND_MESSAGE));
    assert!(page.take_toasts().is_empty());
    assert_eq!(page.submit().await, SubmitOutcome::NotReady);
}

#[tokio::test]
async fn test_reload_into_missing_form_clears_title() {
    let mut page = FormPage::new(FakeApi::with_form(survey()), "formularios", "respuestas", "5");
    page.load().await;
    assert_eq!(page.title(), "Encuesta de satisfacción");

    page.begin_load();
    assert_eq!(page.status(), &FormStatus::Loading);
    assert_eq!(page.title(), "");
    assert!(page.questions().is_empty());

    let result = page.api().get("formularios", "6").await;
    page.finish_load(result);
    assert_eq!(page.status(), &FormStatus::NotFound);
    assert_eq!(page.title(), "");
}

#[tokio::test]
async fn test_submitting_flag_spans_the_request() {
    let mut page = FormPage::new(FakeApi::with_form(survey()), "formularios", "respuestas", "5");
    page.load().await;
    {
        let form = page.form_mut().unwrap();
        form.set_text(1, "Ana").unwrap();
        form.toggle_choice(2, 0, true).unwrap();
    }

    let body = page.begin_submit().unwrap();
    assert!(page.is_submitting());
    assert_eq!(page.begin_submit(), Err(SubmitOutcome::Busy));

    let result = page.api().create("respuestas", body).await;
    assert_eq!(page.finish_submit(result), SubmitOutcome::Sent);
    assert!(!page.is_submitting());
}

#[tokio::test]
async fn test_invalid_submit_does_not_post() {
    let mut page = FormPage::new(FakeApi::with_form(survey()), "formularios", "respuestas", "5");
    page.load().await;
    page.form_mut().unwrap().set_text(1, "Ana").unwrap();

    assert_eq!(page.submit().await, SubmitOutcome::Invalid);

    let form = page.form().unwrap();
    assert_eq!(form.error(1), None);
    assert_eq!(form.error(2), Some(REQUIRED_MESSAGE));
    assert_eq!(form.banner(), Some(BANNER_MESSAGE));
    assert!(!page.api().calls().iter().any(|c| matches!(c, Call::Create(_))));
}

#[tokio::test]
async fn test_valid_submit_posts_answers_and_resets() {
    let mut page = FormPage::new(FakeApi::with_form(survey()), "formularios", "respuestas", "5");
    page.load().await;
    {
        let form = page.form_mut().unwrap();
        form.set_text(1, "Ana").unwrap();
        form.toggle_choice(2, 0, true).unwrap();
        form.toggle_choice(2, 1, true).unwrap();
    }

    assert_eq!(page.submit().await, SubmitOutcome::Sent);

    let expected = json!({
        "formularioId": "5",
        "respuestas": { "1": "Ana", "2": [0, 1] }
    });
    assert!(page.api().calls().contains(&Call::Create(expected)));
    assert_eq!(page.form().unwrap().answer(1).unwrap().text(), Some(""));
    assert_eq!(page.take_toasts()[0].level, ToastLevel::Success);
}

#[tokio::test]
async fn test_failed_submit_keeps_answers() {
    let api = FakeApi::with_form(survey());
    api.fail("create");
    let mut page = FormPage::new(api, "formularios", "respuestas", "5");
    page.load().await;
    {
        let form = page.form_mut().unwrap();
        form.set_text(1, "Ana").unwrap();
        form.toggle_choice(2, 1, true).unwrap();
    }

    assert_eq!(page.submit().await, SubmitOutcome::Failed);
    assert_eq!(page.form().unwrap().answer(1).unwrap().text(), Some("Ana"));
    assert!(page.take_toasts()[0].is_error());
}
