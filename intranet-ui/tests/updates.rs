use intranet_ui::toast::{DEFAULT_TOAST_DURATION, Toast, ToastLevel};
use intranet_ui::updates::{RowUpdateError, RowUpdates, UpdatePhase};

#[test]
fn test_default_tracker_is_empty() {
    let mut updates: RowUpdates<bool> = RowUpdates::default();
    assert!(!updates.is_pending("1"));
    assert_eq!(updates.phase("1"), None);
    assert_eq!(
        updates.commit("1").unwrap_err(),
        RowUpdateError::NotPending("1".to_string())
    );
}

#[test]
fn test_commit_keeps_next_value() {
    let mut updates = RowUpdates::new();
    updates.begin("7", false, true).unwrap();
    assert!(updates.is_pending("7"));

    assert_eq!(updates.commit("7"), Ok(true));
    assert_eq!(updates.phase("7"), Some(UpdatePhase::Committed));
}

#[test]
fn test_revert_returns_previous_value() {
    let mut updates = RowUpdates::new();
    updates.begin("7", false, true).unwrap();

    assert_eq!(updates.revert("7"), Ok(false));
    assert_eq!(updates.phase("7"), Some(UpdatePhase::Reverted));
}

#[test]
fn test_second_update_while_pending_is_rejected() {
    let mut updates = RowUpdates::new();
    updates.begin("7", false, true).unwrap();

    assert_eq!(
        updates.begin("7", true, false).unwrap_err(),
        RowUpdateError::InFlight("7".to_string())
    );
    // Other rows are independent.
    assert!(updates.begin("8", false, true).is_ok());
}

#[test]
fn test_settled_row_accepts_new_update() {
    let mut updates = RowUpdates::new();
    updates.begin("7", false, true).unwrap();
    updates.commit("7").unwrap();

    let update = updates.begin("7", true, false).unwrap();
    assert_eq!(update.phase, UpdatePhase::Pending);
    assert!(!update.next);
}

#[test]
fn test_settle_without_pending_fails() {
    let mut updates: RowUpdates<bool> = RowUpdates::new();
    assert_eq!(
        updates.commit("1"),
        Err(RowUpdateError::NotPending("1".to_string()))
    );

    updates.begin("1", false, true).unwrap();
    updates.revert("1").unwrap();
    assert!(updates.revert("1").is_err());

    updates.clear_settled();
    assert!(updates.get("1").is_none());
}

#[test]
fn test_toast_constructors() {
    let toast = Toast::error("No se pudo actualizar");
    assert_eq!(toast.level, ToastLevel::Error);
    assert!(toast.is_error());
    assert_eq!(toast.duration, DEFAULT_TOAST_DURATION);

    let toast: Toast = "Guardado".into();
    assert_eq!(toast.level, ToastLevel::Info);
}
