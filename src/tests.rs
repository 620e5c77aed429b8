use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::domain::entities::fleet::User;
use crate::domain::entities::measurement::{MeasurementKind, MeasurementRow, MeasurementValues};
use crate::domain::forms::{PartForm, ShipForm};
use crate::infra::import::RawSheet;
use crate::infra::simulated::SimulatedBackend;
use crate::platform::desktop::blocking::run_background;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::usecase::ports::repo::{FleetRepository, RepoError};
use crate::usecase::services::fleet_service::{FleetService, Lookup, ServiceError};
use crate::usecase::services::import_service::{ImportError, ImportService};
use crate::usecase::table::entity_table::{ColumnDescriptor, EntityTable, TableState, TableView};
use crate::usecase::table::measurement_table::{MeasurementState, MeasurementTable, RowCollection};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("fleet-admin-{prefix}-{nanos}"))
}

fn seeded_service() -> FleetService {
    let repo = SqliteRepo::open(None, true).expect("in-memory db should open");
    repo.init().expect("schema and samples should load");
    FleetService::new(Arc::new(repo))
}

fn users_table() -> EntityTable<User> {
    EntityTable::new("user", |user: &User| user.name.clone())
        .column(ColumnDescriptor::new("name", "Name").sortable())
        .column(ColumnDescriptor::new("email", "Email").sortable())
        .column(ColumnDescriptor::new("role", "Role").sortable())
}

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

fn value_ids(rows: &[&User]) -> Vec<String> {
    rows.iter().map(|user| user.name.clone()).collect()
}

#[test]
fn search_finds_seeded_user_case_insensitively() {
    let service = seeded_service();
    let users = service.list_users().expect("users should load");
    let table = users_table();
    let mut state = TableState::default();

    table.set_search(&mut state, "ALI");

    let found = value_ids(&table.rows(&users, &state));
    assert_eq!(found, vec!["Alice Johnson".to_string()]);
}

#[test]
fn third_sort_click_restores_load_order() {
    let service = seeded_service();
    let users = service.list_users().expect("users should load");
    let table = users_table();
    let mut state = TableState::default();
    let original = value_ids(&table.rows(&users, &state));

    table.toggle_sort(&mut state, "name");
    table.toggle_sort(&mut state, "name");
    let descending = value_ids(&table.rows(&users, &state));
    let mut expected = original.clone();
    expected.sort();
    expected.reverse();
    assert_eq!(descending, expected);

    table.toggle_sort(&mut state, "name");
    assert_eq!(value_ids(&table.rows(&users, &state)), original);
}

#[test]
fn loading_table_ignores_interaction() {
    let table = users_table();
    let mut state = TableState::loading();

    assert!(!table.set_search(&mut state, "bob"));
    assert!(!table.toggle_sort(&mut state, "name"));
    assert!(matches!(table.view(&[], &state), TableView::Loading { .. }));
}

#[test]
fn confirmed_user_delete_reaches_backend_once() {
    let service = seeded_service();
    let users = service.list_users().expect("users should load");
    let target = users[0].id.clone();
    let table = users_table();
    let mut state = TableState::default();

    assert!(table.request_delete(&mut state, &target));
    let prompt = table.delete_prompt(&state).expect("prompt should be pending");
    assert_eq!(prompt.confirm_label, "Delete User");

    let mut deleted = Vec::new();
    table.confirm_delete(&mut state, |id| deleted.push(id.to_string()));
    assert!(!table.confirm_delete(&mut state, |id| deleted.push(id.to_string())));
    assert_eq!(deleted, vec![target.clone()]);

    service.delete_user(&deleted[0]).expect("delete should succeed");
    let remaining = service.list_users().expect("users should load");
    assert_eq!(remaining.len(), users.len() - 1);
    assert!(remaining.iter().all(|user| user.id != target));
}

#[test]
fn dismissed_delete_leaves_data_alone() {
    let service = seeded_service();
    let users = service.list_users().expect("users should load");
    let table = users_table();
    let mut state = TableState::default();

    table.request_delete(&mut state, &users[1].id);
    assert!(table.dismiss_delete(&mut state));
    assert!(table.delete_prompt(&state).is_none());
    assert_eq!(service.list_users().expect("users should load").len(), users.len());
}

#[test]
fn inline_edit_cancel_then_save_persists_once() {
    let service = seeded_service();
    let table = MeasurementTable::for_kind(MeasurementKind::Part);
    let mut state = MeasurementState::default();
    let mut rows = RowCollection::new(Some("1".to_string()), Vec::new());

    table.open_add(&mut state);
    table.set_add_value(&mut state, "value1", "3.5");
    assert!(table.submit_add(&mut state, &mut rows));
    let row = rows.rows()[0].clone();
    assert_eq!(row.value("value1"), 3.5);

    table.begin_edit(&mut state, &row);
    table.set_edit_value(&mut state, "value1", "99");
    assert!(table.cancel_edit(&mut state));
    assert_eq!(rows.rows()[0].value("value1"), 3.5);

    table.begin_edit(&mut state, &row);
    table.set_edit_value(&mut state, "value2", "7.25");
    assert!(table.save_edit(&mut state, &mut rows));
    assert!(!table.save_edit(&mut state, &mut rows));

    service
        .save_rows(MeasurementKind::Part, "1", rows.rows())
        .expect("rows should save");
    let stored = service
        .list_rows(MeasurementKind::Part, "1")
        .expect("rows should load");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].value("value1"), 3.5);
    assert_eq!(stored[0].value("value2"), 7.25);
}

#[test]
fn import_maps_export_headers_and_skips_bad_rows() {
    let table = MeasurementTable::for_kind(MeasurementKind::Part);
    let service = ImportService::default();
    let mut state = MeasurementState::default();
    let mut rows = RowCollection::new(Some("1".to_string()), Vec::new());
    let sheet = RawSheet::from_grid(
        "Sheet1",
        grid(&[
            &["Value 1", "value2", "V3", "Value 4", "Value 5", "Value 6", "Value 7"],
            &["12.5", "1", "2", "3", "4", "5", "6"],
            &["abc", "1", "2", "3", "4", "5", "6"],
            &["1", "1", "2", "3", "4", "5", ""],
        ]),
    );

    let imported = table
        .import_sheet(&mut state, &sheet, &service, &mut rows)
        .expect("two rows should import");

    assert_eq!(imported, 2);
    assert_eq!(rows.rows()[0].value("value1"), 12.5);
    assert_eq!(rows.rows()[0].value("value3"), 2.0);
    assert_eq!(rows.rows()[1].value("value1"), 0.0);
    assert!(state.error.is_none());
    assert_eq!(
        state.notice.as_deref(),
        Some("Imported 2 rows, skipped 1 invalid: Row 4: value7: Required")
    );
}

#[test]
fn import_with_no_valid_rows_changes_nothing() {
    let table = MeasurementTable::for_kind(MeasurementKind::Ship);
    let service = ImportService::default();
    let mut state = MeasurementState::default();
    let mut rows = RowCollection::new(Some("2".to_string()), Vec::new());
    let sheet = RawSheet::from_grid("Sheet1", grid(&[&["Value 1"]]));

    let result = table.import_sheet(&mut state, &sheet, &service, &mut rows);

    assert_eq!(result, Err(ImportError::EmptySheet));
    assert!(rows.is_empty());
    assert_eq!(
        state.error.as_deref(),
        Some("The spreadsheet appears to be empty")
    );
}

fn sample_rows(kind: MeasurementKind) -> Vec<MeasurementRow> {
    let mut table_rows = RowCollection::new(Some("1".to_string()), Vec::new());
    let table = MeasurementTable::for_kind(kind);
    let mut state = MeasurementState::default();
    for (first, second) in [(1.5, 2.0), (-3.25, 10.0)] {
        table.open_add(&mut state);
        table.set_add_value(&mut state, "value1", &first.to_string());
        table.set_add_value(&mut state, "value2", &second.to_string());
        table.submit_add(&mut state, &mut table_rows);
    }
    table_rows.rows().to_vec()
}

fn values_of(rows: &[MeasurementRow]) -> Vec<MeasurementValues> {
    rows.iter().map(|row| row.values.clone()).collect()
}

fn assert_round_trip(file_name: &str) {
    let dir = unique_test_dir("round-trip");
    fs::create_dir_all(&dir).expect("should create temp dir");
    let path = dir.join(file_name);
    let table = MeasurementTable::for_kind(MeasurementKind::Ship);
    let state = MeasurementState::default();
    let rows = sample_rows(MeasurementKind::Ship);

    let exported = table
        .export_file(&rows, &state, &path)
        .expect("export should succeed");
    assert_eq!(exported, 2);

    let mut import_state = MeasurementState::default();
    let mut reimported = RowCollection::new(Some("1".to_string()), Vec::new());
    table
        .import_file(&mut import_state, &path, &ImportService::default(), &mut reimported)
        .expect("import should succeed");

    assert_eq!(values_of(reimported.rows()), values_of(&rows));
    fs::remove_dir_all(&dir).expect("should cleanup temp dir");
}

#[test]
fn csv_export_reimports_identical_values() {
    assert_round_trip("ship-rows.csv");
}

#[test]
fn xlsx_export_reimports_identical_values() {
    assert_round_trip("ship-rows.xlsx");
}

#[test]
fn rows_persist_across_database_reopen() {
    let dir = unique_test_dir("persist");
    fs::create_dir_all(&dir).expect("should create temp dir");
    let db_path = dir.join("fleet.sqlite");
    let rows = sample_rows(MeasurementKind::Part);

    {
        let repo = SqliteRepo::open(Some(db_path.clone()), false).expect("db should open");
        repo.init().expect("schema should load");
        repo.replace_rows(MeasurementKind::Part, "1", &rows)
            .expect("rows should save");
    }

    let repo = SqliteRepo::open(Some(db_path), false).expect("db should reopen");
    repo.init().expect("schema should load");
    let stored = repo
        .list_rows(MeasurementKind::Part, "1")
        .expect("rows should load");
    assert_eq!(values_of(&stored), values_of(&rows));

    drop(repo);
    fs::remove_dir_all(&dir).expect("should cleanup temp dir");
}

#[test]
fn simulated_backend_rejects_writes_but_serves_reads() {
    let repo = SqliteRepo::open(None, true).expect("db should open");
    let backend = SimulatedBackend::new(repo, Duration::ZERO, 1.0, Some(1));
    backend.init().expect("schema should load");
    let service = FleetService::new(Arc::new(backend));
    let before = service.list_ships().expect("ships should load");

    let form = ShipForm {
        name: "Sea Breeze".to_string(),
        ship_type: "Ferry".to_string(),
        length: 120.0,
        width: 20.0,
        height: 15.0,
        ..ShipForm::default()
    };
    let err = service.create_ship(&form).expect_err("write should be rejected");

    assert_eq!(
        err,
        ServiceError::Repo(RepoError::Rejected(
            "Failed to create ship. Please try again.".to_string()
        ))
    );
    assert_eq!(service.list_ships().expect("ships should load"), before);
}

#[test]
fn missing_entities_are_reported_as_not_found() {
    let repo = SqliteRepo::open(None, true).expect("db should open");
    let backend = SimulatedBackend::new(repo, Duration::ZERO, 0.0, Some(1));
    backend.init().expect("schema should load");
    let service = FleetService::new(Arc::new(backend));

    assert_eq!(service.find_ship("404").expect("lookup should run"), Lookup::NotFound);
    assert_eq!(service.find_part("404").expect("lookup should run"), Lookup::NotFound);
    assert!(matches!(
        service.find_ship("1").expect("lookup should run"),
        Lookup::Found(_)
    ));
}

#[test]
fn part_created_through_service_lists_under_its_ship() {
    let service = seeded_service();
    let ship = service.list_ships().expect("ships should load")[0].clone();
    let form = PartForm {
        name: "Bow Thruster".to_string(),
        description: "Lateral thrust unit".to_string(),
        ship_id: ship.id.clone(),
    };

    let part = service.create_part(&form).expect("part should save");

    let parts = service.list_parts().expect("parts should load");
    assert!(parts
        .iter()
        .any(|listed| listed.id == part.id && listed.ship_id == ship.id));
}

fn rejecting_service() -> FleetService {
    let repo = SqliteRepo::open(None, true).expect("db should open");
    let backend = SimulatedBackend::new(repo, Duration::ZERO, 1.0, Some(3));
    backend.init().expect("schema should load");
    FleetService::new(Arc::new(backend))
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime should build")
        .block_on(future)
}

fn rejected_save() -> ServiceError {
    ServiceError::Repo(RepoError::Rejected(
        "Failed to save measurement rows. Please try again.".to_string(),
    ))
}

#[test]
fn rejected_save_keeps_typed_values() {
    let service = rejecting_service();
    let table = MeasurementTable::for_kind(MeasurementKind::Part);
    let rows = RowCollection::new(Some("1".to_string()), sample_rows(MeasurementKind::Part));
    let mut state = MeasurementState::default();

    table.begin_edit(&mut state, &rows.rows()[0]);
    table.set_edit_value(&mut state, "value1", "42");
    let edited = table.staged_edit(&state, &rows).expect("edit is open");
    let err = service
        .save_rows(MeasurementKind::Part, "1", edited.rows())
        .expect_err("save should be rejected");
    assert_eq!(err, rejected_save());
    assert!(state.edit.is_editing(&rows.rows()[0].id));
    assert_eq!(state.edit.buffer().and_then(|b| b.get("value1")), Some(&42.0));
    assert_eq!(rows.rows()[0].value("value1"), 1.5);

    table.cancel_edit(&mut state);
    table.open_add(&mut state);
    table.set_add_value(&mut state, "value4", "8.75");
    let added = table.staged_add(&state, &rows).expect("dialog is open");
    assert_eq!(added.len(), 3);
    service
        .save_rows(MeasurementKind::Part, "1", added.rows())
        .expect_err("save should be rejected");
    assert_eq!(state.add_form.as_ref().and_then(|v| v.get("value4")), Some(&8.75));
    assert_eq!(rows.len(), 2);
}

#[test]
fn imported_rows_that_fail_to_save_show_an_error() {
    let dir = unique_test_dir("import-save");
    fs::create_dir_all(&dir).expect("should create temp dir");
    let path = dir.join("part-rows.csv");
    let table = MeasurementTable::for_kind(MeasurementKind::Part);
    table
        .export_file(&sample_rows(MeasurementKind::Part), &MeasurementState::default(), &path)
        .expect("export should succeed");

    let mut state = MeasurementState::default();
    let mut scratch = state.clone();
    let mut next = RowCollection::new(Some("1".to_string()), Vec::new());
    table.begin_import(&mut state);
    table
        .import_file(&mut scratch, &path, &ImportService::default(), &mut next)
        .expect("import should succeed");
    assert_eq!(scratch.notice.as_deref(), Some("Imported 2 rows"));

    let service = rejecting_service();
    let to_save = next.rows().to_vec();
    let saved = block_on(run_background("save imported rows", move || {
        service.save_rows(MeasurementKind::Part, "1", &to_save)
    }));
    let err = saved.expect_err("save should be rejected");
    table.reject_import(&mut state, format!("Failed to save imported rows: {err}"));

    assert!(!state.importing);
    assert_eq!(state.notice, None);
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to save imported rows: Failed to save measurement rows. Please try again.")
    );
    fs::remove_dir_all(&dir).expect("should cleanup temp dir");
}

#[test]
fn corrupt_workbook_reports_read_error() {
    let dir = unique_test_dir("corrupt");
    fs::create_dir_all(&dir).expect("should create temp dir");
    let path = dir.join("broken.xlsx");
    let noise: Vec<u8> = (0u32..512).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
    fs::write(&path, noise).expect("should write fixture");

    let table = MeasurementTable::for_kind(MeasurementKind::Ship);
    let mut state = MeasurementState::default();
    let mut rows = RowCollection::new(Some("1".to_string()), sample_rows(MeasurementKind::Ship));
    let before = rows.clone();

    let result = table.import_file(&mut state, &path, &ImportService::default(), &mut rows);

    assert!(matches!(result, Err(ImportError::Read(_))));
    assert!(state
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("Failed to read spreadsheet:")));
    assert_eq!(state.notice, None);
    assert!(!state.importing);
    assert_eq!(rows, before);
    fs::remove_dir_all(&dir).expect("should cleanup temp dir");
}
