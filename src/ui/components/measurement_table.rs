use dioxus::prelude::*;
use rfd::FileDialog;

use crate::app::AppServices;
use crate::domain::entities::measurement::{MeasurementKind, MeasurementRow};
use crate::domain::format::format_fixed2;
use crate::platform::desktop::blocking::run_background;
use crate::ui::components::dialog;
use crate::ui::components::{
    BUTTON_STYLE, DANGER_BUTTON_STYLE, INPUT_STYLE, PRIMARY_BUTTON_STYLE, TABLE_STYLE, TD_STYLE,
    TH_STYLE,
};
use crate::ui::state::app_state::AppState;
use crate::usecase::services::fleet_service::{FleetService, ServiceError};
use crate::usecase::services::import_service::ImportError;
use crate::usecase::table::measurement_table::{MeasurementState, MeasurementTable, RowCollection};

/// Persists `next` and swaps it in once the save succeeds. On failure the
/// shown rows are left untouched.
async fn commit(
    fleet: FleetService,
    kind: MeasurementKind,
    parent_id: String,
    next: RowCollection,
    mut rows: Signal<RowCollection>,
    mut saving: Signal<bool>,
    mut status: Signal<String>,
) -> Result<(), ServiceError> {
    *saving.write() = true;
    let to_save = next.rows().to_vec();
    let result = run_background("save measurement rows", move || {
        fleet.save_rows(kind, &parent_id, &to_save)
    })
    .await;
    *saving.write() = false;

    match &result {
        Ok(()) => {
            *status.write() = format!("Saved {} rows", next.len());
            *rows.write() = next;
        }
        Err(err) => {
            *status.write() = format!("Failed to save rows: {err}");
            dialog::show_error("Error", &err.to_string());
        }
    }
    result
}

#[component]
pub fn MeasurementPanel(kind: MeasurementKind, parent_id: String) -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();
    let mut rows = use_signal(RowCollection::default);
    let mut state = use_signal(MeasurementState::default);
    let saving = use_signal(|| false);
    let mut status = app.status;

    let fleet_for_load = services.fleet.clone();
    let parent_for_load = parent_id.clone();
    use_effect(move || {
        let fleet = fleet_for_load.clone();
        let parent_id = parent_for_load.clone();
        spawn(async move {
            let worker_parent = parent_id.clone();
            let loaded = run_background("load measurement rows", move || {
                fleet.list_rows(kind, &worker_parent)
            })
            .await;
            match loaded {
                Ok(loaded) => *rows.write() = RowCollection::new(Some(parent_id), loaded),
                Err(err) => *status.write() = format!("Failed to load rows: {err}"),
            }
        });
    });

    let table = MeasurementTable::for_kind(kind);
    let sorted: Vec<MeasurementRow> = table
        .sorted_rows(rows.read().rows(), &state.read())
        .into_iter()
        .cloned()
        .collect();
    let summary = table.summary(rows.read().rows());
    let current = state();
    let is_saving = saving();
    let empty_span = (table.columns.len() + 3).to_string();
    let export_dir = services.settings.export_dir();

    let fleet_for_save = services.fleet.clone();
    let parent_for_save = parent_id.clone();
    let fleet_for_add = services.fleet.clone();
    let parent_for_add = parent_id.clone();
    let fleet_for_delete = services.fleet.clone();
    let parent_for_delete = parent_id.clone();
    let fleet_for_import = services.fleet.clone();
    let parent_for_import = parent_id.clone();
    let import_service = services.import.clone();

    let header_keys: Vec<(String, String)> = std::iter::once(("id".to_string(), "ID".to_string()))
        .chain(
            table
                .columns
                .iter()
                .map(|column| (column.key.clone(), column.label.clone())),
        )
        .chain(std::iter::once(("createdAt".to_string(), "Created".to_string())))
        .collect();

    let add_modal = current.add_form.clone().map(|values| {
        let columns = table.columns.clone();
        rsx! {
            div { style: "position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; align-items: center; justify-content: center;",
                div { style: "background: #fff; border-radius: 8px; padding: 16px; min-width: 360px;",
                    h3 { "Add Row" }
                    div { style: "display: grid; grid-template-columns: repeat(2, 1fr); gap: 8px;",
                        {columns.into_iter().map(|column| {
                            let value = values.get(&column.key).copied().unwrap_or(0.0);
                            let key = column.key.clone();
                            rsx! {
                                label { key: "{column.key}", style: "display: flex; flex-direction: column; gap: 2px;",
                                    "{column.label}"
                                    input {
                                        style: INPUT_STYLE,
                                        r#type: "number",
                                        step: "0.01",
                                        value: "{value}",
                                        oninput: move |event| {
                                            MeasurementTable::for_kind(kind).set_add_value(&mut state.write(), &key, &event.value());
                                        },
                                    }
                                }
                            }
                        })}
                    }
                    div { style: "display: flex; gap: 8px; justify-content: flex-end; margin-top: 12px;",
                        button {
                            style: BUTTON_STYLE,
                            onclick: move |_| MeasurementTable::for_kind(kind).close_add(&mut state.write()),
                            "Cancel"
                        }
                        button {
                            style: PRIMARY_BUTTON_STYLE,
                            disabled: is_saving,
                            onclick: move |_| {
                                let table = MeasurementTable::for_kind(kind);
                                let Some(next) = table.staged_add(&state.read(), &rows.read()) else {
                                    return;
                                };
                                let fleet = fleet_for_add.clone();
                                let parent_id = parent_for_add.clone();
                                spawn(async move {
                                    if commit(fleet, kind, parent_id, next, rows, saving, status).await.is_ok() {
                                        table.close_add(&mut state.write());
                                    }
                                });
                            },
                            if is_saving { "Saving..." } else { "Add Row" }
                        }
                    }
                }
            }
        }
    });

    rsx! {
        section { style: "margin-top: 24px; display: flex; flex-direction: column; gap: 12px;",
            div { style: "display: flex; justify-content: space-between; align-items: center;",
                div {
                    h2 { style: "margin: 0;", "{table.title}" }
                    p { style: "margin: 0; color: #6b7280;", "{table.description} · {summary}" }
                }
                div { style: "display: flex; gap: 8px;",
                    button {
                        style: BUTTON_STYLE,
                        disabled: current.importing || is_saving,
                        onclick: move |_| {
                            let Some(path) = FileDialog::new()
                                .add_filter("Spreadsheet", &["xlsx", "xls", "ods", "csv"])
                                .pick_file() else {
                                *status.write() = "Import cancelled".to_string();
                                return;
                            };
                            let table = MeasurementTable::for_kind(kind);
                            table.begin_import(&mut state.write());
                            let mut scratch = state.peek().clone();
                            let mut next = rows.peek().clone();
                            let service = import_service.clone();
                            let fleet = fleet_for_import.clone();
                            let parent_id = parent_for_import.clone();
                            spawn(async move {
                                let imported = run_background("import measurement rows", move || {
                                    MeasurementTable::for_kind(kind)
                                        .import_file(&mut scratch, &path, &service, &mut next)?;
                                    Ok::<_, ImportError>((scratch.notice.unwrap_or_default(), next))
                                })
                                .await;
                                let (notice, next) = match imported {
                                    Ok(imported) => imported,
                                    Err(err) => {
                                        table.reject_import(&mut state.write(), err.to_string());
                                        dialog::show_error("Import failed", &err.to_string());
                                        return;
                                    }
                                };
                                match commit(fleet, kind, parent_id, next, rows, saving, status).await {
                                    Ok(()) => {
                                        table.complete_import(&mut state.write(), notice.clone());
                                        dialog::show_info("Import complete", &notice);
                                    }
                                    Err(err) => {
                                        table.reject_import(&mut state.write(), format!("Failed to save imported rows: {err}"));
                                    }
                                }
                            });
                        },
                        if current.importing { "Importing..." } else { "Import" }
                    }
                    button {
                        style: BUTTON_STYLE,
                        onclick: move |_| {
                            let table = MeasurementTable::for_kind(kind);
                            let mut dialog_builder = FileDialog::new()
                                .set_file_name(table.export_filename.as_str())
                                .add_filter("Excel", &["xlsx"])
                                .add_filter("CSV", &["csv"]);
                            if let Some(dir) = export_dir.as_ref() {
                                dialog_builder = dialog_builder.set_directory(dir);
                            }
                            let Some(path) = dialog_builder.save_file() else {
                                return;
                            };
                            let snapshot = rows.peek().rows().to_vec();
                            let view = state.peek().clone();
                            spawn(async move {
                                let dest = path.clone();
                                let result = run_background("export measurement rows", move || {
                                    table.export_file(&snapshot, &view, &dest)
                                })
                                .await;
                                match result {
                                    Ok(count) => *status.write() = format!("Exported {count} rows to {}", path.display()),
                                    Err(err) => dialog::show_error("Export failed", &err.to_string()),
                                }
                            });
                        },
                        "Export"
                    }
                    button {
                        style: PRIMARY_BUTTON_STYLE,
                        disabled: is_saving,
                        onclick: move |_| MeasurementTable::for_kind(kind).open_add(&mut state.write()),
                        "Add Row"
                    }
                }
            }

            if let Some(error) = current.error.clone() {
                p { style: "color: #dc2626; white-space: pre-line;", "{error}" }
            }
            if let Some(notice) = current.notice.clone() {
                p { style: "color: #166534;", "{notice}" }
            }

            table { style: TABLE_STYLE,
                thead {
                    tr {
                        {header_keys.into_iter().map(|(key, label)| {
                            let arrow = current.sort.direction_for(&key).map(|direction| direction.arrow()).unwrap_or("");
                            let sort_key = key.clone();
                            rsx! {
                                th {
                                    key: "{key}",
                                    style: "{TH_STYLE} cursor: pointer;",
                                    onclick: move |_| {
                                        MeasurementTable::for_kind(kind).toggle_sort(&mut state.write(), &sort_key);
                                    },
                                    "{label} {arrow}"
                                }
                            }
                        })}
                        th { style: TH_STYLE, "Actions" }
                    }
                }
                tbody {
                    if sorted.is_empty() {
                        tr {
                            td { style: TD_STYLE, colspan: "{empty_span}", "No rows yet. Add one or import a spreadsheet." }
                        }
                    }
                    {sorted.into_iter().map(|row| {
                        let editing = current.edit.is_editing(&row.id);
                        let buffer = current.edit.buffer().cloned().unwrap_or_default();
                        let created = row.created_at.format("%Y-%m-%d %H:%M").to_string();
                        let row_for_edit = row.clone();
                        let delete_id = row.id.clone();
                        let fleet_for_save = fleet_for_save.clone();
                        let parent_for_save = parent_for_save.clone();
                        let fleet_for_delete = fleet_for_delete.clone();
                        let parent_for_delete = parent_for_delete.clone();
                        let columns = table.columns.clone();
                        rsx! {
                            tr { key: "{row.id}",
                                td { style: TD_STYLE, "{row.id}" }
                                {columns.into_iter().map(|column| {
                                    let key = column.key.clone();
                                    if editing {
                                        let value = buffer.get(&column.key).copied().unwrap_or(0.0);
                                        rsx! {
                                            td { key: "{column.key}", style: TD_STYLE,
                                                input {
                                                    style: "{INPUT_STYLE} width: 72px;",
                                                    r#type: "number",
                                                    step: "0.01",
                                                    value: "{value}",
                                                    oninput: move |event| {
                                                        MeasurementTable::for_kind(kind).set_edit_value(&mut state.write(), &key, &event.value());
                                                    },
                                                }
                                            }
                                        }
                                    } else {
                                        let text = format_fixed2(row.value(&column.key));
                                        rsx! { td { key: "{column.key}", style: TD_STYLE, "{text}" } }
                                    }
                                })}
                                td { style: TD_STYLE, "{created}" }
                                td { style: "{TD_STYLE} white-space: nowrap;",
                                    if editing {
                                        button {
                                            style: PRIMARY_BUTTON_STYLE,
                                            disabled: is_saving,
                                            onclick: move |_| {
                                                let table = MeasurementTable::for_kind(kind);
                                                let Some(next) = table.staged_edit(&state.read(), &rows.read()) else {
                                                    return;
                                                };
                                                let fleet = fleet_for_save.clone();
                                                let parent_id = parent_for_save.clone();
                                                spawn(async move {
                                                    if commit(fleet, kind, parent_id, next, rows, saving, status).await.is_ok() {
                                                        // Saved; the buffer is no longer needed.
                                                        table.cancel_edit(&mut state.write());
                                                    }
                                                });
                                            },
                                            if is_saving { "Saving..." } else { "Save" }
                                        }
                                        button {
                                            style: BUTTON_STYLE,
                                            disabled: is_saving,
                                            onclick: move |_| {
                                                MeasurementTable::for_kind(kind).cancel_edit(&mut state.write());
                                            },
                                            "Cancel"
                                        }
                                    } else {
                                        button {
                                            style: BUTTON_STYLE,
                                            disabled: is_saving,
                                            onclick: move |_| {
                                                MeasurementTable::for_kind(kind).begin_edit(&mut state.write(), &row_for_edit);
                                            },
                                            "Edit"
                                        }
                                        button {
                                            style: DANGER_BUTTON_STYLE,
                                            disabled: is_saving,
                                            onclick: move |_| {
                                                let table = MeasurementTable::for_kind(kind);
                                                table.request_delete(&mut state.write(), &delete_id);
                                                let confirmed = dialog::confirm(
                                                    "Are you sure?",
                                                    "This action cannot be undone. This will permanently delete the row.",
                                                );
                                                if !confirmed {
                                                    table.dismiss_delete(&mut state.write());
                                                    return;
                                                }
                                                let mut next = rows();
                                                if table.confirm_delete(&mut state.write(), &mut next) {
                                                    let fleet = fleet_for_delete.clone();
                                                    let parent_id = parent_for_delete.clone();
                                                    spawn(async move {
                                                        // Failure is reported by `commit`; the row stays.
                                                        let _ = commit(fleet, kind, parent_id, next, rows, saving, status).await;
                                                    });
                                                }
                                            },
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    })}
                }
            }

            {add_modal}
        }
    }
}
