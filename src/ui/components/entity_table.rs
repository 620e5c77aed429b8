use dioxus::prelude::*;

use crate::domain::entities::record::Record;
use crate::domain::entities::table::{BadgeTone, CellValue};
use crate::ui::components::dialog;
use crate::ui::components::{
    BUTTON_STYLE, DANGER_BUTTON_STYLE, INPUT_STYLE, TABLE_STYLE, TD_STYLE, TH_STYLE,
};
use crate::usecase::table::entity_table::{EntityTable, TableState, TableView};

fn badge_colors(tone: BadgeTone) -> (&'static str, &'static str) {
    match tone {
        BadgeTone::Neutral => ("#f1f5f9", "#334155"),
        BadgeTone::Positive => ("#dcfce7", "#166534"),
        BadgeTone::Warning => ("#fef9c3", "#854d0e"),
        BadgeTone::Negative => ("#fee2e2", "#991b1b"),
        BadgeTone::Accent => ("#dbeafe", "#1e40af"),
    }
}

pub fn cell_view(cell: &CellValue) -> Element {
    match cell {
        CellValue::Badge { label, tone } => {
            let (background, color) = badge_colors(*tone);
            rsx! {
                span {
                    style: "padding: 2px 8px; border-radius: 9999px; font-size: 12px; background: {background}; color: {color};",
                    "{label}"
                }
            }
        }
        other => {
            let text = other.display();
            rsx! { "{text}" }
        }
    }
}

fn edit_button(on_edit: Option<EventHandler<String>>, id: String) -> Option<Element> {
    let on_edit = on_edit?;
    Some(rsx! {
        button {
            style: "{BUTTON_STYLE} margin-right: 6px;",
            onclick: move |_| on_edit.call(id.clone()),
            "Edit"
        }
    })
}

/// Search box plus table (or cards when `compact`) for any record type.
/// `make_table` rebuilds the column configuration inside event handlers.
pub fn entity_table_view<T: Record + 'static>(
    make_table: fn() -> EntityTable<T>,
    data: &[T],
    mut state: Signal<TableState>,
    compact: bool,
    on_edit: Option<EventHandler<String>>,
    on_delete: EventHandler<String>,
) -> Element {
    let table = make_table();
    let view = table.view(data, &state.read());
    let search = state.read().search.clone();
    let loading = state.read().loading;
    let placeholder = table.placeholder().to_string();

    let request_delete = move |id: String| {
        let table = make_table();
        if !table.request_delete(&mut state.write(), &id) {
            return;
        }
        let prompt = table.delete_prompt(&state.read());
        let confirmed = prompt.as_ref().is_some_and(dialog::confirm_delete);
        if !confirmed {
            table.dismiss_delete(&mut state.write());
            return;
        }
        let mut staged = None;
        table.confirm_delete(&mut state.write(), |id| staged = Some(id.to_string()));
        if let Some(id) = staged {
            on_delete.call(id);
        }
    };

    let body = match view {
        TableView::Loading {
            headers,
            card_labels,
            skeleton_rows,
        } => {
            let bar = "display: block; height: 12px; border-radius: 4px; background: #e5e7eb;";
            if compact {
                rsx! {
                    for idx in 0..skeleton_rows {
                        div { key: "{idx}", style: "border: 1px solid #e5e7eb; border-radius: 6px; padding: 8px; margin-bottom: 8px;",
                            span { style: "{bar} width: 40%; margin-bottom: 8px;" }
                            for (label_idx, _) in card_labels.iter().enumerate() {
                                span { key: "{label_idx}", style: "{bar} width: 70%; margin-bottom: 4px;" }
                            }
                        }
                    }
                }
            } else {
                rsx! {
                    table { style: TABLE_STYLE,
                        thead {
                            tr {
                                for header in headers.iter() {
                                    th { style: TH_STYLE, "{header}" }
                                }
                                th { style: TH_STYLE, "Actions" }
                            }
                        }
                        tbody {
                            for idx in 0..skeleton_rows {
                                tr { key: "{idx}",
                                    for (col_idx, _) in headers.iter().enumerate() {
                                        td { key: "{col_idx}", style: TD_STYLE, span { style: "{bar}" } }
                                    }
                                    td { style: TD_STYLE, span { style: "{bar} width: 60px;" } }
                                }
                            }
                        }
                    }
                }
            }
        }
        TableView::Empty { message } => rsx! {
            p { style: "padding: 24px; text-align: center; color: #6b7280;", "{message}" }
        },
        TableView::Rows { rows, .. } if compact => rsx! {
            {rows.into_iter().map(|row| {
                let edit = edit_button(on_edit, row.id.clone());
                let delete_id = row.id.clone();
                let mut request_delete = request_delete;
                rsx! {
                    div { key: "{row.id}", style: "border: 1px solid #e5e7eb; border-radius: 6px; padding: 8px; margin-bottom: 8px;",
                        strong { "{row.name}" }
                        for (label, value) in row.card.iter() {
                            div { key: "{label}", style: "display: flex; justify-content: space-between; font-size: 13px;",
                                span { style: "color: #6b7280;", "{label}" }
                                span { {cell_view(value)} }
                            }
                        }
                        div { style: "display: flex; gap: 6px; margin-top: 6px;",
                            {edit}
                            button { style: DANGER_BUTTON_STYLE, onclick: move |_| request_delete(delete_id.clone()), "Delete" }
                        }
                    }
                }
            })}
        },
        TableView::Rows { headers, rows } => rsx! {
            table { style: TABLE_STYLE,
                thead {
                    tr {
                        {headers.into_iter().map(|header| {
                            let mut state = state;
                            let key = header.key.clone();
                            let arrow = header.direction.map(|direction| direction.arrow()).unwrap_or("");
                            let cursor = if header.sortable { "cursor: pointer;" } else { "" };
                            rsx! {
                                th {
                                    key: "{header.key}",
                                    style: "{TH_STYLE} {cursor}",
                                    onclick: move |_| {
                                        make_table().toggle_sort(&mut state.write(), &key);
                                    },
                                    "{header.label} {arrow}"
                                }
                            }
                        })}
                        th { style: TH_STYLE, "Actions" }
                    }
                }
                tbody {
                    {rows.into_iter().map(|row| {
                        let edit = edit_button(on_edit, row.id.clone());
                        let delete_id = row.id.clone();
                        let mut request_delete = request_delete;
                        rsx! {
                            tr { key: "{row.id}",
                                for (idx, cell) in row.cells.iter().enumerate() {
                                    td { key: "{idx}", style: TD_STYLE, {cell_view(cell)} }
                                }
                                td { style: "{TD_STYLE} white-space: nowrap;",
                                    {edit}
                                    button {
                                        style: DANGER_BUTTON_STYLE,
                                        title: "Delete {row.name}",
                                        onclick: move |_| request_delete(delete_id.clone()),
                                        "Delete"
                                    }
                                }
                            }
                        }
                    })}
                }
            }
        },
    };

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 12px;",
            input {
                style: "{INPUT_STYLE} max-width: 320px;",
                disabled: loading,
                value: "{search}",
                placeholder: "{placeholder}",
                oninput: move |event| {
                    make_table().set_search(&mut state.write(), event.value());
                },
            }
            {body}
        }
    }
}
