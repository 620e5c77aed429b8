use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::domain::entities::fleet::{Ship, ShipStatus, UserStatus};
use crate::domain::format::{format_f64, parse_float_lenient};
use crate::domain::forms::{
    FormMode, PartForm, ShipForm, UserForm, DESCRIPTION_MAX_CHARS, USER_DEPARTMENTS, USER_ROLES,
};
use crate::domain::schema::FieldIssue;
use crate::ui::components::{BUTTON_STYLE, INPUT_STYLE, PRIMARY_BUTTON_STYLE};

const FIELD_STYLE: &str = "display: flex; flex-direction: column; gap: 4px; margin-bottom: 10px;";
const ERROR_STYLE: &str = "color: #dc2626; font-size: 12px;";

fn issue_text(issues: &[FieldIssue], field: &str) -> Option<String> {
    let messages: Vec<&str> = issues
        .iter()
        .filter(|issue| issue.field == field)
        .map(|issue| issue.message.as_str())
        .collect();
    (!messages.is_empty()).then(|| messages.join(", "))
}

fn field_error(issues: &[FieldIssue], field: &str) -> Element {
    match issue_text(issues, field) {
        Some(text) => rsx! { span { style: ERROR_STYLE, "{text}" } },
        None => rsx! {},
    }
}

#[component]
fn FormActions(
    submit_label: String,
    submitting: bool,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { style: "display: flex; gap: 8px; justify-content: flex-end;",
            button {
                style: BUTTON_STYLE,
                disabled: submitting,
                onclick: move |_| on_cancel.call(()),
                "Cancel"
            }
            button {
                style: PRIMARY_BUTTON_STYLE,
                disabled: submitting,
                onclick: move |_| on_submit.call(()),
                if submitting { "Saving..." } else { "{submit_label}" }
            }
        }
    }
}

#[component]
pub fn ShipFormView(
    form: Signal<ShipForm>,
    mode: FormMode,
    issues: Vec<FieldIssue>,
    submitting: bool,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut form = form;
    let current = form();
    let length_text = format_f64(current.length);
    let width_text = format_f64(current.width);
    let height_text = format_f64(current.height);
    let year_text = current.year_built_text();
    let status_value = current.status.map(ShipStatus::as_str).unwrap_or("");
    let description_len = current.description.chars().count();
    let submit_label = match mode {
        FormMode::Create => "Create Ship",
        FormMode::Edit => "Update Ship",
    };

    rsx! {
        div { style: "max-width: 560px;",
            div { style: FIELD_STYLE,
                label { "Ship name" }
                input {
                    style: INPUT_STYLE,
                    value: "{current.name}",
                    placeholder: "Enter ship name",
                    oninput: move |event| form.write().name = event.value(),
                }
                {field_error(&issues, "name")}
            }
            div { style: FIELD_STYLE,
                label { "Ship type" }
                input {
                    style: INPUT_STYLE,
                    value: "{current.ship_type}",
                    placeholder: "e.g. Container Ship",
                    oninput: move |event| form.write().ship_type = event.value(),
                }
                {field_error(&issues, "type")}
            }
            div { style: "display: flex; gap: 12px;",
                div { style: FIELD_STYLE,
                    label { "Length (m)" }
                    input {
                        style: INPUT_STYLE,
                        r#type: "number",
                        value: "{length_text}",
                        oninput: move |event| form.write().length = parse_float_lenient(&event.value()),
                    }
                    {field_error(&issues, "length")}
                }
                div { style: FIELD_STYLE,
                    label { "Width (m)" }
                    input {
                        style: INPUT_STYLE,
                        r#type: "number",
                        value: "{width_text}",
                        oninput: move |event| form.write().width = parse_float_lenient(&event.value()),
                    }
                    {field_error(&issues, "width")}
                }
                div { style: FIELD_STYLE,
                    label { "Height (m)" }
                    input {
                        style: INPUT_STYLE,
                        r#type: "number",
                        value: "{height_text}",
                        oninput: move |event| form.write().height = parse_float_lenient(&event.value()),
                    }
                    {field_error(&issues, "height")}
                }
            }
            div { style: FIELD_STYLE,
                label { "Year built" }
                input {
                    style: INPUT_STYLE,
                    value: "{year_text}",
                    oninput: move |event| form.write().set_year_built_text(&event.value()),
                }
                {field_error(&issues, "yearBuilt")}
            }
            if mode == FormMode::Edit {
                div { style: FIELD_STYLE,
                    label { "Status" }
                    select {
                        style: INPUT_STYLE,
                        value: "{status_value}",
                        onchange: move |event| form.write().status = event.value().parse::<ShipStatus>().ok(),
                        option { value: "", "Select status" }
                        for status in ShipStatus::ALL {
                            option { value: status.as_str(), {status.label()} }
                        }
                    }
                    {field_error(&issues, "status")}
                }
            }
            div { style: FIELD_STYLE,
                label { "Description" }
                textarea {
                    style: "{INPUT_STYLE} min-height: 80px;",
                    value: "{current.description}",
                    oninput: move |event| form.write().description = event.value(),
                }
                span { style: "font-size: 12px; color: #6b7280;", "{description_len}/{DESCRIPTION_MAX_CHARS}" }
                {field_error(&issues, "description")}
            }
            FormActions {
                submit_label: submit_label.to_string(),
                submitting,
                on_submit,
                on_cancel,
            }
        }
    }
}

#[component]
pub fn PartFormView(
    form: Signal<PartForm>,
    ships: Vec<Ship>,
    mode: FormMode,
    issues: Vec<FieldIssue>,
    submitting: bool,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut form = form;
    let current = form();
    let submit_label = match mode {
        FormMode::Create => "Create Part",
        FormMode::Edit => "Update Part",
    };

    rsx! {
        div { style: "max-width: 560px;",
            div { style: FIELD_STYLE,
                label { "Part name" }
                input {
                    style: INPUT_STYLE,
                    value: "{current.name}",
                    placeholder: "Enter part name",
                    oninput: move |event| form.write().name = event.value(),
                }
                {field_error(&issues, "name")}
            }
            div { style: FIELD_STYLE,
                label { "Ship" }
                select {
                    style: INPUT_STYLE,
                    value: "{current.ship_id}",
                    onchange: move |event| form.write().ship_id = event.value(),
                    option { value: "", "Select a ship" }
                    for ship in ships.iter() {
                        option { key: "{ship.id}", value: "{ship.id}", "{ship.name}" }
                    }
                }
                {field_error(&issues, "shipId")}
            }
            div { style: FIELD_STYLE,
                label { "Description" }
                textarea {
                    style: "{INPUT_STYLE} min-height: 80px;",
                    value: "{current.description}",
                    oninput: move |event| form.write().description = event.value(),
                }
                {field_error(&issues, "description")}
            }
            FormActions {
                submit_label: submit_label.to_string(),
                submitting,
                on_submit,
                on_cancel,
            }
        }
    }
}

#[component]
pub fn UserFormView(
    form: Signal<UserForm>,
    issues: Vec<FieldIssue>,
    submitting: bool,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut form = form;
    let current = form();
    let join_date = current.join_date.format("%Y-%m-%d").to_string();

    rsx! {
        div { style: "max-width: 560px;",
            div { style: FIELD_STYLE,
                label { "Name" }
                input {
                    style: INPUT_STYLE,
                    value: "{current.name}",
                    oninput: move |event| form.write().name = event.value(),
                }
                {field_error(&issues, "name")}
            }
            div { style: FIELD_STYLE,
                label { "Email" }
                input {
                    style: INPUT_STYLE,
                    r#type: "email",
                    value: "{current.email}",
                    oninput: move |event| form.write().email = event.value(),
                }
                {field_error(&issues, "email")}
            }
            div { style: "display: flex; gap: 12px;",
                div { style: FIELD_STYLE,
                    label { "Role" }
                    select {
                        style: INPUT_STYLE,
                        value: "{current.role}",
                        onchange: move |event| form.write().role = event.value(),
                        option { value: "", "Select role" }
                        for role in USER_ROLES {
                            option { value: "{role}", "{role}" }
                        }
                    }
                    {field_error(&issues, "role")}
                }
                div { style: FIELD_STYLE,
                    label { "Department" }
                    select {
                        style: INPUT_STYLE,
                        value: "{current.department}",
                        onchange: move |event| form.write().department = event.value(),
                        option { value: "", "Select department" }
                        for department in USER_DEPARTMENTS {
                            option { value: "{department}", "{department}" }
                        }
                    }
                    {field_error(&issues, "department")}
                }
                div { style: FIELD_STYLE,
                    label { "Status" }
                    select {
                        style: INPUT_STYLE,
                        value: current.status.as_str(),
                        onchange: move |event| form.write().status = UserStatus::normalize(&event.value()),
                        option { value: "active", "active" }
                        option { value: "inactive", "inactive" }
                    }
                }
            }
            div { style: FIELD_STYLE,
                label { "Join date" }
                input {
                    style: INPUT_STYLE,
                    r#type: "date",
                    value: "{join_date}",
                    oninput: move |event| {
                        if let Ok(date) = NaiveDate::parse_from_str(&event.value(), "%Y-%m-%d") {
                            form.write().join_date = date;
                        }
                    },
                }
            }
            FormActions {
                submit_label: "Create User".to_string(),
                submitting,
                on_submit,
                on_cancel,
            }
        }
    }
}
