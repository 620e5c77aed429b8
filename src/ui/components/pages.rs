use dioxus::prelude::*;
use rfd::FileDialog;

use crate::app::AppServices;
use crate::domain::entities::fleet::{Part, Ship, ShipStatus, User, UserStatus};
use crate::domain::entities::measurement::MeasurementKind;
use crate::domain::entities::record::{FieldValue, Record};
use crate::domain::entities::table::{BadgeTone, CellValue};
use crate::domain::format::format_f64;
use crate::domain::forms::{FormMode, PartForm, ShipForm, UserForm};
use crate::domain::schema::FieldIssue;
use crate::platform::desktop::blocking::run_background;
use crate::ui::components::dialog;
use crate::ui::components::entity_table::entity_table_view;
use crate::ui::components::forms::{PartFormView, ShipFormView, UserFormView};
use crate::ui::components::measurement_table::MeasurementPanel;
use crate::ui::components::{BUTTON_STYLE, PRIMARY_BUTTON_STYLE};
use crate::ui::state::app_state::{AppState, Page};
use crate::usecase::services::fleet_service::{FleetService, Lookup, ServiceError};
use crate::usecase::table::entity_table::{ColumnDescriptor, EntityTable, TableState};

const PAGE_HEADER_STYLE: &str =
    "display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px;";

fn ship_status_tone(status: ShipStatus) -> BadgeTone {
    match status {
        ShipStatus::Active => BadgeTone::Positive,
        ShipStatus::Retired => BadgeTone::Neutral,
        ShipStatus::UnderRepair => BadgeTone::Warning,
    }
}

fn user_status_tone(status: UserStatus) -> BadgeTone {
    match status {
        UserStatus::Active => BadgeTone::Positive,
        UserStatus::Inactive => BadgeTone::Negative,
    }
}

fn ship_table() -> EntityTable<Ship> {
    EntityTable::new("ship", |ship: &Ship| ship.name.clone())
        .column(ColumnDescriptor::new("name", "Name").sortable())
        .column(ColumnDescriptor::new("type", "Type").sortable())
        .column(
            ColumnDescriptor::new("dimensions", "Dimensions (L×W×H)")
                .render(|ship: &Ship| {
                    CellValue::text(format!(
                        "{} × {} × {} m",
                        format_f64(ship.length),
                        format_f64(ship.width),
                        format_f64(ship.height)
                    ))
                })
                .not_searchable(),
        )
        .column(ColumnDescriptor::new("length", "Length (m)").sortable().not_searchable())
        .column(ColumnDescriptor::new("yearBuilt", "Year Built").sortable())
        .column(
            ColumnDescriptor::new("status", "Status")
                .sortable()
                .render(|ship: &Ship| CellValue::badge(ship.status.label(), ship_status_tone(ship.status)))
                .search_text(|ship: &Ship| ship.status.label().to_string()),
        )
        .mobile_field("Type", |ship: &Ship| CellValue::text(ship.ship_type.as_str()))
        .mobile_field("Status", |ship: &Ship| {
            CellValue::badge(ship.status.label(), ship_status_tone(ship.status))
        })
        .empty_message("No ships found.")
        .search_placeholder("Search ships...")
}

/// A part as listed, with the name of the ship it belongs to.
#[derive(Debug, Clone, PartialEq)]
struct PartListing {
    part: Part,
    ship_name: String,
}

impl Record for PartListing {
    fn id(&self) -> &str {
        &self.part.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "shipName" => Some(FieldValue::Text(self.ship_name.clone())),
            _ => self.part.field(key),
        }
    }
}

fn part_listings(parts: Vec<Part>, ships: &[Ship]) -> Vec<PartListing> {
    parts
        .into_iter()
        .map(|part| {
            let ship_name = ships
                .iter()
                .find(|ship| ship.id == part.ship_id)
                .map(|ship| ship.name.clone())
                .unwrap_or_else(|| format!("Ship #{}", part.ship_id));
            PartListing { part, ship_name }
        })
        .collect()
}

fn part_table() -> EntityTable<PartListing> {
    EntityTable::new("part", |listing: &PartListing| listing.part.name.clone())
        .column(ColumnDescriptor::new("name", "Name").sortable())
        .column(ColumnDescriptor::new("description", "Description"))
        .column(ColumnDescriptor::new("shipName", "Ship").sortable())
        .column(
            ColumnDescriptor::new("createdAt", "Created")
                .sortable()
                .render(|listing: &PartListing| match listing.part.created_at {
                    Some(created_at) => CellValue::text(created_at.format("%Y-%m-%d").to_string()),
                    None => CellValue::Empty,
                })
                .not_searchable(),
        )
        .mobile_field("Ship", |listing: &PartListing| CellValue::text(listing.ship_name.as_str()))
        .empty_message("No parts found.")
        .search_placeholder("Search parts...")
}

fn user_table() -> EntityTable<User> {
    EntityTable::new("user", |user: &User| user.name.clone())
        .column(ColumnDescriptor::new("name", "Name").sortable())
        .column(ColumnDescriptor::new("email", "Email").sortable())
        .column(
            ColumnDescriptor::new("role", "Role")
                .sortable()
                .render(|user: &User| CellValue::badge(user.role.as_str(), BadgeTone::Accent))
                .search_text(|user: &User| user.role.clone()),
        )
        .column(ColumnDescriptor::new("department", "Department").sortable())
        .column(
            ColumnDescriptor::new("status", "Status")
                .sortable()
                .render(|user: &User| CellValue::badge(user.status.as_str(), user_status_tone(user.status)))
                .search_text(|user: &User| user.status.as_str().to_string()),
        )
        .column(ColumnDescriptor::new("joinDate", "Join Date").sortable().not_searchable())
        .mobile_field("Email", |user: &User| CellValue::text(user.email.as_str()))
        .mobile_field("Role", |user: &User| CellValue::badge(user.role.as_str(), BadgeTone::Accent))
        .mobile_field("Status", |user: &User| {
            CellValue::badge(user.status.as_str(), user_status_tone(user.status))
        })
        .empty_message("No users found.")
        .search_placeholder("Search users...")
}

/// Loads a list into `target`, flagging the table as loading until the
/// worker finishes.
async fn reload<T, F>(
    label: &'static str,
    load: F,
    mut target: Signal<Vec<T>>,
    mut table_state: Signal<TableState>,
    mut status: Signal<String>,
) where
    T: Send + 'static,
    F: FnOnce() -> Result<Vec<T>, ServiceError> + Send + 'static,
{
    table_state.write().loading = true;
    match run_background(label, load).await {
        Ok(items) => *target.write() = items,
        Err(err) => *status.write() = format!("Failed to load {label}: {err}"),
    }
    table_state.write().loading = false;
}

async fn reload_parts(
    fleet: FleetService,
    ships: Signal<Vec<Ship>>,
    listings: Signal<Vec<PartListing>>,
    table_state: Signal<TableState>,
    status: Signal<String>,
) {
    let known_ships = ships.peek().clone();
    reload(
        "parts",
        move || Ok(part_listings(fleet.list_parts()?, &known_ships)),
        listings,
        table_state,
        status,
    )
    .await;
}

/// Reports a failed create/update/delete. Validation issues go next to the
/// form fields instead of a dialog.
fn report_failure(
    action: &str,
    err: ServiceError,
    mut issues: Signal<Vec<FieldIssue>>,
    mut status: Signal<String>,
) {
    match err {
        ServiceError::Invalid(found) => *issues.write() = found,
        err => {
            *status.write() = format!("Failed to {action}: {err}");
            dialog::show_error("Error", &err.to_string());
        }
    }
}

#[component]
pub fn NotFoundView(title: String, message: String, on_back: EventHandler<()>) -> Element {
    rsx! {
        div { style: "padding: 48px; text-align: center;",
            h2 { "{title}" }
            p { style: "color: #6b7280;", "{message}" }
            button { style: BUTTON_STYLE, onclick: move |_| on_back.call(()), "Back" }
        }
    }
}

#[component]
pub fn ShipsPage() -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();
    let mut page = app.page;
    let mut busy = app.busy;
    let mut status = app.status;
    let ships = use_signal(Vec::<Ship>::new);
    let table_state = use_signal(TableState::loading);
    let mut form = use_signal(ShipForm::default);
    let mut issues = use_signal(Vec::<FieldIssue>::new);
    let mut show_form = use_signal(|| false);

    let fleet_for_load = services.fleet.clone();
    use_effect(move || {
        let fleet = fleet_for_load.clone();
        spawn(reload("ships", move || fleet.list_ships(), ships, table_state, status));
    });

    let fleet_for_delete = services.fleet.clone();
    let on_delete = EventHandler::new(move |id: String| {
        let fleet = fleet_for_delete.clone();
        *busy.write() = true;
        spawn(async move {
            let worker = fleet.clone();
            match run_background("delete ship", move || worker.delete_ship(&id)).await {
                Ok(()) => {
                    *status.write() = "Ship deleted successfully".to_string();
                    reload("ships", move || fleet.list_ships(), ships, table_state, status).await;
                }
                Err(err) => report_failure("delete ship", err, issues, status),
            }
            *busy.write() = false;
        });
    });
    let on_edit = EventHandler::new(move |id: String| {
        *page.write() = Page::ShipEdit(id);
    });

    let fleet_for_create = services.fleet.clone();
    let on_submit = EventHandler::new(move |_: ()| {
        let current = form();
        if let Err(found) = current.validate(FormMode::Create) {
            *issues.write() = found;
            return;
        }
        issues.write().clear();
        let fleet = fleet_for_create.clone();
        *busy.write() = true;
        spawn(async move {
            let worker = fleet.clone();
            match run_background("create ship", move || worker.create_ship(&current)).await {
                Ok(ship) => {
                    dialog::show_info("Success", &format!("Ship \"{}\" created successfully", ship.name));
                    *form.write() = ShipForm::default();
                    *show_form.write() = false;
                    reload("ships", move || fleet.list_ships(), ships, table_state, status).await;
                }
                Err(err) => report_failure("create ship", err, issues, status),
            }
            *busy.write() = false;
        });
    });

    let list = entity_table_view(
        ship_table,
        &ships.read(),
        table_state,
        app.is_compact(),
        Some(on_edit),
        on_delete,
    );

    rsx! {
        div {
            div { style: PAGE_HEADER_STYLE,
                div {
                    h1 { style: "margin: 0;", "Ships" }
                    p { style: "margin: 0; color: #6b7280;", "Manage your fleet" }
                }
                button {
                    style: PRIMARY_BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        let open = !show_form();
                        *show_form.write() = open;
                    },
                    if show_form() { "Close" } else { "Add Ship" }
                }
            }
            if show_form() {
                ShipFormView {
                    form,
                    mode: FormMode::Create,
                    issues: issues(),
                    submitting: busy(),
                    on_submit,
                    on_cancel: move |_| {
                        *show_form.write() = false;
                        issues.write().clear();
                    },
                }
            }
            {list}
        }
    }
}

#[component]
pub fn ShipEditPage(id: String) -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();
    let mut page = app.page;
    let mut busy = app.busy;
    let mut status = app.status;
    let mut lookup = use_signal(|| None::<Lookup<Ship>>);
    let mut form = use_signal(ShipForm::default);
    let mut issues = use_signal(Vec::<FieldIssue>::new);

    let fleet_for_load = services.fleet.clone();
    let id_for_load = id.clone();
    use_effect(move || {
        let fleet = fleet_for_load.clone();
        let id = id_for_load.clone();
        spawn(async move {
            match run_background("load ship", move || fleet.find_ship(&id)).await {
                Ok(found) => {
                    if let Lookup::Found(ship) = &found {
                        *form.write() = ShipForm::from_ship(ship);
                    }
                    *lookup.write() = Some(found);
                }
                Err(err) => {
                    *status.write() = format!("Failed to load ship: {err}");
                    *lookup.write() = Some(Lookup::NotFound);
                }
            }
        });
    });

    let fleet_for_update = services.fleet.clone();
    let id_for_update = id.clone();
    let on_submit = EventHandler::new(move |_: ()| {
        let current = form();
        if let Err(found) = current.validate(FormMode::Edit) {
            *issues.write() = found;
            return;
        }
        issues.write().clear();
        let fleet = fleet_for_update.clone();
        let id = id_for_update.clone();
        *busy.write() = true;
        spawn(async move {
            match run_background("update ship", move || fleet.update_ship(&id, &current)).await {
                Ok(ship) => {
                    dialog::show_info("Success", &format!("Ship \"{}\" updated successfully", ship.name));
                    *lookup.write() = Some(Lookup::Found(ship));
                }
                Err(err) => report_failure("update ship", err, issues, status),
            }
            *busy.write() = false;
        });
    });

    match lookup() {
        None => rsx! { p { style: "padding: 24px; color: #6b7280;", "Loading ship..." } },
        Some(Lookup::NotFound) => rsx! {
            NotFoundView {
                title: "Ship not found".to_string(),
                message: format!("No ship with id {id} exists."),
                on_back: move |_| *page.write() = Page::Ships,
            }
        },
        Some(Lookup::Found(ship)) => rsx! {
            div {
                div { style: PAGE_HEADER_STYLE,
                    h1 { style: "margin: 0;", "Edit Ship: {ship.name}" }
                    button { style: BUTTON_STYLE, onclick: move |_| *page.write() = Page::Ships, "Back" }
                }
                ShipFormView {
                    form,
                    mode: FormMode::Edit,
                    issues: issues(),
                    submitting: busy(),
                    on_submit,
                    on_cancel: move |_| *page.write() = Page::Ships,
                }
                MeasurementPanel { kind: MeasurementKind::Ship, parent_id: ship.id.clone() }
            }
        },
    }
}

#[component]
pub fn PartsPage() -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();
    let mut page = app.page;
    let mut busy = app.busy;
    let mut status = app.status;
    let mut ships = use_signal(Vec::<Ship>::new);
    let listings = use_signal(Vec::<PartListing>::new);
    let table_state = use_signal(TableState::loading);
    let mut form = use_signal(PartForm::default);
    let mut issues = use_signal(Vec::<FieldIssue>::new);
    let mut show_form = use_signal(|| false);

    let fleet_for_load = services.fleet.clone();
    use_effect(move || {
        let fleet = fleet_for_load.clone();
        spawn(async move {
            let worker = fleet.clone();
            match run_background("load ships", move || worker.list_ships()).await {
                Ok(loaded) => *ships.write() = loaded,
                Err(err) => *status.write() = format!("Failed to load ships: {err}"),
            }
            reload_parts(fleet, ships, listings, table_state, status).await;
        });
    });

    let fleet_for_delete = services.fleet.clone();
    let on_delete = EventHandler::new(move |id: String| {
        let fleet = fleet_for_delete.clone();
        *busy.write() = true;
        spawn(async move {
            let worker = fleet.clone();
            match run_background("delete part", move || worker.delete_part(&id)).await {
                Ok(()) => {
                    *status.write() = "Part deleted successfully".to_string();
                    reload_parts(fleet, ships, listings, table_state, status).await;
                }
                Err(err) => report_failure("delete part", err, issues, status),
            }
            *busy.write() = false;
        });
    });
    let on_edit = EventHandler::new(move |id: String| {
        *page.write() = Page::PartEdit(id);
    });

    let fleet_for_create = services.fleet.clone();
    let on_submit = EventHandler::new(move |_: ()| {
        let current = form();
        if let Err(found) = current.validate() {
            *issues.write() = found;
            return;
        }
        issues.write().clear();
        let fleet = fleet_for_create.clone();
        *busy.write() = true;
        spawn(async move {
            let worker = fleet.clone();
            match run_background("create part", move || worker.create_part(&current)).await {
                Ok(part) => {
                    dialog::show_info("Success", &format!("Part \"{}\" created successfully", part.name));
                    *form.write() = PartForm::default();
                    *show_form.write() = false;
                    reload_parts(fleet, ships, listings, table_state, status).await;
                }
                Err(err) => report_failure("create part", err, issues, status),
            }
            *busy.write() = false;
        });
    });

    let list = entity_table_view(
        part_table,
        &listings.read(),
        table_state,
        app.is_compact(),
        Some(on_edit),
        on_delete,
    );

    rsx! {
        div {
            div { style: PAGE_HEADER_STYLE,
                div {
                    h1 { style: "margin: 0;", "Parts" }
                    p { style: "margin: 0; color: #6b7280;", "Manage ship parts and components" }
                }
                button {
                    style: PRIMARY_BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        let open = !show_form();
                        *show_form.write() = open;
                    },
                    if show_form() { "Close" } else { "Add Part" }
                }
            }
            if show_form() {
                PartFormView {
                    form,
                    ships: ships(),
                    mode: FormMode::Create,
                    issues: issues(),
                    submitting: busy(),
                    on_submit,
                    on_cancel: move |_| {
                        *show_form.write() = false;
                        issues.write().clear();
                    },
                }
            }
            {list}
        }
    }
}

#[component]
pub fn PartEditPage(id: String) -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();
    let mut page = app.page;
    let mut busy = app.busy;
    let mut status = app.status;
    let mut lookup = use_signal(|| None::<Lookup<Part>>);
    let mut ships = use_signal(Vec::<Ship>::new);
    let mut form = use_signal(PartForm::default);
    let mut issues = use_signal(Vec::<FieldIssue>::new);

    let fleet_for_load = services.fleet.clone();
    let id_for_load = id.clone();
    use_effect(move || {
        let fleet = fleet_for_load.clone();
        let id = id_for_load.clone();
        spawn(async move {
            let loaded = run_background("load part", move || {
                let ships = fleet.list_ships()?;
                let part = fleet.find_part(&id)?;
                Ok::<_, ServiceError>((ships, part))
            })
            .await;
            match loaded {
                Ok((loaded_ships, found)) => {
                    if let Lookup::Found(part) = &found {
                        *form.write() = PartForm::from_part(part);
                    }
                    *ships.write() = loaded_ships;
                    *lookup.write() = Some(found);
                }
                Err(err) => {
                    *status.write() = format!("Failed to load part: {err}");
                    *lookup.write() = Some(Lookup::NotFound);
                }
            }
        });
    });

    let fleet_for_update = services.fleet.clone();
    let id_for_update = id.clone();
    let on_submit = EventHandler::new(move |_: ()| {
        let current = form();
        if let Err(found) = current.validate() {
            *issues.write() = found;
            return;
        }
        issues.write().clear();
        let fleet = fleet_for_update.clone();
        let id = id_for_update.clone();
        *busy.write() = true;
        spawn(async move {
            match run_background("update part", move || fleet.update_part(&id, &current)).await {
                Ok(part) => {
                    dialog::show_info("Success", &format!("Part \"{}\" updated successfully", part.name));
                    *lookup.write() = Some(Lookup::Found(part));
                }
                Err(err) => report_failure("update part", err, issues, status),
            }
            *busy.write() = false;
        });
    });

    match lookup() {
        None => rsx! { p { style: "padding: 24px; color: #6b7280;", "Loading part..." } },
        Some(Lookup::NotFound) => rsx! {
            NotFoundView {
                title: "Part not found".to_string(),
                message: format!("No part with id {id} exists."),
                on_back: move |_| *page.write() = Page::Parts,
            }
        },
        Some(Lookup::Found(part)) => rsx! {
            div {
                div { style: PAGE_HEADER_STYLE,
                    h1 { style: "margin: 0;", "Edit Part: {part.name}" }
                    button { style: BUTTON_STYLE, onclick: move |_| *page.write() = Page::Parts, "Back" }
                }
                PartFormView {
                    form,
                    ships: ships(),
                    mode: FormMode::Edit,
                    issues: issues(),
                    submitting: busy(),
                    on_submit,
                    on_cancel: move |_| *page.write() = Page::Parts,
                }
                MeasurementPanel { kind: MeasurementKind::Part, parent_id: part.id.clone() }
            }
        },
    }
}

fn preview_text(rows: &[crate::infra::import::RawRow]) -> String {
    rows.iter()
        .map(|row| {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|(header, value)| format!("{header}: {value}"))
                .collect();
            format!("Row {}: {}", row.number, cells.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[component]
pub fn UsersPage() -> Element {
    let services = use_context::<AppServices>();
    let app = use_context::<AppState>();
    let mut busy = app.busy;
    let mut status = app.status;
    let users = use_signal(Vec::<User>::new);
    let table_state = use_signal(TableState::loading);
    let mut form = use_signal(UserForm::default);
    let mut issues = use_signal(Vec::<FieldIssue>::new);
    let mut show_form = use_signal(|| false);

    let fleet_for_load = services.fleet.clone();
    use_effect(move || {
        let fleet = fleet_for_load.clone();
        spawn(reload("users", move || fleet.list_users(), users, table_state, status));
    });

    let fleet_for_delete = services.fleet.clone();
    let on_delete = EventHandler::new(move |id: String| {
        let fleet = fleet_for_delete.clone();
        *busy.write() = true;
        spawn(async move {
            let worker = fleet.clone();
            match run_background("delete user", move || worker.delete_user(&id)).await {
                Ok(()) => {
                    *status.write() = "User deleted successfully".to_string();
                    reload("users", move || fleet.list_users(), users, table_state, status).await;
                }
                Err(err) => report_failure("delete user", err, issues, status),
            }
            *busy.write() = false;
        });
    });

    let fleet_for_create = services.fleet.clone();
    let on_submit = EventHandler::new(move |_: ()| {
        let current = form();
        if let Err(found) = current.validate() {
            *issues.write() = found;
            return;
        }
        issues.write().clear();
        let fleet = fleet_for_create.clone();
        *busy.write() = true;
        spawn(async move {
            let worker = fleet.clone();
            match run_background("create user", move || worker.create_user(&current)).await {
                Ok(user) => {
                    dialog::show_info("Success", &format!("User \"{}\" created successfully", user.name));
                    *form.write() = UserForm::default();
                    *show_form.write() = false;
                    reload("users", move || fleet.list_users(), users, table_state, status).await;
                }
                Err(err) => report_failure("create user", err, issues, status),
            }
            *busy.write() = false;
        });
    });

    let fleet_for_import = services.fleet.clone();
    let import_service = services.import.clone();
    let on_import = move |_| {
        let Some(path) = FileDialog::new()
            .add_filter("Spreadsheet", &["xlsx", "xls", "ods", "csv"])
            .pick_file() else {
            *status.write() = "Import cancelled".to_string();
            return;
        };
        let fleet = fleet_for_import.clone();
        let service = import_service.clone();
        *busy.write() = true;
        spawn(async move {
            let reader = service.clone();
            let sheet = match run_background("read user sheet", move || reader.read_sheet(&path)).await {
                Ok(sheet) => sheet,
                Err(err) => {
                    dialog::show_error("Import failed", &err.to_string());
                    *busy.write() = false;
                    return;
                }
            };
            let preview = preview_text(service.preview(&sheet));
            let question = format!(
                "{} data rows found in \"{}\". First rows:\n\n{preview}\n\nImport them?",
                sheet.rows.len(),
                sheet.name
            );
            if !dialog::confirm("Import users", &question) {
                *busy.write() = false;
                return;
            }
            let report = match service.map_users(&sheet) {
                Ok(report) => report,
                Err(err) => {
                    dialog::show_error("Import failed", &err.to_string());
                    *busy.write() = false;
                    return;
                }
            };
            let summary = report.summary();
            let worker = fleet.clone();
            let created = run_background("create imported users", move || {
                Ok::<_, ServiceError>(worker.create_users(&report.rows))
            })
            .await;
            match created {
                Ok(Ok(_)) => {
                    *status.write() = summary.clone();
                    dialog::show_info("Import complete", &summary);
                }
                Ok(Err((created, err))) => {
                    let message = format!("Imported {created} users before failing: {err}");
                    *status.write() = message.clone();
                    dialog::show_error("Import failed", &message);
                }
                Err(err) => {
                    *status.write() = format!("Failed to import users: {err}");
                    dialog::show_error("Import failed", &err.to_string());
                }
            }
            reload("users", move || fleet.list_users(), users, table_state, status).await;
            *busy.write() = false;
        });
    };

    let list = entity_table_view(
        user_table,
        &users.read(),
        table_state,
        app.is_compact(),
        None,
        on_delete,
    );

    rsx! {
        div {
            div { style: PAGE_HEADER_STYLE,
                div {
                    h1 { style: "margin: 0;", "Users" }
                    p { style: "margin: 0; color: #6b7280;", "Manage user accounts and permissions" }
                }
                div { style: "display: flex; gap: 8px;",
                    button { style: BUTTON_STYLE, disabled: busy(), onclick: on_import, "Import Users" }
                    button {
                        style: PRIMARY_BUTTON_STYLE,
                        disabled: busy(),
                        onclick: move |_| {
                            let open = !show_form();
                            *show_form.write() = open;
                        },
                        if show_form() { "Close" } else { "Add User" }
                    }
                }
            }
            if show_form() {
                UserFormView {
                    form,
                    issues: issues(),
                    submitting: busy(),
                    on_submit,
                    on_cancel: move |_| {
                        *show_form.write() = false;
                        issues.write().clear();
                    },
                }
            }
            {list}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn ship(id: &str, name: &str, status: ShipStatus) -> Ship {
        Ship {
            id: id.to_string(),
            name: name.to_string(),
            ship_type: "Tanker".to_string(),
            length: 100.0,
            width: 20.0,
            height: 10.0,
            description: String::new(),
            status,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            year_built: Some(2001),
        }
    }

    #[test]
    fn ship_status_is_searchable_by_label() {
        let ships = vec![
            ship("1", "Alpha", ShipStatus::Active),
            ship("2", "Bravo", ShipStatus::UnderRepair),
        ];
        let table = ship_table();
        let found: Vec<&str> = table
            .filter(&ships, "under repair")
            .into_iter()
            .map(|ship| ship.id.as_str())
            .collect();
        assert_eq!(found, vec!["2"]);
    }

    #[test]
    fn part_listing_names_its_ship() {
        let parts = vec![Part {
            id: "1".to_string(),
            name: "Rudder".to_string(),
            description: String::new(),
            ship_id: "2".to_string(),
            created_at: None,
        }];
        let ships = vec![ship("2", "Bravo", ShipStatus::Active)];

        let listings = part_listings(parts.clone(), &ships);
        assert_eq!(listings[0].field("shipName"), Some(FieldValue::Text("Bravo".to_string())));
        assert_eq!(part_table().filter(&listings, "bravo").len(), 1);

        let orphaned = part_listings(parts, &[]);
        assert_eq!(orphaned[0].ship_name, "Ship #2");
    }

    #[test]
    fn users_sort_by_join_date() {
        let user = |id: &str, day: u32| User {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            role: "employee".to_string(),
            department: "hr".to_string(),
            status: UserStatus::Active,
            join_date: NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date"),
        };
        let users = vec![user("1", 20), user("2", 5)];
        let table = user_table();
        let mut state = TableState::default();
        table.toggle_sort(&mut state, "joinDate");

        let ids: Vec<&str> = table
            .rows(&users, &state)
            .into_iter()
            .map(|user| user.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
