use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::entities::fleet::{Part, Ship, ShipStatus, User, UserStatus};
use crate::domain::entities::measurement::{MeasurementKind, MeasurementRow, MeasurementValues};
use crate::domain::forms::{PartForm, ShipForm, UserForm};

const SHIP_COLUMNS: &str =
    "id, name, ship_type, length, width, height, description, status, year_built, created_at";
const PART_COLUMNS: &str = "id, name, description, ship_id, created_at";
const USER_COLUMNS: &str = "id, name, email, role, department, status, join_date";

type ShipColumns = (
    String,
    String,
    String,
    f64,
    f64,
    f64,
    String,
    String,
    Option<i64>,
    String,
);
type PartColumns = (String, String, String, String, Option<String>);
type UserColumns = (String, String, String, String, String, String, String);

fn read_ship_columns(row: &Row<'_>) -> rusqlite::Result<ShipColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn read_part_columns(row: &Row<'_>) -> rusqlite::Result<PartColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<UserColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|value| value.with_timezone(&Utc))
        .with_context(|| format!("invalid timestamp: {text}"))
}

fn ship_from_columns(columns: ShipColumns) -> Result<Ship> {
    let (id, name, ship_type, length, width, height, description, status, year_built, created_at) =
        columns;
    Ok(Ship {
        status: status
            .parse::<ShipStatus>()
            .with_context(|| format!("ship {id} has invalid status"))?,
        created_at: parse_timestamp(&created_at)?,
        id,
        name,
        ship_type,
        length,
        width,
        height,
        description,
        year_built,
    })
}

fn part_from_columns(columns: PartColumns) -> Result<Part> {
    let (id, name, description, ship_id, created_at) = columns;
    Ok(Part {
        created_at: created_at.as_deref().map(parse_timestamp).transpose()?,
        id,
        name,
        description,
        ship_id,
    })
}

fn user_from_columns(columns: UserColumns) -> Result<User> {
    let (id, name, email, role, department, status, join_date) = columns;
    Ok(User {
        status: UserStatus::normalize(&status),
        join_date: NaiveDate::parse_from_str(&join_date, "%Y-%m-%d")
            .with_context(|| format!("user {id} has invalid join date"))?,
        id,
        name,
        email,
        role,
        department,
    })
}

/// Next free numeric id of `table`, as text.
pub fn next_id(conn: &Connection, table: &str) -> Result<String> {
    let next: i64 = conn
        .query_row(
            &format!("SELECT COALESCE(MAX(CAST(id AS INTEGER)), 0) + 1 FROM {table}"),
            [],
            |row| row.get(0),
        )
        .with_context(|| format!("failed to allocate id for {table}"))?;
    Ok(next.to_string())
}

pub fn list_ships(conn: &Connection) -> Result<Vec<Ship>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SHIP_COLUMNS} FROM ship ORDER BY CAST(id AS INTEGER), id"
        ))
        .context("failed to prepare ship list")?;
    let rows = stmt
        .query_map([], read_ship_columns)
        .context("failed to query ships")?;

    let mut ships = Vec::new();
    for row in rows {
        ships.push(ship_from_columns(row.context("failed to read ship row")?)?);
    }
    Ok(ships)
}

pub fn get_ship(conn: &Connection, id: &str) -> Result<Option<Ship>> {
    let columns: Option<ShipColumns> = conn
        .query_row(
            &format!("SELECT {SHIP_COLUMNS} FROM ship WHERE id = ?1"),
            [id],
            read_ship_columns,
        )
        .optional()
        .with_context(|| format!("failed to load ship {id}"))?;
    columns.map(ship_from_columns).transpose()
}

pub fn insert_ship(
    conn: &Connection,
    id: &str,
    form: &ShipForm,
    created_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO ship(id, name, ship_type, length, width, height, description, status, year_built, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            id,
            form.name.trim(),
            form.ship_type.trim(),
            form.length,
            form.width,
            form.height,
            form.description,
            form.status.unwrap_or(ShipStatus::Active).as_str(),
            form.year_built,
            created_at.to_rfc3339(),
        ],
    )
    .with_context(|| format!("failed to insert ship {id}"))?;
    Ok(())
}

/// Returns false when no ship has `id`.
pub fn update_ship(conn: &Connection, id: &str, form: &ShipForm) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE ship SET name = ?2, ship_type = ?3, length = ?4, width = ?5, height = ?6,
                 description = ?7, status = COALESCE(?8, status), year_built = ?9
             WHERE id = ?1",
            params![
                id,
                form.name.trim(),
                form.ship_type.trim(),
                form.length,
                form.width,
                form.height,
                form.description,
                form.status.map(ShipStatus::as_str),
                form.year_built,
            ],
        )
        .with_context(|| format!("failed to update ship {id}"))?;
    Ok(changed > 0)
}

pub fn list_parts(conn: &Connection) -> Result<Vec<Part>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PART_COLUMNS} FROM part ORDER BY CAST(id AS INTEGER), id"
        ))
        .context("failed to prepare part list")?;
    let rows = stmt
        .query_map([], read_part_columns)
        .context("failed to query parts")?;

    let mut parts = Vec::new();
    for row in rows {
        parts.push(part_from_columns(row.context("failed to read part row")?)?);
    }
    Ok(parts)
}

pub fn get_part(conn: &Connection, id: &str) -> Result<Option<Part>> {
    let columns: Option<PartColumns> = conn
        .query_row(
            &format!("SELECT {PART_COLUMNS} FROM part WHERE id = ?1"),
            [id],
            read_part_columns,
        )
        .optional()
        .with_context(|| format!("failed to load part {id}"))?;
    columns.map(part_from_columns).transpose()
}

pub fn insert_part(
    conn: &Connection,
    id: &str,
    form: &PartForm,
    created_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO part(id, name, description, ship_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            form.name.trim(),
            form.description,
            form.ship_id.trim(),
            created_at.to_rfc3339(),
        ],
    )
    .with_context(|| format!("failed to insert part {id}"))?;
    Ok(())
}

pub fn update_part(conn: &Connection, id: &str, form: &PartForm) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE part SET name = ?2, description = ?3, ship_id = ?4 WHERE id = ?1",
            params![id, form.name.trim(), form.description, form.ship_id.trim()],
        )
        .with_context(|| format!("failed to update part {id}"))?;
    Ok(changed > 0)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {USER_COLUMNS} FROM app_user ORDER BY CAST(id AS INTEGER), id"
        ))
        .context("failed to prepare user list")?;
    let rows = stmt
        .query_map([], read_user_columns)
        .context("failed to query users")?;

    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_columns(row.context("failed to read user row")?)?);
    }
    Ok(users)
}

pub fn insert_user(conn: &Connection, id: &str, form: &UserForm) -> Result<()> {
    conn.execute(
        "INSERT INTO app_user(id, name, email, role, department, status, join_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            form.name.trim(),
            form.email.trim(),
            form.role,
            form.department,
            form.status.as_str(),
            form.join_date.format("%Y-%m-%d").to_string(),
        ],
    )
    .with_context(|| format!("failed to insert user {id}"))?;
    Ok(())
}

/// Deletes the row with `id` from `table`; false when nothing matched.
pub fn delete_by_id(conn: &Connection, table: &str, id: &str) -> Result<bool> {
    let changed = conn
        .execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])
        .with_context(|| format!("failed to delete {id} from {table}"))?;
    Ok(changed > 0)
}

pub fn delete_rows_of(conn: &Connection, kind: MeasurementKind, parent_id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM measurement_row WHERE kind = ?1 AND parent_id = ?2",
        params![kind.as_str(), parent_id],
    )
    .with_context(|| format!("failed to clear {} rows of {parent_id}", kind.as_str()))?;
    Ok(())
}

pub fn list_rows(
    conn: &Connection,
    kind: MeasurementKind,
    parent_id: &str,
) -> Result<Vec<MeasurementRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, created_at, field_values FROM measurement_row
             WHERE kind = ?1 AND parent_id = ?2
             ORDER BY position",
        )
        .context("failed to prepare measurement row list")?;
    let rows = stmt
        .query_map(params![kind.as_str(), parent_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .context("failed to query measurement rows")?;

    let mut loaded = Vec::new();
    for row in rows {
        let (id, created_at, field_values) = row.context("failed to read measurement row")?;
        let values: MeasurementValues = serde_json::from_str(&field_values)
            .with_context(|| format!("row {id} has malformed values"))?;
        loaded.push(MeasurementRow {
            created_at: parse_timestamp(&created_at)?,
            id,
            parent_id: Some(parent_id.to_string()),
            values,
        });
    }
    Ok(loaded)
}

pub fn replace_rows(
    conn: &mut Connection,
    kind: MeasurementKind,
    parent_id: &str,
    rows: &[MeasurementRow],
) -> Result<()> {
    let tx = conn
        .transaction()
        .context("failed to start measurement row transaction")?;

    delete_rows_of(&tx, kind, parent_id)?;

    {
        let mut insert_row = tx
            .prepare(
                "INSERT INTO measurement_row(kind, parent_id, id, position, created_at, field_values)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .context("failed to prepare measurement row insert")?;

        for (position, row) in rows.iter().enumerate() {
            let field_values =
                serde_json::to_string(&row.values).context("failed to encode row values")?;
            insert_row
                .execute(params![
                    kind.as_str(),
                    parent_id,
                    row.id,
                    position as i64,
                    row.created_at.to_rfc3339(),
                    field_values,
                ])
                .with_context(|| format!("failed to insert measurement row {}", row.id))?;
        }
    }

    tx.commit()
        .context("failed to commit measurement row transaction")?;
    Ok(())
}

/// A handful of ships, parts and users so the app is not empty on first launch.
pub fn seed_samples(conn: &Connection) -> Result<()> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM ship", [], |row| row.get(0))
        .context("failed to count ships")?;
    if existing > 0 {
        return Ok(());
    }

    let now = Utc::now();
    let ships = [
        ("HMS Victory", "Battleship", 69.3, 15.8, 62.5, Some(1765)),
        ("USS Enterprise", "Aircraft Carrier", 342.0, 40.5, 63.0, Some(1961)),
        ("Queen Mary 2", "Cruise Ship", 345.0, 41.0, 72.0, Some(2004)),
        ("Ever Given", "Container Ship", 399.9, 58.8, 32.9, Some(2018)),
    ];
    for (idx, (name, ship_type, length, width, height, year_built)) in
        ships.into_iter().enumerate()
    {
        let form = ShipForm {
            name: name.to_string(),
            ship_type: ship_type.to_string(),
            length,
            width,
            height,
            year_built,
            ..ShipForm::default()
        };
        insert_ship(conn, &(idx + 1).to_string(), &form, now)?;
    }

    let parts = [
        ("Main Engine", "Primary propulsion unit", "4"),
        ("Rudder Assembly", "Steering gear and rudder stock", "3"),
    ];
    for (idx, (name, description, ship_id)) in parts.into_iter().enumerate() {
        let form = PartForm {
            name: name.to_string(),
            description: description.to_string(),
            ship_id: ship_id.to_string(),
        };
        insert_part(conn, &(idx + 1).to_string(), &form, now)?;
    }

    let users = [
        (
            "Alice Johnson",
            "alice.johnson@example.com",
            "admin",
            "engineering",
            UserStatus::Active,
            "2023-01-15",
        ),
        (
            "Bob Smith",
            "bob.smith@example.com",
            "manager",
            "marketing",
            UserStatus::Active,
            "2023-02-20",
        ),
        (
            "Carol Davis",
            "carol.davis@example.com",
            "employee",
            "sales",
            UserStatus::Inactive,
            "2023-03-10",
        ),
    ];
    for (idx, (name, email, role, department, status, join_date)) in
        users.into_iter().enumerate()
    {
        let form = UserForm {
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            department: department.to_string(),
            status,
            join_date: NaiveDate::parse_from_str(join_date, "%Y-%m-%d")
                .context("invalid seed join date")?,
        };
        insert_user(conn, &(idx + 1).to_string(), &form)?;
    }

    Ok(())
}
