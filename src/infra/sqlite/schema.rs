use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Opens `db_path`, or a private in-memory database when no path is given.
pub fn open_connection(db_path: Option<&Path>) -> Result<Connection> {
    let conn = match db_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create parent dir: {}", parent.display())
                })?;
            }
            Connection::open(path)
                .with_context(|| format!("failed to open db: {}", path.display()))?
        }
        None => Connection::open_in_memory().context("failed to open in-memory db")?,
    };
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ship (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            ship_type   TEXT NOT NULL,
            length      REAL NOT NULL,
            width       REAL NOT NULL,
            height      REAL NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            status      TEXT NOT NULL,
            year_built  INTEGER,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS part (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            ship_id     TEXT NOT NULL,
            created_at  TEXT
        );

        CREATE TABLE IF NOT EXISTS app_user (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL,
            role        TEXT NOT NULL,
            department  TEXT NOT NULL,
            status      TEXT NOT NULL,
            join_date   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS measurement_row (
            kind        TEXT NOT NULL,
            parent_id   TEXT NOT NULL,
            id          TEXT NOT NULL,
            position    INTEGER NOT NULL,
            created_at  TEXT NOT NULL,
            field_values TEXT NOT NULL,
            PRIMARY KEY (kind, parent_id, id)
        );

        CREATE INDEX IF NOT EXISTS idx_part_ship
            ON part(ship_id);

        CREATE INDEX IF NOT EXISTS idx_measurement_parent
            ON measurement_row(kind, parent_id, position);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
