use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use crate::domain::entities::fleet::{Part, Ship, User};
use crate::domain::entities::measurement::{MeasurementKind, MeasurementRow};
use crate::domain::forms::{PartForm, ShipForm, UserForm};
use crate::infra::sqlite::queries::{
    delete_by_id, delete_rows_of, get_part, get_ship, insert_part, insert_ship, insert_user,
    list_parts, list_rows, list_ships, list_users, next_id, replace_rows, seed_samples,
    update_part, update_ship,
};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::{FleetRepository, RepoError};

fn storage_err(err: anyhow::Error) -> RepoError {
    RepoError::Storage(format!("{err:#}"))
}

/// Fleet state kept in SQLite. Without a path the database lives in memory
/// and is gone when the app exits.
pub struct SqliteRepo {
    pub db_path: Option<PathBuf>,
    pub seed_samples: bool,
    conn: Mutex<Connection>,
}

impl SqliteRepo {
    pub fn open(db_path: Option<PathBuf>, seed_samples: bool) -> Result<Self, RepoError> {
        let conn = open_connection(db_path.as_deref()).map_err(storage_err)?;
        Ok(Self {
            db_path,
            seed_samples,
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self, RepoError> {
        Self::open(None, false)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FleetRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        let conn = self.conn();
        init_db(&conn).map_err(storage_err)?;
        if self.seed_samples {
            seed_samples(&conn).map_err(storage_err)?;
        }
        debug!(path = ?self.db_path, seeded = self.seed_samples, "fleet database ready");
        Ok(())
    }

    fn list_ships(&self) -> Result<Vec<Ship>, RepoError> {
        list_ships(&self.conn()).map_err(storage_err)
    }

    fn get_ship(&self, id: &str) -> Result<Option<Ship>, RepoError> {
        get_ship(&self.conn(), id).map_err(storage_err)
    }

    fn create_ship(&self, form: &ShipForm) -> Result<Ship, RepoError> {
        let conn = self.conn();
        let id = next_id(&conn, "ship").map_err(storage_err)?;
        insert_ship(&conn, &id, form, Utc::now()).map_err(storage_err)?;
        get_ship(&conn, &id)
            .map_err(storage_err)?
            .ok_or_else(|| RepoError::not_found("ship", id))
    }

    fn update_ship(&self, id: &str, form: &ShipForm) -> Result<Ship, RepoError> {
        let conn = self.conn();
        if !update_ship(&conn, id, form).map_err(storage_err)? {
            return Err(RepoError::not_found("ship", id));
        }
        get_ship(&conn, id)
            .map_err(storage_err)?
            .ok_or_else(|| RepoError::not_found("ship", id))
    }

    fn delete_ship(&self, id: &str) -> Result<(), RepoError> {
        let conn = self.conn();
        if !delete_by_id(&conn, "ship", id).map_err(storage_err)? {
            return Err(RepoError::not_found("ship", id));
        }
        delete_rows_of(&conn, MeasurementKind::Ship, id).map_err(storage_err)
    }

    fn list_parts(&self) -> Result<Vec<Part>, RepoError> {
        list_parts(&self.conn()).map_err(storage_err)
    }

    fn get_part(&self, id: &str) -> Result<Option<Part>, RepoError> {
        get_part(&self.conn(), id).map_err(storage_err)
    }

    fn create_part(&self, form: &PartForm) -> Result<Part, RepoError> {
        let conn = self.conn();
        let id = next_id(&conn, "part").map_err(storage_err)?;
        insert_part(&conn, &id, form, Utc::now()).map_err(storage_err)?;
        get_part(&conn, &id)
            .map_err(storage_err)?
            .ok_or_else(|| RepoError::not_found("part", id))
    }

    fn update_part(&self, id: &str, form: &PartForm) -> Result<Part, RepoError> {
        let conn = self.conn();
        if !update_part(&conn, id, form).map_err(storage_err)? {
            return Err(RepoError::not_found("part", id));
        }
        get_part(&conn, id)
            .map_err(storage_err)?
            .ok_or_else(|| RepoError::not_found("part", id))
    }

    fn delete_part(&self, id: &str) -> Result<(), RepoError> {
        let conn = self.conn();
        if !delete_by_id(&conn, "part", id).map_err(storage_err)? {
            return Err(RepoError::not_found("part", id));
        }
        delete_rows_of(&conn, MeasurementKind::Part, id).map_err(storage_err)
    }

    fn list_users(&self) -> Result<Vec<User>, RepoError> {
        list_users(&self.conn()).map_err(storage_err)
    }

    fn create_user(&self, form: &UserForm) -> Result<User, RepoError> {
        let conn = self.conn();
        let id = next_id(&conn, "app_user").map_err(storage_err)?;
        insert_user(&conn, &id, form).map_err(storage_err)?;
        list_users(&conn)
            .map_err(storage_err)?
            .into_iter()
            .find(|user| user.id == id)
            .ok_or_else(|| RepoError::not_found("user", id))
    }

    fn delete_user(&self, id: &str) -> Result<(), RepoError> {
        if delete_by_id(&self.conn(), "app_user", id).map_err(storage_err)? {
            Ok(())
        } else {
            Err(RepoError::not_found("user", id))
        }
    }

    fn list_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
    ) -> Result<Vec<MeasurementRow>, RepoError> {
        list_rows(&self.conn(), kind, parent_id).map_err(storage_err)
    }

    fn replace_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
        rows: &[MeasurementRow],
    ) -> Result<(), RepoError> {
        replace_rows(&mut self.conn(), kind, parent_id, rows).map_err(storage_err)
    }
}
