use std::sync::Arc;

use tracing::info;

use crate::domain::entities::fleet::{Part, Ship, User};
use crate::domain::entities::measurement::{MeasurementKind, MeasurementRow};
use crate::domain::forms::{FormMode, PartForm, ShipForm, UserForm};
use crate::domain::schema::{describe_issues, FieldIssue};
use crate::usecase::ports::repo::{FleetRepository, RepoError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{}", describe_issues(.0))]
    Invalid(Vec<FieldIssue>),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Result of looking an entity up by id. A missing entity is a normal
/// outcome the edit pages render, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Found)
    }
}

#[derive(Clone)]
pub struct FleetService {
    repo: Arc<dyn FleetRepository>,
}

impl FleetService {
    pub fn new(repo: Arc<dyn FleetRepository>) -> Self {
        Self { repo }
    }

    pub fn list_ships(&self) -> Result<Vec<Ship>, ServiceError> {
        Ok(self.repo.list_ships()?)
    }

    pub fn find_ship(&self, id: &str) -> Result<Lookup<Ship>, ServiceError> {
        Ok(self.repo.get_ship(id)?.into())
    }

    pub fn create_ship(&self, form: &ShipForm) -> Result<Ship, ServiceError> {
        form.validate(FormMode::Create).map_err(ServiceError::Invalid)?;
        let ship = self.repo.create_ship(form)?;
        info!(id = %ship.id, name = %ship.name, "ship created");
        Ok(ship)
    }

    pub fn update_ship(&self, id: &str, form: &ShipForm) -> Result<Ship, ServiceError> {
        form.validate(FormMode::Edit).map_err(ServiceError::Invalid)?;
        let ship = self.repo.update_ship(id, form)?;
        info!(id, "ship updated");
        Ok(ship)
    }

    pub fn delete_ship(&self, id: &str) -> Result<(), ServiceError> {
        self.repo.delete_ship(id)?;
        info!(id, "ship deleted");
        Ok(())
    }

    pub fn list_parts(&self) -> Result<Vec<Part>, ServiceError> {
        Ok(self.repo.list_parts()?)
    }

    pub fn find_part(&self, id: &str) -> Result<Lookup<Part>, ServiceError> {
        Ok(self.repo.get_part(id)?.into())
    }

    pub fn create_part(&self, form: &PartForm) -> Result<Part, ServiceError> {
        form.validate().map_err(ServiceError::Invalid)?;
        let part = self.repo.create_part(form)?;
        info!(id = %part.id, name = %part.name, "part created");
        Ok(part)
    }

    pub fn update_part(&self, id: &str, form: &PartForm) -> Result<Part, ServiceError> {
        form.validate().map_err(ServiceError::Invalid)?;
        let part = self.repo.update_part(id, form)?;
        info!(id, "part updated");
        Ok(part)
    }

    pub fn delete_part(&self, id: &str) -> Result<(), ServiceError> {
        self.repo.delete_part(id)?;
        info!(id, "part deleted");
        Ok(())
    }

    pub fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repo.list_users()?)
    }

    pub fn create_user(&self, form: &UserForm) -> Result<User, ServiceError> {
        form.validate().map_err(ServiceError::Invalid)?;
        let user = self.repo.create_user(form)?;
        info!(id = %user.id, "user created");
        Ok(user)
    }

    /// Creates every imported user; stops at the first rejection and reports
    /// how many made it.
    pub fn create_users(&self, forms: &[UserForm]) -> Result<usize, (usize, ServiceError)> {
        for (created, form) in forms.iter().enumerate() {
            self.create_user(form).map_err(|err| (created, err))?;
        }
        Ok(forms.len())
    }

    pub fn delete_user(&self, id: &str) -> Result<(), ServiceError> {
        self.repo.delete_user(id)?;
        info!(id, "user deleted");
        Ok(())
    }

    pub fn list_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
    ) -> Result<Vec<MeasurementRow>, ServiceError> {
        Ok(self.repo.list_rows(kind, parent_id)?)
    }

    pub fn save_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
        rows: &[MeasurementRow],
    ) -> Result<(), ServiceError> {
        self.repo.replace_rows(kind, parent_id, rows)?;
        info!(kind = kind.as_str(), parent_id, rows = rows.len(), "measurement rows saved");
        Ok(())
    }
}
