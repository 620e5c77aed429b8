use crate::domain::entities::fleet::{Part, Ship, User};
use crate::domain::entities::measurement::{MeasurementKind, MeasurementRow};
use crate::domain::forms::{PartForm, ShipForm, UserForm};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("{kind} {id} was not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{0}")]
    Rejected(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepoError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        RepoError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// The create/update/delete/list contract of the fleet backend.
pub trait FleetRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn list_ships(&self) -> Result<Vec<Ship>, RepoError>;
    fn get_ship(&self, id: &str) -> Result<Option<Ship>, RepoError>;
    fn create_ship(&self, form: &ShipForm) -> Result<Ship, RepoError>;
    fn update_ship(&self, id: &str, form: &ShipForm) -> Result<Ship, RepoError>;
    fn delete_ship(&self, id: &str) -> Result<(), RepoError>;

    fn list_parts(&self) -> Result<Vec<Part>, RepoError>;
    fn get_part(&self, id: &str) -> Result<Option<Part>, RepoError>;
    fn create_part(&self, form: &PartForm) -> Result<Part, RepoError>;
    fn update_part(&self, id: &str, form: &PartForm) -> Result<Part, RepoError>;
    fn delete_part(&self, id: &str) -> Result<(), RepoError>;

    fn list_users(&self) -> Result<Vec<User>, RepoError>;
    fn create_user(&self, form: &UserForm) -> Result<User, RepoError>;
    fn delete_user(&self, id: &str) -> Result<(), RepoError>;

    fn list_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
    ) -> Result<Vec<MeasurementRow>, RepoError>;
    /// Replaces the full row collection of one parent.
    fn replace_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
        rows: &[MeasurementRow],
    ) -> Result<(), RepoError>;
}
