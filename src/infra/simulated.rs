use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::domain::entities::fleet::{Part, Ship, User};
use crate::domain::entities::measurement::{MeasurementKind, MeasurementRow};
use crate::domain::forms::{PartForm, ShipForm, UserForm};
use crate::usecase::ports::repo::{FleetRepository, RepoError};

/// Wraps a repository with the demo backend's behaviour: every call waits
/// `latency`, and mutating calls are rejected with probability `failure_rate`.
pub struct SimulatedBackend<R> {
    inner: R,
    latency: Duration,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl<R: FleetRepository> SimulatedBackend<R> {
    pub fn new(inner: R, latency: Duration, failure_rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            inner,
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn wait(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }

    fn gate(&self, op: &str, kind: &str) -> Result<(), RepoError> {
        self.wait();
        let roll: f64 = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen();
        if roll < self.failure_rate {
            warn!(op, kind, "simulated backend rejected the request");
            return Err(RepoError::Rejected(format!(
                "Failed to {op} {kind}. Please try again."
            )));
        }
        Ok(())
    }
}

impl<R: FleetRepository> FleetRepository for SimulatedBackend<R> {
    fn init(&self) -> Result<(), RepoError> {
        self.inner.init()
    }

    fn list_ships(&self) -> Result<Vec<Ship>, RepoError> {
        self.wait();
        self.inner.list_ships()
    }

    fn get_ship(&self, id: &str) -> Result<Option<Ship>, RepoError> {
        self.wait();
        self.inner.get_ship(id)
    }

    fn create_ship(&self, form: &ShipForm) -> Result<Ship, RepoError> {
        self.gate("create", "ship")?;
        self.inner.create_ship(form)
    }

    fn update_ship(&self, id: &str, form: &ShipForm) -> Result<Ship, RepoError> {
        self.gate("update", "ship")?;
        self.inner.update_ship(id, form)
    }

    fn delete_ship(&self, id: &str) -> Result<(), RepoError> {
        self.gate("delete", "ship")?;
        self.inner.delete_ship(id)
    }

    fn list_parts(&self) -> Result<Vec<Part>, RepoError> {
        self.wait();
        self.inner.list_parts()
    }

    fn get_part(&self, id: &str) -> Result<Option<Part>, RepoError> {
        self.wait();
        self.inner.get_part(id)
    }

    fn create_part(&self, form: &PartForm) -> Result<Part, RepoError> {
        self.gate("create", "part")?;
        self.inner.create_part(form)
    }

    fn update_part(&self, id: &str, form: &PartForm) -> Result<Part, RepoError> {
        self.gate("update", "part")?;
        self.inner.update_part(id, form)
    }

    fn delete_part(&self, id: &str) -> Result<(), RepoError> {
        self.gate("delete", "part")?;
        self.inner.delete_part(id)
    }

    fn list_users(&self) -> Result<Vec<User>, RepoError> {
        self.wait();
        self.inner.list_users()
    }

    fn create_user(&self, form: &UserForm) -> Result<User, RepoError> {
        self.gate("create", "user")?;
        self.inner.create_user(form)
    }

    fn delete_user(&self, id: &str) -> Result<(), RepoError> {
        self.gate("delete", "user")?;
        self.inner.delete_user(id)
    }

    fn list_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
    ) -> Result<Vec<MeasurementRow>, RepoError> {
        self.wait();
        self.inner.list_rows(kind, parent_id)
    }

    fn replace_rows(
        &self,
        kind: MeasurementKind,
        parent_id: &str,
        rows: &[MeasurementRow],
    ) -> Result<(), RepoError> {
        self.gate("save", "measurement rows")?;
        self.inner.replace_rows(kind, parent_id, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::sqlite::repo::SqliteRepo;

    fn backend(failure_rate: f64) -> SimulatedBackend<SqliteRepo> {
        let repo = SqliteRepo::in_memory().expect("in-memory db should open");
        let backend = SimulatedBackend::new(repo, Duration::ZERO, failure_rate, Some(7));
        backend.init().expect("init should succeed");
        backend
    }

    fn part_form() -> PartForm {
        PartForm {
            name: "Propeller".to_string(),
            description: String::new(),
            ship_id: "1".to_string(),
        }
    }

    #[test]
    fn always_failing_backend_rejects_mutations_only() {
        let backend = backend(1.0);

        let err = backend.create_part(&part_form()).expect_err("should be rejected");
        assert_eq!(
            err,
            RepoError::Rejected("Failed to create part. Please try again.".to_string())
        );
        assert!(backend.list_parts().expect("reads are never rejected").is_empty());
    }

    #[test]
    fn never_failing_backend_passes_through() {
        let backend = backend(0.0);

        let part = backend.create_part(&part_form()).expect("should be created");
        assert_eq!(part.id, "1");
        assert_eq!(backend.inner().list_parts().expect("list").len(), 1);
    }

    #[test]
    fn failure_rate_is_clamped() {
        let backend = backend(7.5);
        assert_eq!(backend.failure_rate, 1.0);
    }
}
