use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Settings;
use crate::infra::simulated::SimulatedBackend;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::usecase::ports::repo::FleetRepository;
use crate::usecase::services::fleet_service::FleetService;
use crate::usecase::services::import_service::ImportService;

/// Services shared with every component through the root context.
#[derive(Clone)]
pub struct AppServices {
    pub fleet: FleetService,
    pub import: ImportService,
    pub settings: Settings,
}

impl AppServices {
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let repo = SqliteRepo::open(settings.database_path.clone(), settings.seed_samples)
            .context("failed to open fleet database")?;
        let backend = SimulatedBackend::new(
            repo,
            settings.latency(),
            settings.failure_rate,
            settings.rng_seed,
        );
        backend.init().context("failed to initialise fleet database")?;
        info!(
            latency_ms = settings.latency_ms,
            failure_rate = settings.failure_rate,
            persistent = settings.database_path.is_some(),
            "fleet backend ready"
        );

        Ok(Self {
            fleet: FleetService::new(Arc::new(backend)),
            import: ImportService::default(),
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_settings() -> Settings {
        Settings {
            latency_ms: 0,
            failure_rate: 0.0,
            rng_seed: Some(7),
            ..Settings::default()
        }
    }

    #[test]
    fn seeded_backend_lists_sample_fleet() {
        let services = AppServices::from_settings(quiet_settings()).expect("services should build");
        let ships = services.fleet.list_ships().expect("ships should load");
        assert!(!ships.is_empty());
    }

    #[test]
    fn unseeded_backend_starts_empty() {
        let settings = Settings {
            seed_samples: false,
            ..quiet_settings()
        };
        let services = AppServices::from_settings(settings).expect("services should build");
        assert!(services.fleet.list_users().expect("users should load").is_empty());
    }
}
