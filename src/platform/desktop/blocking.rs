use std::thread;
use std::time::Instant;

use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::usecase::ports::repo::RepoError;
use crate::usecase::services::fleet_service::ServiceError;
use crate::usecase::services::import_service::ImportError;
use crate::usecase::table::measurement_table::ExportError;

/// A background call ended without sending a result, because its thread
/// panicked or could not be spawned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("background task `{0}` stopped before finishing")]
pub struct WorkerLost(pub &'static str);

impl From<WorkerLost> for ServiceError {
    fn from(err: WorkerLost) -> Self {
        ServiceError::Repo(RepoError::Storage(err.to_string()))
    }
}

impl From<WorkerLost> for ImportError {
    fn from(err: WorkerLost) -> Self {
        ImportError::Read(err.to_string())
    }
}

impl From<WorkerLost> for ExportError {
    fn from(err: WorkerLost) -> Self {
        ExportError::Write(err.to_string())
    }
}

/// Runs a backend call on a worker thread and resolves once it is done, so
/// the event loop keeps rendering while the call sleeps or does I/O.
pub async fn run_background<F, T, E>(label: &'static str, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<WorkerLost> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let spawned = thread::Builder::new()
        .name(format!("fleet-{label}"))
        .spawn(move || {
            let started = Instant::now();
            let result = f();
            debug!(
                label,
                elapsed_ms = started.elapsed().as_millis() as u64,
                ok = result.is_ok(),
                "background call finished"
            );
            // The receiver is gone when the component was dropped.
            let _ = tx.send(result);
        });

    if let Err(err) = spawned {
        error!(label, error = %err, "failed to spawn background worker");
        return Err(WorkerLost(label).into());
    }

    rx.await.unwrap_or_else(|_| Err(WorkerLost(label).into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime should build")
            .block_on(future)
    }

    #[test]
    fn returns_the_worker_result() {
        let answer = block_on(run_background("answer", || Ok::<_, ServiceError>(6 * 7)));
        assert_eq!(answer, Ok(42));
    }

    #[test]
    fn runs_off_the_calling_thread() {
        let caller = thread::current().id();
        let worker = block_on(run_background("thread id", move || {
            Ok::<_, ImportError>(thread::current().id())
        }))
        .expect("worker should finish");
        assert_ne!(worker, caller);
    }

    #[test]
    fn panicking_worker_surfaces_as_an_error() {
        let result: Result<(), ServiceError> = block_on(run_background("panics", || {
            panic!("worker exploded");
        }));
        assert_eq!(
            result,
            Err(ServiceError::Repo(RepoError::Storage(
                "background task `panics` stopped before finishing".to_string()
            )))
        );
    }
}
