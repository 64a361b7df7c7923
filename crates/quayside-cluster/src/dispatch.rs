//! Task dispatch onto an externally supplied executor
//!
//! The coordinator introduces no private thread pool: provisioning work runs
//! on whatever executor the host supplies. A saturated executor hands the
//! task back and the caller runs it synchronously instead of dropping it.

use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tracing::debug;

/// A unit of provisioning work
pub type Task = BoxFuture<'static, ()>;

/// Executor seam supplied by the host
pub trait Executor: Send + Sync {
    /// Try to hand `task` to the pool. A rejected task is returned to the
    /// caller, which runs it in the calling task.
    fn try_execute(&self, task: Task) -> std::result::Result<(), Task>;
}

/// Executor backed by the ambient tokio runtime; never rejects
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl Executor for TokioSpawner {
    fn try_execute(&self, task: Task) -> std::result::Result<(), Task> {
        tokio::spawn(task);
        Ok(())
    }
}

/// Executor capping in-flight tasks, for hosts that bound management-plane
/// concurrency
#[derive(Debug)]
pub struct BoundedExecutor {
    permits: std::sync::Arc<Semaphore>,
}

impl BoundedExecutor {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            permits: std::sync::Arc::new(Semaphore::new(max_in_flight)),
        }
    }
}

impl Executor for BoundedExecutor {
    fn try_execute(&self, task: Task) -> std::result::Result<(), Task> {
        match self.permits.clone().try_acquire_owned() {
            Ok(permit) => {
                tokio::spawn(async move {
                    task.await;
                    drop(permit);
                });
                Ok(())
            }
            Err(_) => Err(task),
        }
    }
}

/// Dispatch `task`, falling back to running it inline when the pool is
/// saturated
pub(crate) async fn execute_or_run(executor: &dyn Executor, task: Task) {
    if let Err(task) = executor.try_execute(task) {
        debug!("executor saturated; running task in the calling context");
        task.await;
    }
}
