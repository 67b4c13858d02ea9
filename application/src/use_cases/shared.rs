//! Shared utilities for the screen controllers.
//!
//! Contains the lifecycle scope every controller runs its tasks in, cancellation
//! checking, and the cancellable store-call helper.

use crate::ports::night_store::StoreError;
use sleep_domain::DomainError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

/// Errors that can end a controller action
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl TrackerError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TrackerError::Cancelled)
    }
}

/// Check if the screen has been torn down.
///
/// Returns `Err(TrackerError::Cancelled)` if the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), TrackerError> {
    if token.is_cancelled() {
        return Err(TrackerError::Cancelled);
    }
    Ok(())
}

/// Run a store call, racing it against cancellation and the optional timeout.
pub(crate) async fn store_call<T, F>(
    token: &CancellationToken,
    timeout: Option<Duration>,
    operation: &'static str,
    call: F,
) -> Result<T, TrackerError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    check_cancelled(token)?;
    debug!(operation, "store call");

    let bounded = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout(limit)),
            },
            None => call.await,
        }
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(operation, "store call abandoned, screen closed");
            Err(TrackerError::Cancelled)
        }
        result = bounded => result.map_err(TrackerError::from),
    }
}

/// Apply `modify` to the published state unless the scope has been cancelled.
///
/// The check runs under the channel's write lock, which is what makes
/// [`ScreenScope::close`] a hard barrier for publications.
pub(crate) fn publish<T>(
    state: &watch::Sender<T>,
    token: &CancellationToken,
    modify: impl FnOnce(&mut T),
) -> bool {
    state.send_if_modified(|current| {
        if token.is_cancelled() {
            return false;
        }
        modify(current);
        true
    })
}

/// Log the outcome of an action and return the message to surface, if any.
pub(crate) fn report(action: &'static str, result: Result<(), TrackerError>) -> Option<String> {
    match result {
        Ok(()) => {
            info!(action, "action completed");
            None
        }
        Err(e) if e.is_cancelled() => {
            debug!(action, "action cancelled");
            None
        }
        Err(e) => {
            error!(action, error = %e, "action failed");
            Some(e.to_string())
        }
    }
}

/// Lifetime of one screen visit
///
/// Owns the cancellation token handed to every task and tracks the tasks
/// themselves, so the controller can wait for them or tear them all down.
#[derive(Debug, Default)]
pub(crate) struct ScreenScope {
    token: CancellationToken,
    tasks: TaskTracker,
}

impl ScreenScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task)
    }

    /// Wait until every task spawned so far (and any spawned meanwhile) has finished.
    pub(crate) async fn settled(&self) {
        if self.tasks.is_closed() {
            self.tasks.wait().await;
            return;
        }
        self.tasks.close();
        self.tasks.wait().await;
        if !self.is_closed() {
            self.tasks.reopen();
        }
    }

    /// Cancel the scope. Once this returns no task can publish to `state`.
    pub(crate) fn close<T>(&self, state: &watch::Sender<T>) {
        self.token.cancel();
        self.tasks.close();
        // Wait out a publication that already holds the lock.
        state.send_if_modified(|_| false);
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
