//! Callback delivery for non-blocking operations.
//!
//! A callback-based operation returns immediately and runs the request on
//! the client's dispatcher. When it completes, exactly one of
//! [`ClientCallback::on_success`] or [`ClientCallback::on_failure`] is
//! invoked, exactly once: both consume the callback.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{NowError, Result};

/// Receiver of the outcome of a non-blocking operation.
pub trait ClientCallback<T>: Send + 'static {
    /// Called with the unwrapped payload when the operation succeeds.
    fn on_success(self, value: T);

    /// Called when the operation fails.
    fn on_failure(self, error: NowError);
}

/// A pair of closures acting as a [`ClientCallback`].
pub struct Callbacks<S, F> {
    on_success: S,
    on_failure: F,
}

impl<S, F> Callbacks<S, F> {
    /// Pairs a success handler with a failure handler.
    pub const fn new(on_success: S, on_failure: F) -> Self {
        Self {
            on_success,
            on_failure,
        }
    }
}

impl<S, F> fmt::Debug for Callbacks<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

impl<T, S, F> ClientCallback<T> for Callbacks<S, F>
where
    S: FnOnce(T) + Send + 'static,
    F: FnOnce(NowError) + Send + 'static,
{
    fn on_success(self, value: T) {
        (self.on_success)(value);
    }

    fn on_failure(self, error: NowError) {
        (self.on_failure)(error);
    }
}

impl<T: Send + 'static> ClientCallback<T> for oneshot::Sender<Result<T>> {
    fn on_success(self, value: T) {
        if self.send(Ok(value)).is_err() {
            debug!("Callback receiver dropped before success was delivered");
        }
    }

    fn on_failure(self, error: NowError) {
        if self.send(Err(error)).is_err() {
            debug!("Callback receiver dropped before failure was delivered");
        }
    }
}

/// Runtime shared by every client for callbacks issued outside of tokio.
static FALLBACK: OnceLock<Runtime> = OnceLock::new();

fn fallback_runtime() -> Result<&'static Runtime> {
    if let Some(runtime) = FALLBACK.get() {
        return Ok(runtime);
    }

    debug!("Starting the dedicated callback runtime");
    let runtime = Builder::new_multi_thread()
        .thread_name("now-client-worker")
        .enable_all()
        .build()
        .map_err(|e| NowError::internal(format!("Failed to start runtime: {e}")))?;

    // Lost the race to another initializer; may run inside an async context.
    if let Err(runtime) = FALLBACK.set(runtime) {
        runtime.shutdown_background();
    }

    FALLBACK
        .get()
        .ok_or_else(|| NowError::internal("Callback runtime was not initialized"))
}

/// Delivers the outcome of one task to its callback.
///
/// Dropping it undelivered, as a runtime does with tasks it abandons on
/// shutdown, reports a failure instead.
struct Pending<T, C: ClientCallback<T>> {
    callback: Option<C>,
    marker: PhantomData<fn(T)>,
}

impl<T, C: ClientCallback<T>> Pending<T, C> {
    const fn new(callback: C) -> Self {
        Self {
            callback: Some(callback),
            marker: PhantomData,
        }
    }

    fn complete(mut self, outcome: Result<T>) {
        if let Some(callback) = self.callback.take() {
            match outcome {
                Ok(value) => callback.on_success(value),
                Err(error) => callback.on_failure(error),
            }
        }
    }
}

impl<T, C: ClientCallback<T>> Drop for Pending<T, C> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            debug!("Callback task dropped before completion");
            callback.on_failure(NowError::internal(
                "Runtime shut down before the operation completed",
            ));
        }
    }
}

/// Pool on which non-blocking operations run.
///
/// The runtime is picked per call: the caller's tokio runtime when there is
/// one, the shared dedicated runtime otherwise.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dispatcher {
    fallback: &'static Runtime,
}

impl Dispatcher {
    /// Creates a dispatcher, starting the dedicated runtime if needed.
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            fallback: fallback_runtime()?,
        })
    }

    fn handle(&self) -> Handle {
        Handle::try_current().unwrap_or_else(|_| self.fallback.handle().clone())
    }

    /// Runs `operation` and routes its outcome to `callback`.
    pub(crate) fn enqueue<T, Fut, C>(&self, operation: Fut, callback: C) -> JoinHandle<()>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        C: ClientCallback<T>,
    {
        let pending = Pending::new(callback);
        self.handle()
            .spawn(async move { pending.complete(operation.await) })
    }
}
