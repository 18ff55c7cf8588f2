//! Structured cancellation for in-flight backend loads.
//!
//! A [`FetchScope`] owns an abort handle for every load registered with it.
//! Cancelling the scope, or dropping it, aborts all of them; an aborted load
//! resolves to `None` and its result is never written anywhere.

use std::future::Future;

use futures_util::future::{AbortHandle, Abortable, Aborted};

/// Owner of a group of cancellable loads.
///
/// # Examples
/// ```
/// use portal::domain::FetchScope;
///
/// # tokio_test_block_on(async {
/// let mut scope = FetchScope::new();
/// let load = scope.guard(async { 3 });
/// scope.cancel();
/// assert_eq!(FetchScope::settle(load.await), None);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FetchScope {
    handles: Vec<AbortHandle>,
    cancelled: bool,
}

impl FetchScope {
    /// Scope with no registered loads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `load` with this scope.
    ///
    /// The returned future resolves to `Err(Aborted)` if the scope is
    /// cancelled first. Use [`FetchScope::settle`] to turn that into an
    /// `Option`.
    pub fn guard<F: Future>(&mut self, load: F) -> Abortable<F> {
        let (handle, registration) = AbortHandle::new_pair();
        if self.cancelled {
            handle.abort();
        }
        self.handles.push(handle);
        Abortable::new(load, registration)
    }

    /// Register and await a single load.
    pub async fn run<F: Future>(&mut self, load: F) -> Option<F::Output> {
        Self::settle(self.guard(load).await)
    }

    /// Map an aborted result to `None`.
    pub fn settle<T>(result: Result<T, Aborted>) -> Option<T> {
        result.ok()
    }

    /// Abort every registered load, including ones registered later.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        for handle in &self.handles {
            handle.abort();
        }
    }

    /// Whether [`FetchScope::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of loads registered so far.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no load has been registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for FetchScope {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
