//! Caller-owned request state.
//!
//! Service calls return `Result`. A front end that wants a spinner flag and a
//! "last error" banner wraps its calls in a `RequestState` it owns.

use crate::error::FolioError;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::error;

#[derive(Debug, Default)]
pub struct RequestState {
    in_flight: AtomicBool,
    last_error: Mutex<Option<String>>,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn clear_error(&self) {
        *self.last_error.lock() = None;
    }

    /// Run one operation. `Err` is recorded and becomes `None`.
    ///
    /// Calls are not queued; starting a second one while the first is pending
    /// is up to the caller to prevent (see [`RequestState::is_loading`]).
    pub async fn run<T, F>(&self, op: F) -> Option<T>
    where
        F: Future<Output = Result<T, FolioError>>,
    {
        self.in_flight.store(true, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        match op.await {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Operation failed: {}", e);
                *self.last_error.lock() = Some(e.user_message());
                None
            }
        }
    }

    /// Like [`RequestState::run`], reduced to a success flag.
    pub async fn run_flag<T, F>(&self, op: F) -> bool
    where
        F: Future<Output = Result<T, FolioError>>,
    {
        self.run(op).await.is_some()
    }
}
