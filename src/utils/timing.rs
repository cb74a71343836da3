//! Debounce and throttle wrappers for input handlers.
//!
//! Both hold a callback and are driven by tokio time, so tests can run them
//! with paused time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Trailing-edge debounce: the callback runs once, `wait` after the last
/// call, with that call's arguments.
pub struct Debouncer<T> {
    wait: Duration,
    callback: Callback<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            wait,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Restart the quiet window with new arguments. Must be called from
    /// within a tokio runtime.
    pub fn call(&self, args: T) {
        let callback = Arc::clone(&self.callback);
        let wait = self.wait;
        let task = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            callback(args);
        });

        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.replace(task) {
                previous.abort();
            }
        }
    }

    /// Drop a pending invocation, if any.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(task) = pending.take() {
                task.abort();
            }
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(task) = pending.take() {
                task.abort();
            }
        }
    }
}

/// Leading-edge throttle: the first call runs immediately, later calls are
/// dropped until `limit` has passed since the last run.
pub struct Throttle<T> {
    limit: Duration,
    callback: Callback<T>,
    last_run: Mutex<Option<Instant>>,
}

impl<T> Throttle<T> {
    pub fn new<F>(limit: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            limit,
            callback: Arc::new(callback),
            last_run: Mutex::new(None),
        }
    }

    /// Returns true when the callback ran.
    pub fn call(&self, args: T) -> bool {
        let now = Instant::now();
        let open = match self.last_run.lock() {
            Ok(mut last_run) => {
                let open = last_run.map_or(true, |at| now.duration_since(at) >= self.limit);
                if open {
                    *last_run = Some(now);
                }
                open
            }
            Err(_) => false,
        };

        if open {
            (self.callback)(args);
        }
        open
    }
}
