//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use herald_events::{Callback, callback};

/// Ordered record of callback invocations.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that records `"{label}({payload})"`.
    pub fn recorder(&self, label: &str) -> Callback<String> {
        let log = Arc::clone(&self.0);
        let label = label.to_owned();
        callback(move |payload: &String| {
            log.lock().unwrap().push(format!("{label}({payload})"));
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
