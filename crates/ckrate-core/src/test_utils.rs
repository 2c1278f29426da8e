//! Shared test utilities for unit tests
//!
//! Integration tests (in the root `tests/` directory) cannot see this module
//! because it is compiled only under `#[cfg(test)]`; they keep their own
//! helpers in `tests/common/mod.rs`.

use crate::types::{Dataframe, RatedResource, UsageRecord};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::env;
use std::sync::Mutex;

// Global mutex to serialize environment variable modifications in tests
pub static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// RAII guard for environment variable manipulation in tests
///
/// Restores every touched variable on drop, even if the test panics.
pub struct EnvVarGuard {
    vars: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set an environment variable and save its original value for restoration
    pub fn set(&mut self, key: &str, value: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        // env::set_var is unsafe since edition 2024
        unsafe {
            env::set_var(key, value);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.vars.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

impl Default for EnvVarGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a usage record with a numeric rating
pub fn record(service: &str, begin: &str, rating: f64) -> UsageRecord {
    UsageRecord::new(service, begin, json!(rating))
}

/// Build a dataframe from `(service, rating)` pairs
pub fn dataframe(begin: &str, resources: &[(&str, Value)]) -> Dataframe {
    Dataframe {
        begin: begin.to_string(),
        end: None,
        tenant_id: None,
        resources: resources
            .iter()
            .map(|(service, rating)| RatedResource {
                service: service.to_string(),
                rating: rating.clone(),
            })
            .collect(),
    }
}
