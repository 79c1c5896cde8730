//! Application state for the Teacher Compensation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::CompensationEngine;
use crate::policy::PolicyLoader;

/// Shared application state.
///
/// Contains the compensation engine (policy, cache, and deduction ledger)
/// shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<CompensationEngine>,
}

impl AppState {
    /// Creates a new application state over a loaded policy.
    pub fn new(policy: PolicyLoader) -> Self {
        Self {
            engine: Arc::new(CompensationEngine::new(policy)),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &CompensationEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
