//! Application state for the conversion server.

use std::sync::Arc;

use super::service::ConversionService;

/// Shared application state.
///
/// Generic over `S: ConversionService` so tests can inject a fake upstream.
pub struct AppState<S: ConversionService> {
    service: Arc<S>,
}

// Manual Clone impl - only the Arc is cloned, S need not be Clone
impl<S: ConversionService> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: ConversionService> AppState<S> {
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Get a reference to the conversion service.
    pub fn service(&self) -> &S {
        &self.service
    }
}
