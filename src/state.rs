//! Shared application state for all routes.

use crate::store::MovieStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        AppState { store }
    }
}
