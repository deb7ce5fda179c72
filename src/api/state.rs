use std::sync::Arc;

use crate::db::PreferenceStore;
use crate::services::RecommendationService;

/// Shared application state
///
/// Every handle is constructed once at startup and shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PreferenceStore>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(store: Arc<dyn PreferenceStore>, recommendations: Arc<RecommendationService>) -> Self {
        Self {
            store,
            recommendations,
        }
    }
}
