use std::sync::Arc;

use glucose_guide_data::database::DatabasePool;
use glucose_guide_domain::health::{DatabaseHealthService, HealthServiceTrait};
use glucose_guide_domain::services::{create_glucose_record_service, GlucoseRecordServiceTrait};

/// Service type for dependency injection
pub type GlucoseRecordService = Arc<dyn GlucoseRecordServiceTrait>;

/// Health service type for dependency injection
pub type HealthService = Arc<dyn HealthServiceTrait>;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub glucose_service: GlucoseRecordService,
    pub health_service: HealthService,
    /// Deployment environment name reported by `/health`
    pub environment: String,
}

impl AppState {
    /// Build the production services over an open pool
    pub fn new(pool: DatabasePool, environment: impl Into<String>) -> Self {
        Self {
            glucose_service: Arc::new(create_glucose_record_service(pool.clone())),
            health_service: Arc::new(DatabaseHealthService::new(pool)),
            environment: environment.into(),
        }
    }
}
