pub mod glucose;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use glucose::{
    create_glucose_record_service, GlucoseRecordService, GlucoseRecordServiceTrait,
    GlucoseServiceError,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use glucose::create_mock_glucose_record_service;
