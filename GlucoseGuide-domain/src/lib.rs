// GlucoseGuide Domain
// This crate contains the observation translator and record services

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from glucose_guide_data for convenience
pub use glucose_guide_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
