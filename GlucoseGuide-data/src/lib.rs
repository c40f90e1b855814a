// GlucoseGuide Data
// This crate owns the relational store: schema, connection pool and repositories

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
