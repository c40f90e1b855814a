//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;
use glucose_guide_data::database::DatabasePool;
use tracing::{debug, error};

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database
    /// Returns an error if a pooled connection cannot run a trivial query
    async fn check_database_status(&self) -> Result<(), String>;
}

/// Health service that probes the SQLite pool
#[derive(Debug, Clone)]
pub struct DatabaseHealthService {
    pool: DatabasePool,
}

impl DatabaseHealthService {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Run the pool check and collect connection details off the async workers
    async fn probe_database(&self) -> Result<String, String> {
        let pool = self.pool.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            pool.check().map(|()| pool.connection_info())
        })
        .await
        .map_err(|e| format!("Database check task failed: {}", e))?;

        match outcome {
            Ok(info) => {
                debug!("Database health check passed");
                Ok(info)
            }
            Err(e) => {
                error!("Database health check failed: {}", e);
                Err(format!("Database connection error: {}", e))
            }
        }
    }
}

#[async_trait]
impl HealthServiceTrait for DatabaseHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let db_component = match self.probe_database().await {
            Ok(info) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(info),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };

        let status = if db_component.status == ComponentStatus::Healthy {
            SystemStatus::Healthy
        } else {
            SystemStatus::Unhealthy
        };

        SystemHealth {
            status,
            components: vec![("database".to_string(), db_component)]
                .into_iter()
                .collect(),
        }
    }

    async fn check_database_status(&self) -> Result<(), String> {
        self.probe_database().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_healthy() {
        let service = DatabaseHealthService::new(DatabasePool::in_memory().unwrap());

        assert!(service.check_database_status().await.is_ok());

        let health = service.get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);
        let database = &health.components["database"];
        assert_eq!(database.status, ComponentStatus::Healthy);
        assert!(database.details.as_deref().unwrap_or_default().contains("in-memory"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_health_on_single_threaded_runtime() {
        let service = DatabaseHealthService::new(DatabasePool::in_memory().unwrap());

        let first = service.get_system_health().await;
        let second = service.get_system_health().await;

        assert_eq!(first.status, SystemStatus::Healthy);
        assert_eq!(second.status, SystemStatus::Healthy);
    }
}
