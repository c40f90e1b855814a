// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export the in-memory repository from the data layer
pub use glucose_guide_data::repository::InMemoryGlucoseRecordRepository;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};

/// A complete observation document accepted by the translator
pub fn sample_observation() -> Value {
    json!({
        "resourceType": "Observation",
        "id": "1",
        "status": "final",
        "category": [{
            "coding": [{
                "system": "http://terminology.hl7.org/CodeSystem/observation-category",
                "code": "laboratory",
                "display": "Laboratory"
            }]
        }],
        "code": {
            "coding": [{
                "system": "http://loinc.org",
                "code": "15074-8",
                "display": "Glucose [Moles/volume] in Blood"
            }]
        },
        "subject": { "reference": "User/1" },
        "effectiveDateTime": "2024-01-01T10:30:00",
        "valueQuantity": {
            "value": 120.0,
            "unit": "mg/dL",
            "system": "http://unitsofmeasure.org",
            "code": "mg/dL"
        },
        "note": [{ "text": "Fasting" }],
        "meal_type": "Breakfast",
        "pre_or_post_meal": "Pre-meal",
        "carbs": 45,
        "insulin_dose": 4,
        "medications": "Metformin",
        "exercise_details": null,
        "symptoms": { "dizziness": false, "fatigue": true },
        "hbA1c_levels": 6.8,
        "family_history": { "diabetes": true },
        "diet_info": "Balanced",
        "patient_outcomes": null
    })
}

/// Mock implementation of health services for testing system health
#[derive(Debug, Clone)]
pub struct MockHealthService {
    database_status: ComponentStatus,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a mock reporting a healthy database
    pub fn new() -> Self {
        Self {
            database_status: ComponentStatus::Healthy,
        }
    }

    /// Configure the mock to report an unreachable database
    pub fn with_unhealthy_database(mut self) -> Self {
        self.database_status = ComponentStatus::Unhealthy;
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let (status, details) = match self.database_status {
            ComponentStatus::Healthy => (SystemStatus::Healthy, None),
            ComponentStatus::Unhealthy => (
                SystemStatus::Unhealthy,
                Some("Database connection error: mock failure".to_string()),
            ),
        };

        SystemHealth {
            status,
            components: vec![(
                "database".to_string(),
                HealthComponent {
                    status: self.database_status.clone(),
                    details,
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    async fn check_database_status(&self) -> Result<(), String> {
        match self.database_status {
            ComponentStatus::Healthy => Ok(()),
            ComponentStatus::Unhealthy => Err("Database connection error: mock failure".to_string()),
        }
    }
}
