use serde::{Deserialize, Serialize};

/// Text layout of the `date` column (`2024-01-01 10:30:00.000000`)
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Storage model for a row of `glucose_records`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseRecordRow {
    /// Primary key assigned by the store
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Measured glucose level in mg/dL
    pub glucose_level: f64,

    /// When the measurement was taken, in `STORAGE_DATE_FORMAT`
    pub date: String,

    pub meal_type: Option<String>,
    pub pre_or_post_meal: Option<String>,
    pub carbs: Option<i64>,
    pub insulin_dose: Option<i64>,
    pub medications: Option<String>,
    pub exercise_details: Option<String>,

    /// Serialized JSON object
    pub symptoms: Option<String>,

    pub notes: Option<String>,
    pub hba1c_levels: Option<f64>,

    /// Serialized JSON object
    pub family_history: Option<String>,

    pub diet_info: Option<String>,
    pub patient_outcomes: Option<String>,
}

/// Column values for inserting or fully replacing a glucose record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGlucoseRecordRow {
    pub user_id: i64,
    pub glucose_level: f64,

    /// Measurement time; the store uses the current time when absent
    pub date: Option<String>,

    pub meal_type: Option<String>,
    pub pre_or_post_meal: Option<String>,
    pub carbs: Option<i64>,
    pub insulin_dose: Option<i64>,
    pub medications: Option<String>,
    pub exercise_details: Option<String>,
    pub symptoms: Option<String>,
    pub notes: Option<String>,
    pub hba1c_levels: Option<f64>,
    pub family_history: Option<String>,
    pub diet_info: Option<String>,
    pub patient_outcomes: Option<String>,
}

impl NewGlucoseRecordRow {
    /// Build the stored row once the store has assigned an id and a date
    pub fn into_row(self, id: i64, date: String) -> GlucoseRecordRow {
        GlucoseRecordRow {
            id,
            user_id: self.user_id,
            glucose_level: self.glucose_level,
            date,
            meal_type: self.meal_type,
            pre_or_post_meal: self.pre_or_post_meal,
            carbs: self.carbs,
            insulin_dose: self.insulin_dose,
            medications: self.medications,
            exercise_details: self.exercise_details,
            symptoms: self.symptoms,
            notes: self.notes,
            hba1c_levels: self.hba1c_levels,
            family_history: self.family_history,
            diet_info: self.diet_info,
            patient_outcomes: self.patient_outcomes,
        }
    }
}
