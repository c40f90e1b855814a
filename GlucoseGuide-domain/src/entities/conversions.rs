use chrono::NaiveDateTime;
use glucose_guide_data::models::{GlucoseRecordRow, NewGlucoseRecordRow, STORAGE_DATE_FORMAT};

use crate::entities::glucose_record::{GlucoseRecord, NewGlucoseRecord, StructuredField};
use crate::entities::observation::parse_iso_datetime;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Format a timestamp the way the `date` column stores it
pub fn format_storage_datetime(value: &NaiveDateTime) -> String {
    value.format(STORAGE_DATE_FORMAT).to_string()
}

/// Parse a stored `date` value.
///
/// Rows written by other tools may omit the fraction or use a `T` separator,
/// so anything ISO-8601 is accepted.
pub fn parse_storage_datetime(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| parse_iso_datetime(value).map_err(|e| e.to_string()))
        .map_err(|e| format!("Invalid stored date '{}': {}", value, e))
}

/// Convert from domain entity to data model for insert or replace
pub fn convert_to_data_new_record(record: &NewGlucoseRecord) -> NewGlucoseRecordRow {
    NewGlucoseRecordRow {
        user_id: record.user_id,
        glucose_level: record.glucose_level,
        date: record.date.as_ref().map(format_storage_datetime),
        meal_type: record.meal_type.clone(),
        pre_or_post_meal: record.pre_or_post_meal.clone(),
        carbs: record.carbs,
        insulin_dose: record.insulin_dose,
        medications: record.medications.clone(),
        exercise_details: record.exercise_details.clone(),
        symptoms: record.symptoms.to_storage(),
        notes: record.notes.clone(),
        hba1c_levels: record.hba1c_levels,
        family_history: record.family_history.to_storage(),
        diet_info: record.diet_info.clone(),
        patient_outcomes: record.patient_outcomes.clone(),
    }
}

/// Convert from data model to domain entity
pub fn convert_to_domain_record(row: GlucoseRecordRow) -> Result<GlucoseRecord, String> {
    let date = parse_storage_datetime(&row.date)?;
    let symptoms = StructuredField::from_storage(row.symptoms.as_deref())
        .map_err(|e| format!("Record {} has invalid symptoms: {}", row.id, e))?;
    let family_history = StructuredField::from_storage(row.family_history.as_deref())
        .map_err(|e| format!("Record {} has invalid family_history: {}", row.id, e))?;

    Ok(GlucoseRecord {
        id: row.id,
        user_id: row.user_id,
        glucose_level: row.glucose_level,
        date,
        meal_type: row.meal_type,
        pre_or_post_meal: row.pre_or_post_meal,
        carbs: row.carbs,
        insulin_dose: row.insulin_dose,
        medications: row.medications,
        exercise_details: row.exercise_details,
        symptoms,
        notes: row.notes,
        hba1c_levels: row.hba1c_levels,
        family_history,
        diet_info: row.diet_info,
        patient_outcomes: row.patient_outcomes,
    })
}
