//! Translation between glucose records and FHIR-inspired observation documents.
//!
//! The document layout borrows the FHIR `Observation` envelope (category, code,
//! subject, valueQuantity, note) and adds the record's context fields as flat
//! top-level keys. It is not a conformant FHIR resource.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::glucose_record::{GlucoseRecord, NewGlucoseRecord, StructuredField, PLACEHOLDER_USER_ID};

pub const RESOURCE_TYPE: &str = "Observation";
pub const OBSERVATION_STATUS: &str = "final";

pub const CATEGORY_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/observation-category";
pub const CATEGORY_CODE: &str = "laboratory";
pub const CATEGORY_DISPLAY: &str = "Laboratory";

pub const LOINC_SYSTEM: &str = "http://loinc.org";
pub const GLUCOSE_LOINC_CODE: &str = "15074-8";
pub const GLUCOSE_LOINC_DISPLAY: &str = "Glucose [Moles/volume] in Blood";

pub const GLUCOSE_UNIT: &str = "mg/dL";
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// Errors raised while decoding an observation document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    /// A value is present but malformed
    #[error("{0}")]
    Parse(String),

    /// A required key is absent
    #[error("Missing field: {0}")]
    MissingField(String),
}

/// A coded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Coding {
    pub system: String,
    pub code: String,
    pub display: String,
}

/// A set of codings for one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
}

/// Reference to the subject of the observation (`User/<id>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Reference {
    pub reference: String,
}

/// Measured value with its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
    pub system: String,
    pub code: String,
}

/// Free-text note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Annotation {
    pub text: Option<String>,
}

/// External representation of one glucose record.
///
/// Fields serialize in declaration order; optional values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ObservationDocument {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    pub id: String,
    pub status: String,
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    pub subject: Reference,
    #[serde(rename = "effectiveDateTime")]
    pub effective_date_time: String,
    #[serde(rename = "valueQuantity")]
    pub value_quantity: Quantity,
    pub note: Vec<Annotation>,
    pub meal_type: Option<String>,
    pub pre_or_post_meal: Option<String>,
    pub carbs: Option<i64>,
    pub insulin_dose: Option<i64>,
    pub medications: Option<String>,
    pub exercise_details: Option<String>,
    /// Object of symptom flags, or `[]` when none were recorded
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub symptoms: Value,
    #[serde(rename = "hbA1c_levels")]
    pub hba1c_levels: Option<f64>,
    /// Object of family history flags, or `[]` when none were recorded
    #[cfg_attr(feature = "with-api", schema(value_type = Object))]
    pub family_history: Value,
    pub diet_info: Option<String>,
    pub patient_outcomes: Option<String>,
}

/// Build the observation document for a stored record
pub fn encode(record: &GlucoseRecord) -> ObservationDocument {
    ObservationDocument {
        resource_type: RESOURCE_TYPE.to_string(),
        id: record.id.to_string(),
        status: OBSERVATION_STATUS.to_string(),
        category: vec![CodeableConcept {
            coding: vec![Coding {
                system: CATEGORY_SYSTEM.to_string(),
                code: CATEGORY_CODE.to_string(),
                display: CATEGORY_DISPLAY.to_string(),
            }],
        }],
        code: CodeableConcept {
            coding: vec![Coding {
                system: LOINC_SYSTEM.to_string(),
                code: GLUCOSE_LOINC_CODE.to_string(),
                display: GLUCOSE_LOINC_DISPLAY.to_string(),
            }],
        },
        subject: Reference {
            reference: format!("User/{}", record.user_id),
        },
        effective_date_time: format_iso_datetime(&record.date),
        value_quantity: Quantity {
            value: record.glucose_level,
            unit: GLUCOSE_UNIT.to_string(),
            system: UCUM_SYSTEM.to_string(),
            code: GLUCOSE_UNIT.to_string(),
        },
        note: vec![Annotation {
            text: record.notes.clone(),
        }],
        meal_type: record.meal_type.clone(),
        pre_or_post_meal: record.pre_or_post_meal.clone(),
        carbs: record.carbs,
        insulin_dose: record.insulin_dose,
        medications: record.medications.clone(),
        exercise_details: record.exercise_details.clone(),
        symptoms: record.symptoms.to_json(),
        hba1c_levels: record.hba1c_levels,
        family_history: record.family_history.to_json(),
        diet_info: record.diet_info.clone(),
        patient_outcomes: record.patient_outcomes.clone(),
    }
}

/// Build a record's field set from an observation document.
///
/// Every key that `encode` writes (apart from the constant envelope) must be
/// present; `null` marks an absent optional value. The owner is always
/// `PLACEHOLDER_USER_ID`.
pub fn decode(document: &Value) -> Result<NewGlucoseRecord, TranslateError> {
    if !document.is_object() {
        return Err(TranslateError::Parse(
            "observation document must be a JSON object".to_string(),
        ));
    }

    let value = required(required(document, "valueQuantity", "valueQuantity")?, "value", "valueQuantity.value")?;
    let glucose_level = value
        .as_f64()
        .ok_or_else(|| type_error("valueQuantity.value", "a number", value))?;

    let effective = required(document, "effectiveDateTime", "effectiveDateTime")?;
    let effective = effective
        .as_str()
        .ok_or_else(|| type_error("effectiveDateTime", "a string", effective))?;
    let date = parse_iso_datetime(effective)?;

    Ok(NewGlucoseRecord {
        user_id: PLACEHOLDER_USER_ID,
        glucose_level,
        date: Some(date),
        meal_type: optional_string(document, "meal_type")?,
        pre_or_post_meal: optional_string(document, "pre_or_post_meal")?,
        carbs: optional_integer(document, "carbs")?,
        insulin_dose: optional_integer(document, "insulin_dose")?,
        medications: optional_string(document, "medications")?,
        exercise_details: optional_string(document, "exercise_details")?,
        symptoms: structured(document, "symptoms")?,
        notes: first_note(document)?,
        hba1c_levels: optional_decimal(document, "hbA1c_levels")?,
        family_history: structured(document, "family_history")?,
        diet_info: optional_string(document, "diet_info")?,
        patient_outcomes: optional_string(document, "patient_outcomes")?,
    })
}

/// Parse an ISO-8601 timestamp into wall-clock time.
///
/// Accepts `T` or space separators, fractional seconds, a UTC offset (dropped)
/// and bare dates. A value with exactly two colon-separated parts, such as
/// `2024-01-01T10:30`, is retried with `:00` seconds appended.
pub fn parse_iso_datetime(value: &str) -> Result<NaiveDateTime, TranslateError> {
    parse_iso(value)
        .or_else(|| {
            if value.split(':').count() == 2 {
                parse_iso(&format!("{}:00", value))
            } else {
                None
            }
        })
        .ok_or_else(|| TranslateError::Parse(format!("Invalid isoformat string: '{}'", value)))
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Format wall-clock time as `YYYY-MM-DDTHH:MM:SS`, adding microseconds only when non-zero
pub fn format_iso_datetime(value: &NaiveDateTime) -> String {
    if value.nanosecond() / 1_000 == 0 {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn required<'a>(parent: &'a Value, key: &str, path: &str) -> Result<&'a Value, TranslateError> {
    parent
        .get(key)
        .ok_or_else(|| TranslateError::MissingField(path.to_string()))
}

fn type_error(path: &str, expected: &str, found: &Value) -> TranslateError {
    TranslateError::Parse(format!("{}: expected {}, found {}", path, expected, found))
}

fn optional_string(document: &Value, key: &str) -> Result<Option<String>, TranslateError> {
    match required(document, key, key)? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        other => Err(type_error(key, "a string", other)),
    }
}

fn optional_integer(document: &Value, key: &str) -> Result<Option<i64>, TranslateError> {
    match required(document, key, key)? {
        Value::Null => Ok(None),
        value => value
            .as_i64()
            .or_else(|| {
                // Whole-valued floats such as 40.0 coerce like an INTEGER column
                value
                    .as_f64()
                    .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
                    .map(|n| n as i64)
            })
            .map(Some)
            .ok_or_else(|| type_error(key, "an integer", value)),
    }
}

fn optional_decimal(document: &Value, key: &str) -> Result<Option<f64>, TranslateError> {
    match required(document, key, key)? {
        Value::Null => Ok(None),
        value => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| type_error(key, "a number", value)),
    }
}

fn structured(document: &Value, key: &str) -> Result<StructuredField, TranslateError> {
    StructuredField::from_json(required(document, key, key)?)
        .map_err(|e| TranslateError::Parse(format!("{}: {}", key, e)))
}

fn first_note(document: &Value) -> Result<Option<String>, TranslateError> {
    let notes = required(document, "note", "note")?;
    let notes = notes
        .as_array()
        .ok_or_else(|| type_error("note", "a list", notes))?;
    let first = notes
        .first()
        .ok_or_else(|| TranslateError::MissingField("note[0]".to_string()))?;

    match required(first, "text", "note[0].text")? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        other => Err(type_error("note[0].text", "a string", other)),
    }
}
