use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// User that every decoded observation is attributed to.
///
/// Observation documents carry no usable owner, so decoding always assigns
/// this id and the owning user is never checked for existence.
pub const PLACEHOLDER_USER_ID: i64 = 1;

/// How an empty structured field is written into an observation document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFieldEncoding {
    /// `[]`
    EmptyList,
    /// `{}`
    EmptyObject,
    /// `null`
    Null,
}

impl EmptyFieldEncoding {
    /// JSON value written for an empty field under this policy
    pub fn to_json(self) -> Value {
        match self {
            EmptyFieldEncoding::EmptyList => Value::Array(Vec::new()),
            EmptyFieldEncoding::EmptyObject => Value::Object(Map::new()),
            EmptyFieldEncoding::Null => Value::Null,
        }
    }
}

/// Encoding of empty `symptoms` and `family_history` fields.
///
/// Existing clients expect `[]` here even though populated values are objects.
pub const EMPTY_STRUCTURED_FIELD_ENCODING: EmptyFieldEncoding = EmptyFieldEncoding::EmptyList;

/// Free-form key/value field such as `symptoms` or `family_history`.
///
/// No schema is imposed on the keys; insertion order is kept so a stored
/// value is written back exactly as it was received.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StructuredField {
    /// Absent, `null` or `[]`
    #[default]
    Empty,
    /// A JSON object
    Value(Map<String, Value>),
}

impl StructuredField {
    /// Interpret a JSON value taken from an observation document
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(StructuredField::Empty),
            Value::Array(items) if items.is_empty() => Ok(StructuredField::Empty),
            Value::Object(map) => Ok(StructuredField::Value(map.clone())),
            other => Err(format!("expected an object, found {}", other)),
        }
    }

    /// JSON value written into an observation document
    pub fn to_json(&self) -> Value {
        match self {
            StructuredField::Empty => EMPTY_STRUCTURED_FIELD_ENCODING.to_json(),
            StructuredField::Value(map) => Value::Object(map.clone()),
        }
    }

    /// Serialized text stored in the database, `None` when empty
    pub fn to_storage(&self) -> Option<String> {
        match self {
            StructuredField::Empty => None,
            StructuredField::Value(map) => Some(Value::Object(map.clone()).to_string()),
        }
    }

    /// Parse the serialized text stored in the database
    pub fn from_storage(stored: Option<&str>) -> Result<Self, String> {
        match stored.map(str::trim) {
            None | Some("") => Ok(StructuredField::Empty),
            Some(text) => {
                let value: Value = serde_json::from_str(text)
                    .map_err(|e| format!("stored JSON is invalid: {}", e))?;
                Self::from_json(&value)
            }
        }
    }

    /// Whether this field holds no value
    pub fn is_empty(&self) -> bool {
        matches!(self, StructuredField::Empty)
    }
}

/// Domain model for a stored glucose measurement
#[derive(Debug, Clone, PartialEq)]
pub struct GlucoseRecord {
    /// Identifier assigned by the store
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Glucose level in mg/dL
    pub glucose_level: f64,

    /// When the measurement was taken (wall-clock, no offset)
    pub date: NaiveDateTime,

    pub meal_type: Option<String>,
    pub pre_or_post_meal: Option<String>,
    pub carbs: Option<i64>,
    pub insulin_dose: Option<i64>,
    pub medications: Option<String>,
    pub exercise_details: Option<String>,
    pub symptoms: StructuredField,
    pub notes: Option<String>,
    pub hba1c_levels: Option<f64>,
    pub family_history: StructuredField,
    pub diet_info: Option<String>,
    pub patient_outcomes: Option<String>,
}

/// Field set of a glucose record that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewGlucoseRecord {
    pub user_id: i64,
    pub glucose_level: f64,

    /// Measurement time; the store substitutes the creation time when absent
    pub date: Option<NaiveDateTime>,

    pub meal_type: Option<String>,
    pub pre_or_post_meal: Option<String>,
    pub carbs: Option<i64>,
    pub insulin_dose: Option<i64>,
    pub medications: Option<String>,
    pub exercise_details: Option<String>,
    pub symptoms: StructuredField,
    pub notes: Option<String>,
    pub hba1c_levels: Option<f64>,
    pub family_history: StructuredField,
    pub diet_info: Option<String>,
    pub patient_outcomes: Option<String>,
}
