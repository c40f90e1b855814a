use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Diabetes classification of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiabetesType {
    #[serde(rename = "Type 1")]
    Type1,
    #[serde(rename = "Type 2")]
    Type2,
}

impl DiabetesType {
    /// Stored text for this classification
    pub fn as_str(&self) -> &'static str {
        match self {
            DiabetesType::Type1 => "Type 1",
            DiabetesType::Type2 => "Type 2",
        }
    }
}

impl fmt::Display for DiabetesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiabetesType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Type 1" => Ok(DiabetesType::Type1),
            "Type 2" => Ok(DiabetesType::Type2),
            other => Err(format!("Unknown diabetes type: {}", other)),
        }
    }
}

/// Storage model for a row of `users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub diabetes_type: DiabetesType,
}

/// Input for creating a user out of band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub diabetes_type: DiabetesType,
}
