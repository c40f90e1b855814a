use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Record not found")]
    pub error: String,
}

/// Confirmation body for update and delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Record updated successfully!")]
    pub message: String,
}

/// Confirmation body for create, carrying the assigned id
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "Record added successfully!")]
    pub message: String,

    /// Identifier assigned to the new record
    pub id: i64,
}
