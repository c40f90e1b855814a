use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, instrument};
use utoipa::IntoParams;

use glucose_guide_data::repository::DEFAULT_LIST_LIMIT;
use glucose_guide_domain::entities::ObservationDocument;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::entities::{CreatedResponse, ErrorResponse, MessageResponse};

pub const RECORD_ADDED: &str = "Record added successfully!";
pub const RECORD_UPDATED: &str = "Record updated successfully!";
pub const RECORD_DELETED: &str = "Record deleted successfully!";

/// Query parameters for listing records
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQueryParams {
    /// Maximum number of records (default: 500; negative for no limit)
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

impl ListQueryParams {
    /// Requested limit, or the default when absent or not an integer
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// Store a new glucose record from an observation document
#[utoipa::path(
    post,
    path = "/add_glucose_record",
    request_body = ObservationDocument,
    responses(
        (status = 201, description = "Record created", body = CreatedResponse),
        (status = 500, description = "Document could not be decoded or stored", body = ErrorResponse),
    ),
    tag = "glucose_records"
)]
#[instrument(skip(state, document))]
pub async fn add_glucose_record(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Received observation: {}", document);

    let id = state
        .glucose_service
        .create_record(&document)
        .await
        .map_err(|e| {
            error!("Error in add_glucose_record: {}", e);
            ApiError::from(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: RECORD_ADDED.to_string(),
            id,
        }),
    ))
}

/// List stored glucose records as observation documents
#[utoipa::path(
    get,
    path = "/get_glucose_records",
    params(ListQueryParams),
    responses(
        (status = 200, description = "Records in id order", body = [ObservationDocument]),
        (status = 500, description = "Records could not be read", body = ErrorResponse),
    ),
    tag = "glucose_records"
)]
#[instrument(skip(state))]
pub async fn get_glucose_records(
    State(state): State<AppState>,
    Query(params): Query<ListQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.effective_limit();

    let records = state.glucose_service.get_records(limit).await.map_err(|e| {
        error!("Error in get_glucose_records: {}", e);
        ApiError::from(e)
    })?;

    info!("Returning {} glucose records", records.len());
    Ok((StatusCode::OK, Json(records)))
}

/// Replace an existing record from an observation document
#[utoipa::path(
    put,
    path = "/update_glucose_record/{id}",
    params(
        ("id" = i64, Path, description = "Record id")
    ),
    request_body = ObservationDocument,
    responses(
        (status = 200, description = "Record updated", body = MessageResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Document could not be decoded or stored", body = ErrorResponse),
    ),
    tag = "glucose_records"
)]
#[instrument(skip(state, document))]
pub async fn update_glucose_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(document): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .glucose_service
        .update_record(id, &document)
        .await
        .map_err(|e| {
            error!("Error in update_glucose_record {}: {}", id, e);
            ApiError::from(e)
        })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: RECORD_UPDATED.to_string(),
        }),
    ))
}

/// Delete an existing record
#[utoipa::path(
    delete,
    path = "/delete_glucose_record/{id}",
    params(
        ("id" = i64, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Record could not be deleted", body = ErrorResponse),
    ),
    tag = "glucose_records"
)]
#[instrument(skip(state))]
pub async fn delete_glucose_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.glucose_service.delete_record(id).await.map_err(|e| {
        error!("Error in delete_glucose_record {}: {}", id, e);
        ApiError::from(e)
    })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: RECORD_DELETED.to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>) -> ListQueryParams {
        ListQueryParams {
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(params(None).effective_limit(), 500);
        assert_eq!(params(Some("3")).effective_limit(), 3);
        assert_eq!(params(Some("-1")).effective_limit(), -1);
        assert_eq!(params(Some("ten")).effective_limit(), 500);
        assert_eq!(params(Some("")).effective_limit(), 500);
    }
}
