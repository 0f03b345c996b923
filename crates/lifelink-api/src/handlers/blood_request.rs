//! Blood request handlers — the request lifecycle plus the proximity
//! notification flow.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use lifelink_core::error::AppError;
use lifelink_core::types::geo::GeoPoint;
use lifelink_database::repositories::blood_request::RequestFilter;
use lifelink_entity::request::model::CreateBloodRequest;

use crate::dto::request::{
    CreateRequestPayload, FulfillPayload, ListRequestsQuery, RespondPayload, UpdateStatusPayload,
};
use crate::dto::validate_payload;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/blood-requests
///
/// Persists the request, queries nearby matching donors, and fans the
/// creation event out before returning the created record.
pub async fn create_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validate_payload(&payload)?;

    let detail = state
        .request_service
        .create(
            &auth,
            CreateBloodRequest {
                patient_name: payload.patient_name,
                blood_group: payload.blood_group,
                urgency: payload.urgency,
                units_needed: payload.units_needed,
                contact: payload.contact,
                latitude: payload.location.latitude(),
                longitude: payload.location.longitude(),
                address: payload.location.address,
            },
        )
        .await?;

    let matches = state
        .matching_service
        .find_nearby_donors(
            detail.request.location(),
            None,
            detail.request.blood_group,
            auth.user_id,
        )
        .await?;

    state.dispatcher.request_created(&detail, &matches).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": detail })),
    ))
}

/// GET /api/blood-requests
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut filter = RequestFilter {
        status: query.status,
        blood_group: query.blood_group,
        urgency: query.urgency,
        requester_id: query.requester_id,
        search: query.search,
        bbox: None,
    };

    if let (Some(latitude), Some(longitude)) = (query.latitude, query.longitude) {
        let center = GeoPoint::new(longitude, latitude);
        if !center.is_valid() {
            return Err(AppError::validation(
                "latitude/longitude must be a valid coordinate pair",
            )
            .into());
        }
        let radius_km = query
            .radius_km
            .unwrap_or_else(|| state.matching_service.default_radius_km());
        filter = filter.with_radius(center, radius_km);
    }

    let page = state
        .request_service
        .list(&filter, &pagination.into_page_request())
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": page })))
}

/// GET /api/blood-requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let detail = state.request_service.get(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": detail })))
}

/// POST /api/blood-requests/{id}/respond
pub async fn respond(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (request, response) = state
        .request_service
        .respond(&auth, id, payload.message, payload.can_donate)
        .await?;

    state
        .dispatcher
        .response_received(&request, &response, &auth.username)
        .await;

    Ok(Json(serde_json::json!({ "success": true, "data": response })))
}

/// POST /api/blood-requests/{id}/fulfill
pub async fn fulfill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FulfillPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_payload(&payload)?;

    let outcome = state
        .request_service
        .fulfill(&auth, id, payload.donor_id, payload.units_provided)
        .await?;

    state.dispatcher.donation_confirmed(&outcome).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "request": outcome.request,
            "fulfillment": outcome.fulfillment,
            "total_units": outcome.total_units,
        }
    })))
}

/// PUT /api/blood-requests/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request = state
        .request_service
        .update_status(&auth, id, payload.status)
        .await?;

    state.dispatcher.request_updated(&request).await;

    Ok(Json(serde_json::json!({ "success": true, "data": request })))
}

/// POST /api/blood-requests/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request = state.request_service.complete(&auth, id).await?;

    state.dispatcher.request_updated(&request).await;

    Ok(Json(serde_json::json!({ "success": true, "data": request })))
}
