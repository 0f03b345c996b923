//! Blood request repository implementation.
//!
//! Owns the request row plus its two sub-collections (responses,
//! fulfillments). Duplicate responses are rejected by the unique index on
//! `request_responses (request_id, donor_id)`, and `fulfill` performs all
//! of its writes inside a single transaction so the request and the donor
//! row can never disagree.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use lifelink_core::error::{AppError, ErrorKind};
use lifelink_core::result::AppResult;
use lifelink_core::types::geo::{BoundingBox, GeoPoint};
use lifelink_core::types::pagination::{PageRequest, PageResponse};
use lifelink_entity::request::model::CreateBloodRequest;
use lifelink_entity::request::{
    BloodRequest, BloodRequestDetail, Fulfillment, RequestResponse, RequestStatus, UrgencyLevel,
};
use lifelink_entity::user::{Badge, BloodGroup, User, UserSummary};

use super::user::is_unique_violation;

/// Optional filters for listing blood requests.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Restrict to a lifecycle state.
    pub status: Option<RequestStatus>,
    /// Restrict to a blood group.
    pub blood_group: Option<BloodGroup>,
    /// Restrict to an urgency level.
    pub urgency: Option<UrgencyLevel>,
    /// Restrict to requests created by this user.
    pub requester_id: Option<Uuid>,
    /// Case-insensitive substring match on patient name or address.
    pub search: Option<String>,
    /// Restrict to requests inside this box (derived from a center point
    /// and radius by the caller).
    pub bbox: Option<BoundingBox>,
}

/// Everything written by a successful fulfillment, returned together so
/// callers can emit events from consistent state.
#[derive(Debug, Clone)]
pub struct FulfillmentOutcome {
    /// The request row after status recomputation.
    pub request: BloodRequest,
    /// The donor row after the count/badge update.
    pub donor: User,
    /// The inserted fulfillment.
    pub fulfillment: Fulfillment,
    /// Cumulative units provided across all fulfillments.
    pub total_units: i64,
}

/// Repository for blood request lifecycle operations.
#[derive(Debug, Clone)]
pub struct BloodRequestRepository {
    pool: PgPool,
}

impl BloodRequestRepository {
    /// Create a new blood request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new request in the `Open` state.
    pub async fn create(
        &self,
        requester_id: Uuid,
        request: &CreateBloodRequest,
    ) -> AppResult<BloodRequest> {
        sqlx::query_as::<_, BloodRequest>(
            "INSERT INTO blood_requests \
                 (requester_id, patient_name, blood_group, urgency, units_needed, contact, latitude, longitude, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(requester_id)
        .bind(&request.patient_name)
        .bind(request.blood_group)
        .bind(request.urgency)
        .bind(request.units_needed)
        .bind(&request.contact)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(&request.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create blood request", e)
        })
    }

    /// Find a request by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BloodRequest>> {
        sqlx::query_as::<_, BloodRequest>("SELECT * FROM blood_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find blood request", e)
            })
    }

    /// Load a request with its requester summary and both sub-collections.
    pub async fn find_detail(&self, id: Uuid) -> AppResult<Option<BloodRequestDetail>> {
        let Some(request) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let requester = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, blood_group, phone FROM users WHERE id = $1",
        )
        .bind(request.requester_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load requester", e))?;

        let responses = self.list_responses(id).await?;
        let fulfillments = self.list_fulfillments(id).await?;

        Ok(Some(BloodRequestDetail {
            request,
            requester,
            responses,
            fulfillments,
        }))
    }

    /// List requests matching the filter, newest first, paginated.
    pub async fn list(
        &self,
        filter: &RequestFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BloodRequest>> {
        let mut count_query =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM blood_requests WHERE TRUE");
        push_filters(&mut count_query, filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count blood requests", e)
            })?;

        let mut list_query =
            QueryBuilder::<Postgres>::new("SELECT * FROM blood_requests WHERE TRUE");
        push_filters(&mut list_query, filter);
        list_query.push(" ORDER BY created_at DESC LIMIT ");
        list_query.push_bind(page.limit() as i64);
        list_query.push(" OFFSET ");
        list_query.push_bind(page.offset() as i64);

        let requests = list_query
            .build_query_as::<BloodRequest>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list blood requests", e)
            })?;

        Ok(PageResponse::new(
            requests,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// All responses for a request, oldest first.
    pub async fn list_responses(&self, request_id: Uuid) -> AppResult<Vec<RequestResponse>> {
        sqlx::query_as::<_, RequestResponse>(
            "SELECT * FROM request_responses WHERE request_id = $1 ORDER BY created_at ASC",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list responses", e))
    }

    /// All fulfillments for a request, oldest first.
    pub async fn list_fulfillments(&self, request_id: Uuid) -> AppResult<Vec<Fulfillment>> {
        sqlx::query_as::<_, Fulfillment>(
            "SELECT * FROM request_fulfillments WHERE request_id = $1 ORDER BY created_at ASC",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list fulfillments", e))
    }

    /// Whether the donor already has a response on record for the request.
    pub async fn has_responded(&self, request_id: Uuid, donor_id: Uuid) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM request_responses WHERE request_id = $1 AND donor_id = $2",
        )
        .bind(request_id)
        .bind(donor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check existing response", e)
        })?;
        Ok(count > 0)
    }

    /// Append a donor response.
    ///
    /// The unique index on `(request_id, donor_id)` is the authoritative
    /// duplicate guard: two concurrent responders cannot both commit.
    pub async fn insert_response(
        &self,
        request_id: Uuid,
        donor_id: Uuid,
        message: Option<&str>,
        can_donate: bool,
    ) -> AppResult<RequestResponse> {
        sqlx::query_as::<_, RequestResponse>(
            "INSERT INTO request_responses (request_id, donor_id, message, can_donate) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(request_id)
        .bind(donor_id)
        .bind(message)
        .bind(can_donate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("You have already responded to this request")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to record response", e)
            }
        })
    }

    /// Record a fulfillment and update the donor in one transaction.
    ///
    /// Locks the request and donor rows, inserts the fulfillment,
    /// increments the donor's donation count with a wholesale badge
    /// recomputation, and flips the request to `Fulfilled` once the
    /// cumulative units reach the requested amount. A failure anywhere
    /// rolls back every write.
    pub async fn fulfill(
        &self,
        request_id: Uuid,
        donor_id: Uuid,
        units_provided: i32,
    ) -> AppResult<FulfillmentOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let request = sqlx::query_as::<_, BloodRequest>(
            "SELECT * FROM blood_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock request", e))?
        .ok_or_else(|| AppError::not_found("Blood request not found"))?;

        if request.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Cannot record a fulfillment on a {} request",
                request.status
            )));
        }

        let donor =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
                .bind(donor_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock donor", e))?
                .ok_or_else(|| AppError::not_found("Donor not found"))?;

        let fulfillment = sqlx::query_as::<_, Fulfillment>(
            "INSERT INTO request_fulfillments (request_id, donor_id, units_provided) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(request_id)
        .bind(donor_id)
        .bind(units_provided)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert fulfillment", e)
        })?;

        let new_count = donor.donation_count + 1;
        let badges = Badge::names_for_donation_count(new_count);

        let donor = sqlx::query_as::<_, User>(
            "UPDATE users SET donation_count = $2, badges = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(donor_id)
        .bind(new_count)
        .bind(&badges)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update donor", e))?;

        let total_units: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(units_provided), 0) FROM request_fulfillments WHERE request_id = $1",
        )
        .bind(request_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum fulfillments", e))?;

        let request = if total_units >= request.units_needed as i64 {
            sqlx::query_as::<_, BloodRequest>(
                "UPDATE blood_requests SET status = 'fulfilled', updated_at = NOW() \
                 WHERE id = $1 RETURNING *",
            )
            .bind(request_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update request status", e)
            })?
        } else {
            request
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit fulfillment", e)
        })?;

        Ok(FulfillmentOutcome {
            request,
            donor,
            fulfillment,
            total_units,
        })
    }

    /// Set the request status directly.
    pub async fn update_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<BloodRequest> {
        sqlx::query_as::<_, BloodRequest>(
            "UPDATE blood_requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(request_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update status", e))
    }
}

/// Append the filter's predicates to a query builder.
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &RequestFilter) {
    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status);
    }
    if let Some(blood_group) = filter.blood_group {
        query.push(" AND blood_group = ");
        query.push_bind(blood_group);
    }
    if let Some(urgency) = filter.urgency {
        query.push(" AND urgency = ");
        query.push_bind(urgency);
    }
    if let Some(requester_id) = filter.requester_id {
        query.push(" AND requester_id = ");
        query.push_bind(requester_id);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query.push(" AND (patient_name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR address ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if let Some(bbox) = &filter.bbox {
        query.push(" AND latitude BETWEEN ");
        query.push_bind(bbox.min_latitude);
        query.push(" AND ");
        query.push_bind(bbox.max_latitude);
        query.push(" AND longitude BETWEEN ");
        query.push_bind(bbox.min_longitude);
        query.push(" AND ");
        query.push_bind(bbox.max_longitude);
    }
}

impl RequestFilter {
    /// Attach a geographic restriction derived from a center and radius.
    pub fn with_radius(mut self, center: GeoPoint, radius_km: f64) -> Self {
        self.bbox = Some(center.bounding_box(radius_km));
        self
    }
}
