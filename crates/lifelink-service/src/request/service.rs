//! Blood request lifecycle service.
//!
//! Enforces the state machine: `open` is the only state that accepts
//! responses and fulfillments, requesters never respond to their own
//! requests, and only the requester or an admin mutates a request.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use lifelink_core::error::AppError;
use lifelink_core::result::AppResult;
use lifelink_core::types::geo::GeoPoint;
use lifelink_core::types::pagination::{PageRequest, PageResponse};
use lifelink_database::repositories::blood_request::{
    BloodRequestRepository, FulfillmentOutcome, RequestFilter,
};
use lifelink_database::repositories::user::UserRepository;
use lifelink_entity::request::model::CreateBloodRequest;
use lifelink_entity::request::{BloodRequest, BloodRequestDetail, RequestResponse, RequestStatus};
use lifelink_entity::user::UserSummary;

use crate::context::RequestContext;

/// Manages the blood request lifecycle.
#[derive(Debug, Clone)]
pub struct BloodRequestService {
    request_repo: Arc<BloodRequestRepository>,
    user_repo: Arc<UserRepository>,
}

impl BloodRequestService {
    /// Creates a new blood request service.
    pub fn new(request_repo: Arc<BloodRequestRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self {
            request_repo,
            user_repo,
        }
    }

    /// Creates a request in the `Open` state with empty sub-collections.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        payload: CreateBloodRequest,
    ) -> AppResult<BloodRequestDetail> {
        let location = GeoPoint::new(payload.longitude, payload.latitude);
        if !location.is_valid() {
            return Err(AppError::validation(
                "location coordinates must be a valid [longitude, latitude] pair",
            ));
        }
        if payload.units_needed <= 0 {
            return Err(AppError::validation("units_needed must be a positive integer"));
        }

        let requester = self
            .user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Requester not found"))?;

        let request = self.request_repo.create(ctx.user_id, &payload).await?;

        info!(
            request_id = %request.id,
            requester = %ctx.username,
            blood_group = %request.blood_group,
            urgency = %request.urgency,
            "Blood request created"
        );

        Ok(BloodRequestDetail {
            request,
            requester: UserSummary::from(&requester),
            responses: Vec::new(),
            fulfillments: Vec::new(),
        })
    }

    /// Lists requests matching the filter, paginated.
    pub async fn list(
        &self,
        filter: &RequestFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BloodRequest>> {
        self.request_repo.list(filter, page).await
    }

    /// Loads one request with its populated sub-collections.
    pub async fn get(&self, request_id: Uuid) -> AppResult<BloodRequestDetail> {
        self.request_repo
            .find_detail(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Blood request not found"))
    }

    /// Records a donor response.
    ///
    /// Rejects self-responses, responses to non-open requests, and
    /// duplicates. The duplicate pre-check only shapes the error message;
    /// the unique index is what actually guards concurrent responders.
    pub async fn respond(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        message: Option<String>,
        can_donate: bool,
    ) -> AppResult<(BloodRequest, RequestResponse)> {
        let request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Blood request not found"))?;

        if request.requester_id == ctx.user_id {
            return Err(AppError::validation(
                "You cannot respond to your own blood request",
            ));
        }
        if request.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "This request is {} and no longer accepts responses",
                request.status
            )));
        }
        if self.request_repo.has_responded(request_id, ctx.user_id).await? {
            return Err(AppError::conflict(
                "You have already responded to this request",
            ));
        }

        let response = self
            .request_repo
            .insert_response(request_id, ctx.user_id, message.as_deref(), can_donate)
            .await?;

        info!(
            request_id = %request_id,
            donor = %ctx.username,
            can_donate,
            "Donor response recorded"
        );

        Ok((request, response))
    }

    /// Records a fulfillment. Requester or admin only.
    pub async fn fulfill(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        donor_id: Uuid,
        units_provided: i32,
    ) -> AppResult<FulfillmentOutcome> {
        if units_provided <= 0 {
            return Err(AppError::validation(
                "units_provided must be a positive integer",
            ));
        }

        let request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Blood request not found"))?;

        self.authorize_mutation(ctx, &request)?;

        let outcome = self
            .request_repo
            .fulfill(request_id, donor_id, units_provided)
            .await?;

        info!(
            request_id = %request_id,
            donor_id = %donor_id,
            units_provided,
            total_units = outcome.total_units,
            status = %outcome.request.status,
            "Fulfillment recorded"
        );

        Ok(outcome)
    }

    /// Sets the request status. Requester or admin only; terminal states
    /// are frozen.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<BloodRequest> {
        let request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Blood request not found"))?;

        self.authorize_mutation(ctx, &request)?;

        if request.status.is_terminal() && status != request.status {
            return Err(AppError::invalid_state(format!(
                "Cannot change status of a {} request",
                request.status
            )));
        }

        self.request_repo.update_status(request_id, status).await
    }

    /// Marks the request fulfilled regardless of units provided.
    /// Requester or admin only.
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> AppResult<BloodRequest> {
        let request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Blood request not found"))?;

        self.authorize_mutation(ctx, &request)?;

        if request.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "This request is already {}",
                request.status
            )));
        }

        self.request_repo
            .update_status(request_id, RequestStatus::Fulfilled)
            .await
    }

    /// Only the requester or an admin may mutate a request.
    fn authorize_mutation(&self, ctx: &RequestContext, request: &BloodRequest) -> AppResult<()> {
        if request.requester_id == ctx.user_id || ctx.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Only the requester or an admin may modify this request",
            ))
        }
    }
}
