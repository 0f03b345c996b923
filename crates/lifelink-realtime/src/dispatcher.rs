//! Event dispatcher — routes blood request events to per-user channels
//! and writes the durable notification record before each emit.
//!
//! Both notification paths persist a row first and then push; socket
//! delivery failures are logged and never surfaced to the HTTP caller.

use std::sync::Arc;

use tracing::{error, info};

use lifelink_database::repositories::blood_request::FulfillmentOutcome;
use lifelink_entity::notification::NotificationEvent;
use lifelink_entity::request::{BloodRequest, BloodRequestDetail, RequestResponse};
use lifelink_service::matching::MatchedDonor;
use lifelink_service::notification::NotificationService;

use crate::connection::ConnectionRegistry;
use crate::message::types::ServerEvent;

/// Fans blood request events out to connected clients.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    connections: Arc<ConnectionRegistry>,
    notifications: Arc<NotificationService>,
}

impl EventDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        connections: Arc<ConnectionRegistry>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            connections,
            notifications,
        }
    }

    /// Fan-out on request creation.
    ///
    /// Broadcasts `newBloodRequest` to every connection, then per matched
    /// donor persists a notification row and pushes `nearbyBloodRequest`
    /// and `newNotification` to the donor's private channel.
    pub async fn request_created(&self, detail: &BloodRequestDetail, matches: &[MatchedDonor]) {
        self.connections
            .broadcast(&ServerEvent::NewBloodRequest {
                request: detail.clone(),
            })
            .await;

        let request = &detail.request;
        for matched in matches {
            let message = format!(
                "{} needs {} unit(s) of {} blood {:.1} km from you",
                request.patient_name, request.units_needed, request.blood_group, matched.distance_km
            );

            match self
                .notifications
                .record(
                    matched.donor.id,
                    request.requester_id,
                    request.id,
                    NotificationEvent::NearbyRequest,
                    &message,
                )
                .await
            {
                Ok(notification) => {
                    self.connections
                        .send_to_user(
                            matched.donor.id,
                            &ServerEvent::NewNotification { notification },
                        )
                        .await;
                }
                Err(e) => {
                    error!(
                        donor_id = %matched.donor.id,
                        request_id = %request.id,
                        error = %e,
                        "Failed to persist nearby-request notification"
                    );
                }
            }

            self.connections
                .send_to_user(
                    matched.donor.id,
                    &ServerEvent::NearbyBloodRequest {
                        request: detail.clone(),
                        distance_km: matched.distance_km,
                    },
                )
                .await;
        }

        info!(
            request_id = %request.id,
            matches = matches.len(),
            "Request creation fan-out complete"
        );
    }

    /// Push on donor response: persist the notification, then emit
    /// `newResponse` and `newNotification` to the requester's channel.
    pub async fn response_received(
        &self,
        request: &BloodRequest,
        response: &RequestResponse,
        responder_name: &str,
    ) {
        let message = if response.can_donate {
            format!("{responder_name} can donate for '{}'", request.patient_name)
        } else {
            format!("{responder_name} responded to '{}'", request.patient_name)
        };

        match self
            .notifications
            .record(
                request.requester_id,
                response.donor_id,
                request.id,
                NotificationEvent::DonorResponse,
                &message,
            )
            .await
        {
            Ok(notification) => {
                self.connections
                    .send_to_user(
                        request.requester_id,
                        &ServerEvent::NewNotification { notification },
                    )
                    .await;
            }
            Err(e) => {
                error!(
                    request_id = %request.id,
                    error = %e,
                    "Failed to persist donor-response notification"
                );
            }
        }

        self.connections
            .send_to_user(
                request.requester_id,
                &ServerEvent::NewResponse {
                    request_id: request.id,
                    response: response.clone(),
                },
            )
            .await;
    }

    /// Broadcast a status or content change.
    pub async fn request_updated(&self, request: &BloodRequest) {
        self.connections
            .broadcast(&ServerEvent::BloodRequestUpdated {
                request: request.clone(),
            })
            .await;
    }

    /// Push after a recorded fulfillment: the donor gets a persisted
    /// notification and a `donationConfirmed` event; everyone sees the
    /// request update once the status flips.
    pub async fn donation_confirmed(&self, outcome: &FulfillmentOutcome) {
        let message = format!(
            "Your donation of {} unit(s) for '{}' was confirmed",
            outcome.fulfillment.units_provided, outcome.request.patient_name
        );

        match self
            .notifications
            .record(
                outcome.donor.id,
                outcome.request.requester_id,
                outcome.request.id,
                NotificationEvent::DonationConfirmed,
                &message,
            )
            .await
        {
            Ok(notification) => {
                self.connections
                    .send_to_user(outcome.donor.id, &ServerEvent::NewNotification { notification })
                    .await;
            }
            Err(e) => {
                error!(
                    donor_id = %outcome.donor.id,
                    request_id = %outcome.request.id,
                    error = %e,
                    "Failed to persist donation-confirmed notification"
                );
            }
        }

        self.connections
            .send_to_user(
                outcome.donor.id,
                &ServerEvent::DonationConfirmed {
                    request_id: outcome.request.id,
                    units_provided: outcome.fulfillment.units_provided,
                    donation_count: outcome.donor.donation_count,
                    badges: outcome.donor.badges.clone(),
                },
            )
            .await;

        if outcome.request.status.is_terminal() {
            self.request_updated(&outcome.request).await;
        }
    }
}
