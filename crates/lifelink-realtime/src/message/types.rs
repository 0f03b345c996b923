//! Inbound and outbound WebSocket message type definitions.
//!
//! Outbound event names are the fixed wire vocabulary consumed by
//! clients (`newBloodRequest`, `nearbyBloodRequest`, ...); payload field
//! names follow the same snake_case schema as the REST responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lifelink_entity::notification::Notification;
use lifelink_entity::request::{BloodRequest, BloodRequestDetail, RequestResponse};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join the caller's private channel. Sessions subscribe explicitly
    /// after connecting; nothing is automatic.
    Join,
    /// Leave the private channel without disconnecting.
    Leave,
    /// Client keepalive.
    Ping,
}

/// Events pushed by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A request was created. Broadcast to every connection.
    NewBloodRequest {
        /// The created request with populated requester.
        request: BloodRequestDetail,
    },
    /// A request was created near the recipient. Sent to matched donors'
    /// private channels.
    NearbyBloodRequest {
        /// The created request with populated requester.
        request: BloodRequestDetail,
        /// Distance from the donor's registered location in kilometers.
        distance_km: f64,
    },
    /// A donor responded. Sent to the requester's private channel.
    NewResponse {
        /// The request that was responded to.
        request_id: Uuid,
        /// The recorded response.
        response: RequestResponse,
    },
    /// A durable notification record was created for the recipient.
    NewNotification {
        /// The stored notification.
        notification: Notification,
    },
    /// A request's status or contents changed.
    BloodRequestUpdated {
        /// The updated request row.
        request: BloodRequest,
    },
    /// A donation by the recipient was confirmed by the requester.
    DonationConfirmed {
        /// The fulfilled request.
        request_id: Uuid,
        /// Units credited to the donor.
        units_provided: i32,
        /// The donor's new donation count.
        donation_count: i32,
        /// The donor's recomputed badge set.
        badges: Vec<String>,
    },
    /// Heartbeat reply.
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_names_are_camel_case() {
        let event = ServerEvent::DonationConfirmed {
            request_id: Uuid::new_v4(),
            units_provided: 2,
            donation_count: 5,
            badges: vec!["First Drop".into(), "Life Saver".into()],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "donationConfirmed");
        assert_eq!(json["units_provided"], 2);
    }

    #[test]
    fn test_client_message_parses() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"join"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Join));
    }
}
