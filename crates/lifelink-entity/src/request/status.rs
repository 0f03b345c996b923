//! Blood request lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a blood request.
///
/// The single canonical enum for the request lifecycle; nothing else is
/// ever persisted or compared. `Open` is the only state that accepts
/// responses and fulfillments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Accepting responses and fulfillments.
    Open,
    /// Enough units were provided, or the requester marked it complete.
    Fulfilled,
    /// Withdrawn by the requester or an admin.
    Cancelled,
}

impl RequestStatus {
    /// Whether this state accepts further responses or fulfillments.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = lifelink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "fulfilled" => Ok(Self::Fulfilled),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(lifelink_core::AppError::validation(format!(
                "Invalid request status: '{s}'. Expected one of: open, fulfilled, cancelled"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_accepts_activity() {
        assert!(RequestStatus::Open.is_open());
        assert!(!RequestStatus::Fulfilled.is_open());
        assert!(RequestStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "Fulfilled".parse::<RequestStatus>().unwrap(),
            RequestStatus::Fulfilled
        );
        assert!("active".parse::<RequestStatus>().is_err());
    }
}
