//! Urgency level of a blood request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How urgently the requested units are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "urgency_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    /// Routine need.
    Normal,
    /// Needed within hours.
    Urgent,
    /// Immediately life-threatening.
    Critical,
}

impl UrgencyLevel {
    /// Return the urgency as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = lifelink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "urgent" => Ok(Self::Urgent),
            "critical" => Ok(Self::Critical),
            _ => Err(lifelink_core::AppError::validation(format!(
                "Invalid urgency level: '{s}'. Expected one of: normal, urgent, critical"
            ))),
        }
    }
}
