//! Blood group enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight ABO/Rh blood groups.
///
/// Wire and database representation is the conventional short form
/// (`"A+"`, `"O-"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blood_group")]
pub enum BloodGroup {
    /// A positive.
    #[serde(rename = "A+")]
    #[sqlx(rename = "A+")]
    APositive,
    /// A negative.
    #[serde(rename = "A-")]
    #[sqlx(rename = "A-")]
    ANegative,
    /// B positive.
    #[serde(rename = "B+")]
    #[sqlx(rename = "B+")]
    BPositive,
    /// B negative.
    #[serde(rename = "B-")]
    #[sqlx(rename = "B-")]
    BNegative,
    /// AB positive.
    #[serde(rename = "AB+")]
    #[sqlx(rename = "AB+")]
    AbPositive,
    /// AB negative.
    #[serde(rename = "AB-")]
    #[sqlx(rename = "AB-")]
    AbNegative,
    /// O positive.
    #[serde(rename = "O+")]
    #[sqlx(rename = "O+")]
    OPositive,
    /// O negative.
    #[serde(rename = "O-")]
    #[sqlx(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// All eight groups in display order.
    pub const ALL: [BloodGroup; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// Return the conventional short form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = lifelink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            _ => Err(lifelink_core::AppError::validation(format!(
                "Invalid blood group: '{s}'. Expected one of: A+, A-, B+, B-, AB+, AB-, O+, O-"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_short_form() {
        let json = serde_json::to_string(&BloodGroup::ONegative).unwrap();
        assert_eq!(json, "\"O-\"");
        let parsed: BloodGroup = serde_json::from_str("\"AB+\"").unwrap();
        assert_eq!(parsed, BloodGroup::AbPositive);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("C+".parse::<BloodGroup>().is_err());
        assert_eq!("o-".parse::<BloodGroup>().unwrap(), BloodGroup::ONegative);
    }

    #[test]
    fn test_all_has_eight_groups() {
        assert_eq!(BloodGroup::ALL.len(), 8);
    }
}
