//! Geo-proximity donor matching.

pub mod service;

pub use service::{MatchedDonor, MatchingService};
