//! User domain entities.

pub mod badge;
pub mod blood_group;
pub mod model;
pub mod role;

pub use badge::Badge;
pub use blood_group::BloodGroup;
pub use model::{User, UserSummary};
pub use role::UserRole;
