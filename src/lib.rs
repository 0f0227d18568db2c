//! Scan a tree for images, drop same-size duplicates, move the survivors into
//! a target folder under canonical names and rewrite references to them.

pub mod config;
pub mod core;
pub mod error;

pub use config::OrganizerConfig;
pub use crate::core::organizer::{OrganizePlan, Organizer};
pub use crate::core::report::Report;
pub use error::OrganizeError;
