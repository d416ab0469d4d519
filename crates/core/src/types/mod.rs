//! Core types for Verdura.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod delivery;
pub mod id;
pub mod role;
pub mod user;

pub use delivery::{DeliveryQuote, DeliverySettings};
pub use id::UserId;
pub use role::{Role, RoleParseError};
pub use user::EdgeUser;
