//! Shared helpers for screens built on the SDK.
//!
//! SYSTEM CONTEXT
//! ==============
//! `guard` centralizes redirect and navigation decisions, `validate` holds
//! form rules, `listing` holds filter and image-ordering helpers.

pub mod guard;
pub mod listing;
pub mod validate;
