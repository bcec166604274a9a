//! Networking modules for the marketplace REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `gateway` is the only place HTTP happens. `auth`, `listings` and
//! `catalog` hold one typed function per endpoint; `types` defines the
//! shared wire schema.

pub mod auth;
pub mod catalog;
pub mod gateway;
pub mod listings;
pub mod types;

#[cfg(test)]
pub(crate) mod fake_api;
