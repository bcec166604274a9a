//! # carmarket
//!
//! Client SDK for the vehicle-listing marketplace API.
//!
//! The crate owns the two pieces every screen of the marketplace depends on:
//! the session store (who is signed in, with which roles) and the
//! authenticated gateway every outbound call goes through. Typed request
//! functions per resource, catalog selection state, route guards and form
//! validation sit on top of those two.

pub mod config;
pub mod net;
pub mod state;
pub mod util;
