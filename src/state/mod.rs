//! Client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern so callers depend on small focused models:
//! `auth` (session store), `storage` (durable key-value store), `catalog`
//! (cascading selection) and `sequence` (stale-response guard).

pub mod auth;
pub mod catalog;
pub mod sequence;
pub mod storage;
