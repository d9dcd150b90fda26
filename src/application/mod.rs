//! Application layer: the request-scoped operations behind each route.
//!
//! Services own their collaborators as trait objects so the HTTP layer and
//! tests can plug in any adapter.

pub mod admin;
pub mod payments;
