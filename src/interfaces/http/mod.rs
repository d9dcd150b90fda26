//! JSON-over-HTTP surface for the payment and admin operations.

pub mod error;
pub mod handlers;
pub mod router;

pub use router::{AppState, build_router};
