//! Domain types and the ports the application layer talks through.

pub mod identity;
pub mod invoice;
pub mod payment;
pub mod ports;
