//! Adapters for the ports in `domain::ports`.

pub mod auth0;
pub mod firestore;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod stripe;
#[cfg(test)]
mod test_server;
