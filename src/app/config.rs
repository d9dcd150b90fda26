use crate::domain::identity::DEFAULT_ROLES_CLAIM;
use crate::infrastructure::firestore::{DEFAULT_FIRESTORE_BASE_URL, DEFAULT_INVOICE_COLLECTION};
use crate::infrastructure::stripe::DEFAULT_STRIPE_BASE_URL;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Process-local map; lost on restart.
    Memory,
    /// Embedded RocksDB at `--db-path` (needs the `storage-rocksdb` feature).
    Rocksdb,
    /// Remote Firestore database.
    Firestore,
}

/// Invoice payment service.
///
/// Every option can also be set through the environment variable shown.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3001")]
    pub listen_addr: SocketAddr,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Payment gateway secret key. Without it intents are simulated locally.
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: Option<String>,

    #[arg(long, env = "STRIPE_BASE_URL", default_value = DEFAULT_STRIPE_BASE_URL)]
    pub stripe_base_url: String,

    /// Currency every payment intent is denominated in
    #[arg(long, env = "PAYMENT_CURRENCY", default_value = "jpy")]
    pub currency: String,

    #[arg(long, env = "INVOICE_STORE", value_enum, default_value = "memory")]
    pub store: StoreBackend,

    /// Path to the RocksDB directory when `--store rocksdb`
    #[arg(long, env = "INVOICE_DB_PATH", default_value = "invoices.db")]
    pub db_path: PathBuf,

    #[arg(long, env = "FIRESTORE_PROJECT_ID")]
    pub firestore_project_id: Option<String>,

    /// OAuth access token for Firestore; omit for the emulator
    #[arg(long, env = "FIRESTORE_ACCESS_TOKEN", hide_env_values = true)]
    pub firestore_access_token: Option<String>,

    #[arg(long, env = "FIRESTORE_BASE_URL", default_value = DEFAULT_FIRESTORE_BASE_URL)]
    pub firestore_base_url: String,

    #[arg(long, env = "INVOICE_COLLECTION", default_value = DEFAULT_INVOICE_COLLECTION)]
    pub invoice_collection: String,

    /// Identity service issuer, e.g. https://tenant.auth0.com
    #[arg(long, env = "AUTH0_ISSUER_BASE_URL")]
    pub auth0_issuer_base_url: Option<String>,

    /// Custom claim holding the user's role list
    #[arg(long, env = "ROLES_CLAIM", default_value = DEFAULT_ROLES_CLAIM)]
    pub roles_claim: String,

    /// Per-request timeout for upstream calls, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,
}
