//! Process-level setup: configuration, logging, and wiring adapters into
//! the HTTP state.

pub mod config;
pub mod logging;

use crate::application::admin::AdminCheck;
use crate::application::payments::PaymentService;
use crate::domain::payment::Currency;
use crate::domain::ports::{IdentityProviderBox, InvoiceStoreBox, PaymentGatewayBox};
use crate::error::{PaymentError, Result};
use crate::infrastructure::auth0::Auth0IdentityProvider;
use crate::infrastructure::firestore::FirestoreInvoiceStore;
use crate::infrastructure::in_memory::{
    InMemoryInvoiceStore, InMemoryPaymentGateway, StaticIdentityProvider,
};
use crate::infrastructure::stripe::StripeGateway;
use crate::interfaces::http::AppState;
use self::config::{Config, StoreBackend};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Builds every client from `config` and hands them to the services.
pub fn build_state(config: &Config) -> Result<AppState> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()
        .map_err(|e| PaymentError::InternalError(Box::new(e)))?;

    let currency = Currency::new(&config.currency)?;

    let gateway: PaymentGatewayBox = match &config.stripe_secret_key {
        Some(key) => Box::new(StripeGateway::new(
            client.clone(),
            config.stripe_base_url.clone(),
            key.clone(),
        )),
        None => {
            warn!("No payment gateway key configured; payment intents are simulated locally");
            Box::new(InMemoryPaymentGateway::new())
        }
    };

    let invoice_store = build_invoice_store(config, &client)?;

    let identity: IdentityProviderBox = match &config.auth0_issuer_base_url {
        Some(issuer) => Box::new(Auth0IdentityProvider::new(client.clone(), issuer.clone())),
        None => {
            warn!("No identity service configured; every session lookup is rejected");
            Box::new(StaticIdentityProvider::new())
        }
    };

    info!(currency = %currency, store = ?config.store, "Services configured");

    Ok(AppState::new(
        PaymentService::new(gateway, invoice_store, currency),
        AdminCheck::new(identity, config.roles_claim.clone()),
    ))
}

fn build_invoice_store(config: &Config, client: &reqwest::Client) -> Result<InvoiceStoreBox> {
    match config.store {
        StoreBackend::Memory => Ok(Box::new(InMemoryInvoiceStore::new())),
        StoreBackend::Rocksdb => open_rocksdb(&config.db_path),
        StoreBackend::Firestore => {
            let project_id = config.firestore_project_id.clone().ok_or_else(|| {
                PaymentError::ValidationError(
                    "Firestore store selected but no project id configured".to_string(),
                )
            })?;
            Ok(Box::new(FirestoreInvoiceStore::new(
                client.clone(),
                config.firestore_base_url.clone(),
                project_id,
                config.invoice_collection.clone(),
                config.firestore_access_token.clone(),
            )))
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_rocksdb(path: &Path) -> Result<InvoiceStoreBox> {
    let store = crate::infrastructure::rocksdb::RocksDBStore::open(path)?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_rocksdb(path: &Path) -> Result<InvoiceStoreBox> {
    warn!(
        path = %path.display(),
        "Persistent storage requested, but 'storage-rocksdb' feature is not enabled. \
         Falling back to In-Memory storage."
    );
    Ok(Box::new(InMemoryInvoiceStore::new()))
}
