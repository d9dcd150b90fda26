use super::identity::Session;
use super::invoice::{Invoice, InvoiceId};
use super::payment::{PaymentIntent, PaymentIntentRequest};
use crate::error::Result;
use async_trait::async_trait;

/// The external payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent>;
}

/// The document store owning invoice records.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Writes a new invoice with a store-generated `createdAt`. Fails if the
    /// id is already taken.
    async fn create(&self, invoice: Invoice) -> Result<()>;
    /// Sets `status = paid`, the intent id, and a store-generated `paidAt`.
    /// Fails with `NotFound` if the invoice does not exist.
    async fn mark_paid(&self, id: &InvoiceId, payment_intent_id: &str) -> Result<()>;
    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>>;
}

/// The identity service that turns a bearer token into a session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the token is not accepted.
    async fn resolve_session(&self, token: &str) -> Result<Option<Session>>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type InvoiceStoreBox = Box<dyn InvoiceStore>;
pub type IdentityProviderBox = Box<dyn IdentityProvider>;
