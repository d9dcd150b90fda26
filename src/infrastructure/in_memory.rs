use crate::domain::identity::{Session, User};
use crate::domain::invoice::{Invoice, InvoiceId};
use crate::domain::payment::{PaymentIntent, PaymentIntentRequest};
use crate::domain::ports::{IdentityProvider, InvoiceStore, PaymentGateway};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for invoices.
///
/// Uses `Arc<RwLock<HashMap<InvoiceId, Invoice>>>` so clones share the same
/// records. Used for local development and tests.
#[derive(Default, Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<InvoiceId, Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Creates a new, empty in-memory invoice store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an invoice as-is, overwriting any previous one.
    pub async fn insert(&self, invoice: Invoice) {
        let mut invoices = self.invoices.write().await;
        invoices.insert(invoice.id.clone(), invoice);
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn create(&self, mut invoice: Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        if invoices.contains_key(&invoice.id) {
            return Err(PaymentError::InternalError(
                format!("invoice {} already exists", invoice.id).into(),
            ));
        }
        invoice.created_at = Some(Utc::now());
        invoices.insert(invoice.id.clone(), invoice);
        Ok(())
    }

    async fn mark_paid(&self, id: &InvoiceId, payment_intent_id: &str) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        let invoice = invoices
            .get_mut(id)
            .ok_or_else(|| PaymentError::NotFound(format!("invoice {id}")))?;
        invoice.mark_paid(payment_intent_id, Utc::now());
        Ok(())
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.get(id).cloned())
    }
}

/// A gateway stand-in that mints Stripe-shaped ids locally.
///
/// Every request is recorded so tests can inspect what would have been sent.
#[derive(Default, Clone)]
pub struct InMemoryPaymentGateway {
    requests: Arc<RwLock<Vec<PaymentIntentRequest>>>,
    fail: bool,
}

impl InMemoryPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that rejects every request.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn requests(&self) -> Vec<PaymentIntentRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_payment_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent> {
        if self.fail {
            return Err(PaymentError::upstream(
                "payment gateway",
                "gateway unavailable",
            ));
        }

        let id = format!("pi_{}", Uuid::new_v4().simple());
        let client_secret = format!("{id}_secret_{}", Uuid::new_v4().simple());
        self.requests.write().await.push(request);

        Ok(PaymentIntent { id, client_secret })
    }
}

/// Resolves sessions from a fixed token table.
#[derive(Default, Clone)]
pub struct StaticIdentityProvider {
    users: Arc<RwLock<HashMap<String, User>>>,
    lookups: Arc<AtomicUsize>,
    fail: bool,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every lookup fails, as if the service were down.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Registers `claims` (a user object) under `token`.
    pub async fn add_user(&self, token: &str, claims: Value) -> Result<()> {
        let user: User = serde_json::from_value(claims)?;
        self.users.write().await.insert(token.to_string(), user);
        Ok(())
    }

    /// Number of session lookups served so far.
    pub async fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve_session(&self, token: &str) -> Result<Option<Session>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PaymentError::upstream(
                "identity service",
                "identity service unavailable",
            ));
        }

        let users = self.users.read().await;
        Ok(users.get(token).cloned().map(Session::new))
    }
}
