use crate::domain::invoice::{Invoice, InvoiceId};
use crate::domain::payment::{Amount, Currency, PaymentIntentRequest};
use crate::domain::ports::{InvoiceStoreBox, PaymentGatewayBox};
use crate::error::{PaymentError, Result};
use serde_json::{Map, Value};
use tracing::{info, instrument};
use uuid::Uuid;

/// Creates invoices and payment intents, and records completed payments.
///
/// Holds no state of its own besides the injected gateway and store; every
/// call is a single pass-through to one of them.
pub struct PaymentService {
    gateway: PaymentGatewayBox,
    invoice_store: InvoiceStoreBox,
    currency: Currency,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - Where payment intents are created.
    /// * `invoice_store` - Where invoices are created, read and marked paid.
    /// * `currency` - The fixed currency every intent is denominated in.
    pub fn new(
        gateway: PaymentGatewayBox,
        invoice_store: InvoiceStoreBox,
        currency: Currency,
    ) -> Self {
        Self {
            gateway,
            invoice_store,
            currency,
        }
    }

    /// Opens an unpaid invoice for `total_price` and returns its new id.
    ///
    /// `details` (booking dates, property, user) is stored as given.
    #[instrument(skip_all, fields(total_price = total_price.value()))]
    pub async fn create_invoice(
        &self,
        total_price: Amount,
        details: Map<String, Value>,
    ) -> Result<InvoiceId> {
        let id = InvoiceId::parse(Uuid::new_v4().simple().to_string())?;
        let mut invoice = Invoice::new(id.clone());
        invoice.details = details;
        invoice
            .details
            .insert("totalPrice".to_string(), Value::from(total_price.value()));

        self.invoice_store.create(invoice).await?;

        info!(invoice_id = %id, "Created invoice");
        Ok(id)
    }

    /// Asks the gateway for a payment intent tagged with `invoice_id` and
    /// returns its client secret.
    ///
    /// No idempotency key is sent, so repeated calls for the same invoice
    /// create unrelated intents.
    #[instrument(skip_all, fields(amount = amount.value(), invoice_id = %invoice_id))]
    pub async fn create_payment_intent(
        &self,
        amount: Amount,
        invoice_id: InvoiceId,
    ) -> Result<String> {
        let request = PaymentIntentRequest {
            amount,
            currency: self.currency.clone(),
            invoice_id,
        };
        let intent = self.gateway.create_payment_intent(request).await?;

        if intent.client_secret.is_empty() {
            return Err(PaymentError::upstream(
                "payment gateway",
                "payment intent returned without a client secret",
            ));
        }

        info!(payment_intent_id = %intent.id, "Created payment intent");
        Ok(intent.client_secret)
    }

    /// Marks `invoice_id` as paid by `payment_intent_id`.
    ///
    /// The caller's word is taken for it: the intent is not checked against
    /// the gateway, nor is its amount compared with the invoice.
    #[instrument(skip_all, fields(invoice_id = %invoice_id))]
    pub async fn update_payment_status(
        &self,
        invoice_id: &InvoiceId,
        payment_intent_id: &str,
    ) -> Result<()> {
        if payment_intent_id.trim().is_empty() {
            return Err(PaymentError::ValidationError(
                "Payment intent id must not be empty".to_string(),
            ));
        }

        self.invoice_store
            .mark_paid(invoice_id, payment_intent_id)
            .await?;

        info!(payment_intent_id, "Invoice marked paid");
        Ok(())
    }

    pub async fn get_invoice(&self, invoice_id: &InvoiceId) -> Result<Invoice> {
        self.invoice_store
            .get(invoice_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound(format!("invoice {invoice_id}")))
    }
}
