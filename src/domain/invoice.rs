use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier of an invoice document.
///
/// Must be non-empty and free of `/`, since it is used verbatim as a
/// document path segment by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceId(String);

impl InvoiceId {
    pub fn parse(value: impl Into<String>) -> Result<Self, PaymentError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PaymentError::ValidationError(
                "Invoice id must not be empty".to_string(),
            ));
        }
        if value.contains('/') {
            return Err(PaymentError::ValidationError(
                "Invoice id must not contain '/'".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InvoiceId {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<InvoiceId> for String {
    fn from(id: InvoiceId) -> Self {
        id.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment state of an invoice.
///
/// Only `Unpaid` and `Paid` drive behavior. Records written by the booking
/// pages use Japanese labels, which map onto the same two states; any other
/// label (an expiry, say) is kept verbatim so reads never fail on it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
    Other(String),
}

impl From<String> for InvoiceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "unpaid" | "pending" | "未払い" => Self::Unpaid,
            "paid" | "支払済" => Self::Paid,
            _ => Self::Other(value),
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Unpaid => "unpaid".to_string(),
            InvoiceStatus::Paid => "paid".to_string(),
            InvoiceStatus::Other(label) => label,
        }
    }
}

/// An invoice record as held by the document store.
///
/// Only the payment fields are modeled; anything else the store holds
/// (customer, dates, totals) is carried in `details` untouched.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Invoice {
    pub fn new(id: InvoiceId) -> Self {
        Self {
            id,
            status: InvoiceStatus::Unpaid,
            payment_intent_id: None,
            paid_at: None,
            created_at: None,
            details: Map::new(),
        }
    }

    /// Records a payment. Unconditional: a second call overwrites the intent
    /// id and timestamp of the first.
    pub fn mark_paid(&mut self, payment_intent_id: &str, paid_at: DateTime<Utc>) {
        self.status = InvoiceStatus::Paid;
        self.payment_intent_id = Some(payment_intent_id.to_string());
        self.paid_at = Some(paid_at);
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}
