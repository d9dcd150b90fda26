use crate::domain::invoice::InvoiceId;
use crate::error::PaymentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A positive charge amount in the minor unit of its currency.
///
/// Zero-decimal currencies such as JPY use the whole amount directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, PaymentError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = PaymentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Lowercase ISO 4217 code, the form the gateway expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Result<Self, PaymentError> {
        let code = code.trim().to_ascii_lowercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_lowercase()) {
            Ok(Self(code))
        } else {
            Err(PaymentError::ValidationError(format!(
                "Invalid currency code: {code:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self("jpy".to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What we ask the gateway for. The invoice id travels as intent metadata so
/// the charge can be correlated back to the invoice on the gateway side.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentRequest {
    pub amount: Amount,
    pub currency: Currency,
    pub invoice_id: InvoiceId,
}

/// The slice of a gateway payment intent this service relays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(1).is_ok());
        assert!(matches!(
            Amount::new(0),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(-5000),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_amount_deserialization_rejects_non_positive() {
        let amount: Amount = serde_json::from_str("5000").unwrap();
        assert_eq!(amount.value(), 5000);
        assert!(serde_json::from_str::<Amount>("0").is_err());
        assert!(serde_json::from_str::<Amount>("-1").is_err());
    }

    #[test]
    fn test_currency_normalizes_case() {
        assert_eq!(Currency::new("JPY").unwrap().as_str(), "jpy");
        assert_eq!(Currency::default().as_str(), "jpy");
        assert!(Currency::new("yen!").is_err());
        assert!(Currency::new("").is_err());
    }
}
