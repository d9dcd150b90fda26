use crate::domain::payment::{PaymentIntent, PaymentIntentRequest};
use crate::domain::ports::PaymentGateway;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

pub const DEFAULT_STRIPE_BASE_URL: &str = "https://api.stripe.com";
pub const STRIPE_API_VERSION: &str = "2024-06-20";

const SERVICE: &str = "payment gateway";

/// Payment gateway backed by the Stripe REST API.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    base_url: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    code: Option<String>,
}

impl StripeGateway {
    pub fn new(client: Client, base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    /// Form fields for `POST /v1/payment_intents`.
    fn form_fields(request: &PaymentIntentRequest) -> Vec<(&'static str, String)> {
        vec![
            ("amount", request.amount.value().to_string()),
            ("currency", request.currency.as_str().to_string()),
            ("metadata[invoiceId]", request.invoice_id.as_str().to_string()),
        ]
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        debug!(%url, invoice_id = %request.invoice_id, "Creating payment intent");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .form(&Self::form_fields(&request))
            .send()
            .await
            .map_err(|e| PaymentError::upstream(SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<StripeErrorBody>(&body) {
                Ok(StripeErrorBody { error }) => format!(
                    "{} ({})",
                    error.message.unwrap_or_else(|| status.to_string()),
                    error.code.unwrap_or_else(|| "no code".to_string())
                ),
                Err(_) => format!("HTTP {status}"),
            };
            error!(%status, %message, "Payment intent creation rejected");
            return Err(PaymentError::upstream(SERVICE, message));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError::upstream(SERVICE, format!("unreadable response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::InvoiceId;
    use crate::domain::payment::{Amount, Currency};
    use crate::infrastructure::test_server::FakeServer;
    use reqwest::StatusCode;
    use serde_json::json;

    fn request() -> PaymentIntentRequest {
        PaymentIntentRequest {
            amount: Amount::new(5000).unwrap(),
            currency: Currency::default(),
            invoice_id: InvoiceId::parse("inv_1").unwrap(),
        }
    }

    #[test]
    fn test_form_fields_carry_invoice_metadata() {
        let request = PaymentIntentRequest {
            amount: Amount::new(5000).unwrap(),
            currency: Currency::default(),
            invoice_id: InvoiceId::parse("inv_1").unwrap(),
        };

        let fields = StripeGateway::form_fields(&request);

        assert_eq!(
            fields,
            vec![
                ("amount", "5000".to_string()),
                ("currency", "jpy".to_string()),
                ("metadata[invoiceId]", "inv_1".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway = StripeGateway::new(Client::new(), "http://localhost:12111/", "sk_test");
        assert_eq!(gateway.base_url, "http://localhost:12111");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_upstream_error() {
        let gateway = StripeGateway::new(Client::new(), "http://127.0.0.1:1", "sk_test");
        let result = gateway.create_payment_intent(request()).await;

        assert!(matches!(result, Err(PaymentError::UpstreamError { .. })));
    }

    #[tokio::test]
    async fn test_create_payment_intent_posts_form() {
        let server = FakeServer::respond_with(
            StatusCode::OK,
            json!({
                "id": "pi_123",
                "object": "payment_intent",
                "client_secret": "pi_123_secret_456",
                "status": "requires_payment_method"
            }),
        )
        .await;
        let gateway = StripeGateway::new(Client::new(), &server.base_url, "sk_test_abc");

        let intent = gateway.create_payment_intent(request()).await.unwrap();

        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.client_secret, "pi_123_secret_456");

        let requests = server.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/v1/payment_intents");
        assert_eq!(requests[0].header("authorization"), Some("Bearer sk_test_abc"));
        assert_eq!(requests[0].header("stripe-version"), Some(STRIPE_API_VERSION));
        assert!(requests[0].body.contains("amount=5000"));
        assert!(requests[0].body.contains("currency=jpy"));
        assert!(requests[0].body.contains("metadata%5BinvoiceId%5D=inv_1"));
    }

    #[tokio::test]
    async fn test_declined_card_message_and_code_surface() {
        let server = FakeServer::respond_with(
            StatusCode::PAYMENT_REQUIRED,
            json!({
                "error": {
                    "type": "card_error",
                    "code": "card_declined",
                    "message": "Your card was declined."
                }
            }),
        )
        .await;
        let gateway = StripeGateway::new(Client::new(), &server.base_url, "sk_test_abc");

        let result = gateway.create_payment_intent(request()).await;

        match result {
            Err(PaymentError::UpstreamError { service, message }) => {
                assert_eq!(service, SERVICE);
                assert_eq!(message, "Your card was declined. (card_declined)");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_reports_status() {
        let server =
            FakeServer::respond_with(StatusCode::SERVICE_UNAVAILABLE, json!("maintenance")).await;
        let gateway = StripeGateway::new(Client::new(), &server.base_url, "sk_test_abc");

        let result = gateway.create_payment_intent(request()).await;

        match result {
            Err(PaymentError::UpstreamError { message, .. }) => {
                assert_eq!(message, "HTTP 503 Service Unavailable");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
