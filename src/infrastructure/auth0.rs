use crate::domain::identity::{Session, User};
use crate::domain::ports::IdentityProvider;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::warn;

const SERVICE: &str = "identity service";

/// Resolves sessions through an Auth0 tenant's `/userinfo` endpoint.
///
/// Custom role claims must be added to the user profile by a tenant rule or
/// action for the admin check to see them.
#[derive(Clone)]
pub struct Auth0IdentityProvider {
    client: Client,
    issuer_base_url: String,
}

impl Auth0IdentityProvider {
    pub fn new(client: Client, issuer_base_url: impl Into<String>) -> Self {
        Self {
            client,
            issuer_base_url: issuer_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for Auth0IdentityProvider {
    async fn resolve_session(&self, token: &str) -> Result<Option<Session>> {
        let url = format!("{}/userinfo", self.issuer_base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PaymentError::upstream(SERVICE, e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user: User = response
                    .json()
                    .await
                    .map_err(|e| PaymentError::upstream(SERVICE, format!("unreadable user: {e}")))?;
                Ok(Some(Session::new(user)))
            }
            status => {
                warn!(%status, "Session lookup failed");
                Err(PaymentError::upstream(SERVICE, format!("HTTP {status}")))
            }
        }
    }
}
