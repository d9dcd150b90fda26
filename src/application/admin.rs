use crate::domain::ports::IdentityProviderBox;
use crate::error::{PaymentError, Result};
use tracing::debug;

/// Answers whether the caller behind a bearer token holds the admin role.
pub struct AdminCheck {
    identity: IdentityProviderBox,
    roles_claim: String,
}

impl AdminCheck {
    pub fn new(identity: IdentityProviderBox, roles_claim: impl Into<String>) -> Self {
        Self {
            identity,
            roles_claim: roles_claim.into(),
        }
    }

    /// Resolves the session on every call; nothing is cached.
    ///
    /// A missing token or one the identity service rejects is
    /// `Unauthenticated`, and roles are never looked at in that case.
    pub async fn is_admin(&self, bearer_token: Option<&str>) -> Result<bool> {
        let token = match bearer_token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(PaymentError::Unauthenticated),
        };

        let session = self
            .identity
            .resolve_session(token)
            .await?
            .ok_or(PaymentError::Unauthenticated)?;

        let is_admin = session.is_admin(&self.roles_claim);
        debug!(sub = ?session.user.sub, is_admin, "Resolved admin check");
        Ok(is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::DEFAULT_ROLES_CLAIM;
    use crate::infrastructure::in_memory::StaticIdentityProvider;
    use serde_json::json;

    fn check(provider: StaticIdentityProvider) -> AdminCheck {
        AdminCheck::new(Box::new(provider), DEFAULT_ROLES_CLAIM)
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let provider = StaticIdentityProvider::new();
        let admin = check(provider.clone());

        assert!(matches!(admin.is_admin(None).await, Err(PaymentError::Unauthenticated)));
        assert!(matches!(admin.is_admin(Some("")).await, Err(PaymentError::Unauthenticated)));
        assert_eq!(provider.lookups().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthenticated() {
        let admin = check(StaticIdentityProvider::new());

        let result = admin.is_admin(Some("nope")).await;

        assert!(matches!(result, Err(PaymentError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_admin_and_non_admin_sessions() {
        let provider = StaticIdentityProvider::new();
        provider
            .add_user("admin-token", json!({ "sub": "a", DEFAULT_ROLES_CLAIM: ["admin"] }))
            .await
            .unwrap();
        provider
            .add_user("member-token", json!({ "sub": "m", DEFAULT_ROLES_CLAIM: ["member"] }))
            .await
            .unwrap();
        provider
            .add_user("bare-token", json!({ "sub": "b" }))
            .await
            .unwrap();
        let admin = check(provider);

        assert!(admin.is_admin(Some("admin-token")).await.unwrap());
        assert!(!admin.is_admin(Some("member-token")).await.unwrap());
        assert!(!admin.is_admin(Some("bare-token")).await.unwrap());
    }

    #[tokio::test]
    async fn test_every_call_resolves_session() {
        let provider = StaticIdentityProvider::new();
        provider
            .add_user("admin-token", json!({ DEFAULT_ROLES_CLAIM: ["admin"] }))
            .await
            .unwrap();
        let admin = check(provider.clone());

        admin.is_admin(Some("admin-token")).await.unwrap();
        admin.is_admin(Some("admin-token")).await.unwrap();

        assert_eq!(provider.lookups().await, 2);
    }
}
