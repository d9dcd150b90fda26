use serde::Deserialize;
use serde_json::{Map, Value};

/// The role that unlocks admin pages.
pub const ADMIN_ROLE: &str = "admin";

/// Namespaced custom claim the identity service attaches roles under.
pub const DEFAULT_ROLES_CLAIM: &str = "https://enabler.fun/roles";

/// The authenticated user behind a session, as returned by the identity
/// service. Every claim is kept so the role claim key can be configured.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl User {
    /// Roles listed under `claim_key`. Anything that is not an array of
    /// strings counts as no roles.
    pub fn roles<'a>(&'a self, claim_key: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.claims
            .get(claim_key)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn has_role(&self, claim_key: &str, role: &str) -> bool {
        self.roles(claim_key).any(|r| r == role)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn is_admin(&self, claim_key: &str) -> bool {
        self.user.has_role(claim_key, ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(value: Value) -> User {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_admin_role_present() {
        let session = Session::new(user(json!({
            "sub": "auth0|1",
            DEFAULT_ROLES_CLAIM: ["editor", "admin"]
        })));
        assert!(session.is_admin(DEFAULT_ROLES_CLAIM));
    }

    #[test]
    fn test_admin_role_absent_or_empty() {
        let no_claim = Session::new(user(json!({ "sub": "auth0|1" })));
        let empty = Session::new(user(json!({ DEFAULT_ROLES_CLAIM: [] })));
        let other = Session::new(user(json!({ DEFAULT_ROLES_CLAIM: ["member"] })));
        let not_a_list = Session::new(user(json!({ DEFAULT_ROLES_CLAIM: "admin" })));

        assert!(!no_claim.is_admin(DEFAULT_ROLES_CLAIM));
        assert!(!empty.is_admin(DEFAULT_ROLES_CLAIM));
        assert!(!other.is_admin(DEFAULT_ROLES_CLAIM));
        assert!(!not_a_list.is_admin(DEFAULT_ROLES_CLAIM));
    }

    #[test]
    fn test_role_lookup_uses_claim_key() {
        let session = Session::new(user(json!({ "roles": ["admin"] })));
        assert!(!session.is_admin(DEFAULT_ROLES_CLAIM));
        assert!(session.is_admin("roles"));
    }
}
