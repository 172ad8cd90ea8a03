//! The authenticated principal extracted from a verified access token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity established by token verification: `(user_id, tenant_id, roles)`.
///
/// This is the only identity a resource service may trust for authorization
/// decisions. The advisory `X-User-Id` / `X-Tenant-Id` / `X-Roles` headers
/// the gateway forwards carry the same values but exist for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The user account id (`sub` claim).
    pub user_id: Uuid,
    /// The tenant the user belongs to.
    pub tenant_id: Uuid,
    /// Role names granted at token issuance, uppercase (e.g. `CUSTOMER`).
    pub roles: Vec<String>,
}

impl Principal {
    /// Whether the principal carries the given role name (case-sensitive,
    /// roles are stored uppercase).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Whether the principal may act on any resource within its tenant.
    pub fn is_tenant_operator(&self) -> bool {
        self.has_role("ADMIN") || self.has_role("STAFF")
    }

    /// Roles joined with commas, for the advisory `X-Roles` header.
    pub fn roles_header(&self) -> String {
        self.roles.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(roles: &[&str]) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn role_membership() {
        let p = principal(&["CUSTOMER"]);
        assert!(p.has_role("CUSTOMER"));
        assert!(!p.has_role("ADMIN"));
    }

    #[test]
    fn tenant_operator_roles() {
        assert!(principal(&["ADMIN"]).is_tenant_operator());
        assert!(principal(&["STAFF"]).is_tenant_operator());
        assert!(!principal(&["SELLER"]).is_tenant_operator());
    }

    #[test]
    fn roles_header_is_comma_joined() {
        let p = principal(&["CUSTOMER", "SELLER"]);
        assert_eq!(p.roles_header(), "CUSTOMER,SELLER");
    }
}
