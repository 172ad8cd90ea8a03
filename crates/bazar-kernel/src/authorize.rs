//! Explicit per-resource authorization.
//!
//! Called at handler entry with the validated principal and the resource
//! identity. Tenant isolation is applied before any role logic: a
//! cross-tenant request yields `NotFound`, indistinguishable from a
//! resource that does not exist, so existence never leaks across the
//! tenant boundary.

use uuid::Uuid;

use bazar_core::error::AppError;
use bazar_core::result::AppResult;
use bazar_core::types::principal::Principal;

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The principal may operate on the resource.
    Allow,
    /// Same tenant, but the principal lacks the right (e.g. a customer
    /// touching another customer's resource).
    Forbidden,
    /// Cross-tenant access, reported exactly like a missing resource.
    NotFound,
}

/// The ownership coordinates of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// The user that owns the resource.
    pub owner_id: Uuid,
    /// The tenant the resource lives in.
    pub tenant_id: Uuid,
}

/// Decide whether `principal` may operate on `resource`.
///
/// `ADMIN` / `STAFF` may operate on anything within their tenant;
/// `CUSTOMER` / `SELLER` (and any other role) only on resources they
/// own.
pub fn authorize(principal: &Principal, resource: &ResourceIdentity) -> Access {
    if principal.tenant_id != resource.tenant_id {
        return Access::NotFound;
    }
    if principal.is_tenant_operator() {
        return Access::Allow;
    }
    if principal.user_id == resource.owner_id {
        Access::Allow
    } else {
        Access::Forbidden
    }
}

/// Like [`authorize`], but mapped onto the error kinds handlers return.
pub fn require(principal: &Principal, resource: &ResourceIdentity) -> AppResult<()> {
    match authorize(principal, resource) {
        Access::Allow => Ok(()),
        Access::Forbidden => Err(AppError::forbidden("Not permitted for this resource")),
        Access::NotFound => Err(AppError::not_found("Resource not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(roles: &[&str], user_id: Uuid, tenant_id: Uuid) -> Principal {
        Principal {
            user_id,
            tenant_id,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn owner_may_access_own_resource() {
        let user = Uuid::new_v4();
        let tenant = Uuid::new_v4();
        let p = principal(&["CUSTOMER"], user, tenant);
        let r = ResourceIdentity {
            owner_id: user,
            tenant_id: tenant,
        };
        assert_eq!(authorize(&p, &r), Access::Allow);
    }

    #[test]
    fn customer_cannot_touch_another_users_resource() {
        let tenant = Uuid::new_v4();
        let p = principal(&["CUSTOMER"], Uuid::new_v4(), tenant);
        let r = ResourceIdentity {
            owner_id: Uuid::new_v4(),
            tenant_id: tenant,
        };
        assert_eq!(authorize(&p, &r), Access::Forbidden);
        assert_eq!(
            require(&p, &r).unwrap_err().kind,
            bazar_core::error::ErrorKind::Forbidden
        );
    }

    #[test]
    fn admin_and_staff_operate_tenant_wide() {
        let tenant = Uuid::new_v4();
        let r = ResourceIdentity {
            owner_id: Uuid::new_v4(),
            tenant_id: tenant,
        };
        for role in ["ADMIN", "STAFF"] {
            let p = principal(&[role], Uuid::new_v4(), tenant);
            assert_eq!(authorize(&p, &r), Access::Allow);
        }
    }

    #[test]
    fn cross_tenant_is_not_found_for_every_role() {
        let r = ResourceIdentity {
            owner_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
        };
        for role in ["CUSTOMER", "SELLER", "ADMIN", "STAFF", "DRIVER"] {
            let p = principal(&[role], Uuid::new_v4(), Uuid::new_v4());
            assert_eq!(authorize(&p, &r), Access::NotFound);
            assert_eq!(
                require(&p, &r).unwrap_err().kind,
                bazar_core::error::ErrorKind::NotFound
            );
        }
    }

    #[test]
    fn owner_in_wrong_tenant_still_gets_not_found() {
        // Same user id, different tenant: isolation wins over ownership.
        let user = Uuid::new_v4();
        let p = principal(&["SELLER"], user, Uuid::new_v4());
        let r = ResourceIdentity {
            owner_id: user,
            tenant_id: Uuid::new_v4(),
        };
        assert_eq!(authorize(&p, &r), Access::NotFound);
    }
}
