//! Marketplace role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user account can be granted.
///
/// `Customer` and `Seller` may self-register; the rest are provisioned into
/// an existing tenant. Roles are persisted and serialized in uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// A buyer on the marketplace. Registers into the default tenant.
    Customer,
    /// A merchant. Self-registration creates a dedicated tenant.
    Seller,
    /// Tenant administrator; may operate on any resource in the tenant.
    Admin,
    /// Tenant support staff; same tenant-wide reach as admin.
    Staff,
    /// Delivery driver.
    Driver,
}

impl Role {
    /// Whether self-registration without an explicit tenant id is allowed.
    pub fn can_self_register(&self) -> bool {
        matches!(self, Self::Customer | Self::Seller)
    }

    /// Whether this role may operate on any resource within its tenant.
    pub fn is_tenant_operator(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Return the role as its uppercase wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Seller => "SELLER",
            Self::Admin => "ADMIN",
            Self::Staff => "STAFF",
            Self::Driver => "DRIVER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = bazar_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CUSTOMER" => Ok(Self::Customer),
            "SELLER" => Ok(Self::Seller),
            "ADMIN" => Ok(Self::Admin),
            "STAFF" => Ok(Self::Staff),
            "DRIVER" => Ok(Self::Driver),
            _ => Err(bazar_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: CUSTOMER, SELLER, ADMIN, STAFF, DRIVER"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_registration_roles() {
        assert!(Role::Customer.can_self_register());
        assert!(Role::Seller.can_self_register());
        assert!(!Role::Admin.can_self_register());
        assert!(!Role::Driver.can_self_register());
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!("SELLER".parse::<Role>().unwrap(), Role::Seller);
        assert!("merchant".parse::<Role>().is_err());
    }

    #[test]
    fn wire_format_is_uppercase() {
        assert_eq!(Role::Staff.to_string(), "STAFF");
        let json = serde_json::to_string(&Role::Driver).unwrap();
        assert_eq!(json, "\"DRIVER\"");
    }
}
