//! Revocation keyspace builders.
//!
//! Every process that touches the revocation index builds keys through
//! these functions so the authority's writes are observable by gateway and
//! kernel reads.

use uuid::Uuid;

/// Key marking a single access token (by `jti`) as revoked.
pub fn jwt_blacklist(jti: &Uuid) -> String {
    format!("jwt:blacklist:{jti}")
}

/// Key holding a user's revocation epoch (unix seconds). Access tokens
/// issued before the stored instant are rejected.
pub fn user_revocation_epoch(user_id: &Uuid) -> String {
    format!("user:revocation-epoch:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats() {
        let id = Uuid::nil();
        assert_eq!(
            jwt_blacklist(&id),
            "jwt:blacklist:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            user_revocation_epoch(&id),
            "user:revocation-epoch:00000000-0000-0000-0000-000000000000"
        );
    }
}
