//! Auth flows: register, login, refresh, logout, logout-all.
//!
//! `AuthService` composes the hasher, the key store, the token minter and
//! verifier, the repositories, and the revocation index. It is constructed
//! once at process start and injected wherever the flows are needed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use bazar_core::config::AuthConfig;
use bazar_core::error::{AppError, ErrorKind};
use bazar_core::result::AppResult;
use bazar_database::repositories::{
    RefreshTokenRepository, RoleGrantRepository, TenantRepository, UserAccountRepository,
};
use bazar_entity::role::Role;
use bazar_entity::tenant::DEFAULT_TENANT_ID;
use bazar_entity::user::CreateUserAccount;
use bazar_entity::validation::{is_valid_e164, is_valid_email};

use crate::jwt::{Claims, TokenMinter, TokenVerifier, VerificationKeySet};
use crate::keys::SigningKeyStore;
use crate::password::PasswordHasher;
use crate::revocation::RevocationIndex;

/// Minimum accepted password length.
const PASSWORD_MIN_LENGTH: usize = 8;

/// Registration request, already shape-validated at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Email identifier (at least one of email/phone required).
    pub email: Option<String>,
    /// Phone identifier in E.164.
    pub phone: Option<String>,
    /// Cleartext password.
    pub password: String,
    /// Explicit tenant, when registering into an existing one.
    pub tenant_id: Option<Uuid>,
    /// The single role granted at registration.
    pub role: Role,
}

/// Login request.
#[derive(Debug, Clone)]
pub struct LoginInput {
    /// Email identifier.
    pub email: Option<String>,
    /// Phone identifier.
    pub phone: Option<String>,
    /// Cleartext password.
    pub password: String,
}

/// A full token pair plus the identity it was issued to. Returned by
/// register (auto-login) and login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh token cleartext; shown to the client exactly once.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user.
    pub user_id: Uuid,
    /// Roles granted to the user.
    pub roles: Vec<Role>,
    /// The user's tenant.
    pub tenant_id: Uuid,
}

/// A refreshed access token.
#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    /// New signed access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Orchestrates the five auth flows over the identity store, key store,
/// and revocation index.
#[derive(Debug, Clone)]
pub struct AuthService {
    pool: PgPool,
    tenants: TenantRepository,
    users: UserAccountRepository,
    role_grants: RoleGrantRepository,
    refresh_tokens: RefreshTokenRepository,
    key_store: SigningKeyStore,
    minter: TokenMinter,
    verifier: TokenVerifier,
    hasher: Arc<PasswordHasher>,
    revocation: RevocationIndex,
    refresh_ttl: Duration,
}

impl AuthService {
    /// Wire up the service from its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        tenants: TenantRepository,
        users: UserAccountRepository,
        role_grants: RoleGrantRepository,
        refresh_tokens: RefreshTokenRepository,
        key_store: SigningKeyStore,
        minter: TokenMinter,
        hasher: Arc<PasswordHasher>,
        revocation: RevocationIndex,
        auth_config: &AuthConfig,
    ) -> Self {
        Self {
            pool,
            tenants,
            users,
            role_grants,
            refresh_tokens,
            key_store,
            minter,
            verifier: TokenVerifier::new(),
            hasher,
            revocation,
            refresh_ttl: Duration::days(auth_config.refresh_ttl_days as i64),
        }
    }

    /// Register a new account and auto-login.
    ///
    /// Tenant resolution: an explicit tenant id must exist; otherwise
    /// customers land in the default marketplace tenant and sellers get a
    /// fresh tenant named after their identifier. All persistence commits
    /// in one transaction, so a failure at any step (token minting
    /// included) leaves no partial account behind.
    pub async fn register(&self, input: RegisterInput) -> AppResult<IssuedSession> {
        self.validate_register(&input)?;
        let now = Utc::now();

        // The KDF call costs hundreds of milliseconds; run it before the
        // transaction opens and off the async runtime.
        let salt = self.hasher.generate_salt();
        let password_hash = self
            .hash_blocking(input.password.clone(), salt.clone())
            .await?;

        let mut tx = self.pool.begin().await.map_err(Self::db_err)?;

        let tenant_id = self.resolve_tenant(&mut tx, &input).await?;

        // Prechecks give friendly errors; the partial unique indexes stay
        // authoritative under concurrent registration.
        if let Some(email) = &input.email {
            if self.users.email_exists_in_tenant(email, tenant_id).await? {
                return Err(AppError::email_taken());
            }
        }
        if let Some(phone) = &input.phone {
            if self.users.phone_exists_in_tenant(phone, tenant_id).await? {
                return Err(AppError::phone_taken());
            }
        }

        let user = self
            .users
            .create(
                &mut *tx,
                &CreateUserAccount {
                    email: input.email.clone(),
                    phone: input.phone.clone(),
                    password_hash,
                    salt,
                    tenant_id,
                },
            )
            .await?;

        self.role_grants.create(&mut *tx, user.id, input.role).await?;

        let key = self.key_store.primary_signing_key_at(now).await?;
        let minted = self.minter.mint_access(&key, &user, &[input.role], now)?;

        let refresh_token = TokenMinter::mint_refresh();
        let refresh_hash = self.hasher.hash_token_deterministic(&refresh_token)?;
        self.refresh_tokens
            .create(&mut *tx, user.id, &refresh_hash, now + self.refresh_ttl)
            .await?;

        tx.commit().await.map_err(Self::db_err)?;

        info!(user_id = %user.id, tenant_id = %tenant_id, role = %input.role, "User registered");

        Ok(IssuedSession {
            access_token: minted.token,
            refresh_token,
            expires_in: self.minter.access_ttl_seconds(),
            user_id: user.id,
            roles: vec![input.role],
            tenant_id,
        })
    }

    /// Authenticate by identifier + password and issue a token pair.
    ///
    /// Every precondition failure is `BadCredentials`, deliberately
    /// indistinguishable, so responses cannot be used to enumerate
    /// accounts.
    pub async fn login(&self, input: LoginInput) -> AppResult<IssuedSession> {
        let now = Utc::now();

        let user = match (&input.email, &input.phone) {
            (Some(email), _) if !email.trim().is_empty() => self.users.find_by_email(email).await?,
            (_, Some(phone)) if !phone.trim().is_empty() => self.users.find_by_phone(phone).await?,
            _ => {
                return Err(AppError::bad_credentials("Email or phone is required"));
            }
        }
        .ok_or_else(|| AppError::bad_credentials("Invalid credentials"))?;

        if !user.enabled {
            return Err(AppError::bad_credentials("Invalid credentials"));
        }

        let password_ok = self
            .verify_blocking(
                input.password.clone(),
                user.password_hash.clone(),
                user.salt.clone(),
            )
            .await?;
        if !password_ok {
            return Err(AppError::bad_credentials("Invalid credentials"));
        }

        let roles = self.role_grants.find_roles_for_user(user.id).await?;

        let key = self.key_store.primary_signing_key_at(now).await?;
        let minted = self.minter.mint_access(&key, &user, &roles, now)?;

        let refresh_token = TokenMinter::mint_refresh();
        let refresh_hash = self.hasher.hash_token_deterministic(&refresh_token)?;
        self.refresh_tokens
            .create(&self.pool, user.id, &refresh_hash, now + self.refresh_ttl)
            .await?;

        info!(user_id = %user.id, "Login successful");

        Ok(IssuedSession {
            access_token: minted.token,
            refresh_token,
            expires_in: self.minter.access_ttl_seconds(),
            user_id: user.id,
            roles,
            tenant_id: user.tenant_id,
        })
    }

    /// Exchange a live refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated. When the caller also
    /// presents an access token that parses, its subject must match the
    /// refresh token's user; a malformed or expired access token is
    /// expected (that is why the client is refreshing) and ignored.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        access_token: Option<&str>,
    ) -> AppResult<RefreshedAccess> {
        let now = Utc::now();

        let refresh_hash = self.hasher.hash_token_deterministic(refresh_token)?;
        let record = self
            .refresh_tokens
            .find_by_hash(&refresh_hash)
            .await?
            .ok_or_else(|| AppError::bad_credentials("Invalid refresh token"))?;

        if !record.is_usable_at(now) {
            return Err(AppError::bad_credentials(
                "Refresh token is revoked or expired",
            ));
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(|| AppError::bad_credentials("Invalid refresh token"))?;

        if !user.enabled {
            return Err(AppError::bad_credentials("Account is disabled"));
        }

        if let Some(token) = access_token {
            if let Ok(sub) = self.verifier.extract_sub(token) {
                if sub != user.id {
                    return Err(AppError::bad_credentials(
                        "Refresh token and access token belong to different users",
                    ));
                }
            }
        }

        let roles = self.role_grants.find_roles_for_user(user.id).await?;
        let key = self.key_store.primary_signing_key_at(now).await?;
        let minted = self.minter.mint_access(&key, &user, &roles, now)?;

        info!(user_id = %user.id, "Access token refreshed");

        Ok(RefreshedAccess {
            access_token: minted.token,
            expires_in: self.minter.access_ttl_seconds(),
        })
    }

    /// Log out one session: revoke the refresh token and blacklist the
    /// access token for its remaining lifetime.
    pub async fn logout(&self, refresh_token: &str, access_token: &str) -> AppResult<()> {
        let now = Utc::now();
        let claims = self.verify_access_token(access_token, now).await?;

        let refresh_hash = self.hasher.hash_token_deterministic(refresh_token)?;
        let record = self
            .refresh_tokens
            .find_by_hash(&refresh_hash)
            .await?
            .ok_or_else(|| AppError::bad_credentials("Invalid refresh token"))?;

        if record.user_id != claims.sub {
            return Err(AppError::bad_credentials(
                "Refresh token does not belong to the authenticated user",
            ));
        }
        if record.revoked {
            return Err(AppError::bad_credentials("Refresh token already revoked"));
        }

        self.refresh_tokens.revoke(record.id).await?;
        self.revocation
            .revoke_token(&claims.jti, claims.remaining_ttl_seconds(now))
            .await?;

        info!(user_id = %claims.sub, jti = %claims.jti, "User logged out");
        Ok(())
    }

    /// Log out every session of the calling user.
    ///
    /// Revokes all live refresh tokens, sets the user's revocation epoch
    /// so access tokens issued before this instant are rejected even when
    /// their `jti` was never observed, and blacklists the calling token.
    pub async fn logout_all(&self, access_token: &str) -> AppResult<Uuid> {
        let now = Utc::now();
        let claims = self.verify_access_token(access_token, now).await?;

        let revoked = self.refresh_tokens.revoke_all_for_user(claims.sub).await?;
        self.revocation.revoke_all_for_user(&claims.sub, now).await?;
        self.revocation
            .revoke_token(&claims.jti, claims.remaining_ttl_seconds(now))
            .await?;

        info!(
            user_id = %claims.sub,
            refresh_tokens_revoked = revoked,
            "User logged out from all devices"
        );
        Ok(claims.sub)
    }

    /// Verify an access token against the currently active signing keys
    /// and the revocation index. Used by the authenticated authority
    /// endpoints (logout, logout-all).
    pub async fn verify_access_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Claims> {
        let keys = self.key_store.active_keys_at(now).await?;
        let key_set = VerificationKeySet::from_signing_keys(&keys)?;
        let claims = self
            .verifier
            .verify(token, &key_set, now)
            .map_err(|e| AppError::bad_credentials(e.to_string()))?;

        if self.revocation.is_revoked_for(&claims).await? {
            return Err(AppError::bad_credentials("Token has been revoked"));
        }
        Ok(claims)
    }

    /// Access token TTL in seconds, for cookie Max-Age.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.minter.access_ttl_seconds()
    }

    /// Refresh token TTL in seconds, for cookie Max-Age.
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }

    /// Resolve the tenant a registration lands in, creating the seller
    /// tenant inside the open transaction so a later failure rolls it
    /// back.
    async fn resolve_tenant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        input: &RegisterInput,
    ) -> AppResult<Uuid> {
        if let Some(tenant_id) = input.tenant_id {
            return self
                .tenants
                .find_by_id(tenant_id)
                .await?
                .map(|t| t.id)
                .ok_or_else(|| AppError::invalid_tenant("Invalid tenant ID"));
        }

        match input.role {
            Role::Customer => self
                .tenants
                .find_by_id(DEFAULT_TENANT_ID)
                .await?
                .map(|t| t.id)
                .ok_or_else(|| {
                    AppError::invalid_tenant(
                        "Default marketplace tenant not found. Run database migrations.",
                    )
                }),
            Role::Seller => {
                let identifier = input
                    .email
                    .as_deref()
                    .or(input.phone.as_deref())
                    .unwrap_or_default();
                let tenant = self
                    .tenants
                    .create(&mut **tx, &format!("Seller: {identifier}"))
                    .await?;
                Ok(tenant.id)
            }
            other => Err(AppError::invalid_tenant(format!(
                "Tenant ID is required for role: {other}"
            ))),
        }
    }

    /// Shape-validate a registration request, collecting offending fields.
    fn validate_register(&self, input: &RegisterInput) -> AppResult<()> {
        let mut fields = Vec::new();

        let has_email = input.email.as_deref().is_some_and(|e| !e.trim().is_empty());
        let has_phone = input.phone.as_deref().is_some_and(|p| !p.trim().is_empty());
        if !has_email && !has_phone {
            return Err(AppError::validation_fields(
                "Either email or phone is required",
                vec!["email".to_string(), "phone".to_string()],
            ));
        }

        if has_email && !is_valid_email(input.email.as_deref().unwrap()) {
            fields.push("email".to_string());
        }
        if has_phone && !is_valid_e164(input.phone.as_deref().unwrap()) {
            fields.push("phone".to_string());
        }
        if input.password.len() < PASSWORD_MIN_LENGTH {
            fields.push("password".to_string());
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_fields("Invalid request fields", fields))
        }
    }

    async fn hash_blocking(&self, password: String, salt: String) -> AppResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password, &salt))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    async fn verify_blocking(
        &self,
        password: String,
        stored_hash: String,
        salt: String,
    ) -> AppResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash, &salt))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))
    }

    fn db_err(e: sqlx::Error) -> AppError {
        AppError::with_source(ErrorKind::Database, "Transaction failed", e)
    }
}
