//! PostgreSQL Repository Implementations

use crate::domain::entity::{
    account::{Account, NewAccount},
    pending_registration::PendingRegistration,
};
use crate::domain::repository::{AccountRepository, PendingRegistrationStore};
use crate::domain::value_object::{
    account_role::AccountRole, author_category::AuthorCategory, email::Email,
    full_name::FullName, otp_code::OtpCode,
};
use crate::error::{SignupError, SignupResult};
use kernel::id::AccountId;
use platform::password::CredentialSecret;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgSignupRepository {
    pool: PgPool,
}

impl PgSignupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PendingRegistrationStore for PgSignupRepository {
    async fn put(&self, registration: &PendingRegistration) -> SignupResult<()> {
        // Single statement: concurrent writers for one identity serialize on the row
        sqlx::query(
            r#"
            INSERT INTO pending_registrations (
                identity,
                full_name,
                credential_secret,
                category,
                otp_code,
                created_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (identity) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                credential_secret = EXCLUDED.credential_secret,
                category = EXCLUDED.category,
                otp_code = EXCLUDED.otp_code,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(registration.identity.as_str())
        .bind(registration.full_name.as_str())
        .bind(registration.credential_secret.expose())
        .bind(registration.category.code())
        .bind(registration.otp_code.as_str())
        .bind(registration.created_at)
        .bind(registration.expires_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(identity = %registration.identity, "Pending registration stored");

        Ok(())
    }

    async fn get(&self, identity: &Email) -> SignupResult<Option<PendingRegistration>> {
        let row = sqlx::query_as::<_, PendingRow>(
            r#"
            SELECT
                identity,
                full_name,
                credential_secret,
                category,
                otp_code,
                created_at,
                expires_at
            FROM pending_registrations
            WHERE identity = $1
            "#,
        )
        .bind(identity.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PendingRow::into_registration).transpose()
    }

    async fn delete(&self, identity: &Email) -> SignupResult<()> {
        sqlx::query("DELETE FROM pending_registrations WHERE identity = $1")
            .bind(identity.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired(&self, before: i64) -> SignupResult<u64> {
        let purged = sqlx::query("DELETE FROM pending_registrations WHERE expires_at < $1")
            .bind(before)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(purged)
    }
}

impl AccountRepository for PgSignupRepository {
    async fn find_by_identity(&self, identity: &Email) -> SignupResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, identity, display_name, is_active, created_at
            FROM accounts
            WHERE identity = $1
            "#,
        )
        .bind(identity.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }

    async fn create(&self, request: &NewAccount) -> SignupResult<Account> {
        let credential_hash = request
            .credential_secret
            .hash(None)
            .map_err(|e| SignupError::Internal(e.to_string()))?;
        let account_id = AccountId::new();

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (
                account_id,
                identity,
                display_name,
                credential_hash,
                is_active
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING account_id, identity, display_name, is_active, created_at
            "#,
        )
        .bind(account_id.into_uuid())
        .bind(request.identity.as_str())
        .bind(request.display_name.as_str())
        .bind(credential_hash.as_phc_string())
        .bind(request.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                SignupError::DuplicateAccount
            }
            other => SignupError::Database(other),
        })?;

        tracing::info!(
            account_id = %account_id,
            identity = %request.identity,
            "Account created"
        );

        Ok(row.into_account())
    }

    async fn assign_role(&self, account_id: AccountId, role: AccountRole) -> SignupResult<()> {
        sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_id, role_code)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id, role_id) DO NOTHING
            "#,
        )
        .bind(account_id.into_uuid())
        .bind(role.id())
        .bind(role.code())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct PendingRow {
    identity: String,
    full_name: String,
    credential_secret: String,
    category: String,
    otp_code: String,
    created_at: i64,
    expires_at: i64,
}

impl PendingRow {
    fn into_registration(self) -> SignupResult<PendingRegistration> {
        let credential_secret = CredentialSecret::new(self.credential_secret)
            .map_err(|e| SignupError::Store(format!("stored secret rejected: {}", e)))?;
        let category = AuthorCategory::from_code(&self.category)
            .ok_or_else(|| SignupError::Store(format!("unknown category {}", self.category)))?;
        let otp_code = OtpCode::parse(self.otp_code)
            .map_err(|e| SignupError::Store(format!("stored code rejected: {}", e)))?;

        Ok(PendingRegistration {
            identity: Email::from_db(self.identity),
            full_name: FullName::from_db(self.full_name),
            credential_secret,
            category,
            otp_code,
            created_at: self.created_at,
            expires_at: self.expires_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    identity: String,
    display_name: String,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            account_id: AccountId::from_uuid(self.account_id),
            identity: Email::from_db(self.identity),
            display_name: FullName::from_db(self.display_name),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}
