//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};

use crate::domain::entity::account::Account;
use crate::domain::entity::admin_grant::AdminGrant;
use crate::domain::entity::referral::{Referral, ReferralListing, ReferralStatus};
use crate::domain::repository::{AccountRepository, AdminGrantRepository, ReferralRepository};
use crate::domain::value_object::{
    account_status::AccountStatus, admin_role::AdminRole, email::Email,
    premium_tier::PremiumTier, referral_code::ReferralCode,
};
use crate::error::{AuthError, AuthResult};
use kernel::id::AccountId;

/// PostgreSQL-backed auth store
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensure the configured super-admin email holds a SuperAdmin
    /// grant. Idempotent, run once at startup.
    pub async fn bootstrap_super_admin(&self, email: &Email) -> AuthResult<()> {
        let existing = self.find_by_email_grant(email).await?;
        if let Some(grant) = existing {
            if grant.role.is_super_admin() {
                return Ok(());
            }
        }

        let grant = AdminGrant::super_admin(email.clone(), Utc::now());
        self.upsert_grant(&grant).await?;

        tracing::info!(email = %email, "Super admin grant ensured");
        Ok(())
    }

    async fn find_by_email_grant(&self, email: &Email) -> AuthResult<Option<AdminGrant>> {
        let row = sqlx::query_as::<_, AdminGrantRow>(
            r#"
            SELECT email, role, assistant_expires, created_at
            FROM admin_grants
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_grant()).transpose()
    }

    async fn upsert_grant(&self, grant: &AdminGrant) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_grants (email, role, assistant_expires, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET
                role = EXCLUDED.role,
                assistant_expires = EXCLUDED.assistant_expires,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(grant.email.as_str())
        .bind(grant.role.id())
        .bind(grant.assistant_expires)
        .bind(grant.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    email,
    status,
    ban_reason,
    ban_expires,
    otp_code,
    otp_expires,
    otp_attempts,
    premium_tier,
    premium_expires,
    referral_code,
    referred_by,
    referral_points,
    referral_verified,
    created_at,
    updated_at
"#;

impl AccountRepository for PgAuthStore {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                status,
                ban_reason,
                ban_expires,
                otp_code,
                otp_expires,
                otp_attempts,
                premium_tier,
                premium_expires,
                referral_code,
                referred_by,
                referral_points,
                referral_verified,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.status.id())
        .bind(&account.ban_reason)
        .bind(account.ban_expires)
        .bind(&account.otp_code)
        .bind(account.otp_expires)
        .bind(account.otp_attempts as i16)
        .bind(account.premium_tier.id())
        .bind(account.premium_expires)
        .bind(account.referral_code.as_str())
        .bind(account.referred_by.map(|id| *id.as_uuid()))
        .bind(account.referral_points)
        .bind(account.referral_verified)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_referral_code(&self, code: &ReferralCode) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE referral_code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                status = $2,
                ban_reason = $3,
                ban_expires = $4,
                otp_code = $5,
                otp_expires = $6,
                otp_attempts = $7,
                premium_tier = $8,
                premium_expires = $9,
                referral_points = $10,
                referral_verified = $11,
                updated_at = $12
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.status.id())
        .bind(&account.ban_reason)
        .bind(account.ban_expires)
        .bind(&account.otp_code)
        .bind(account.otp_expires)
        .bind(account.otp_attempts as i16)
        .bind(account.premium_tier.id())
        .bind(account.premium_expires)
        .bind(account.referral_points)
        .bind(account.referral_verified)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count(&self) -> AuthResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// ============================================================================
// Admin Grant Repository Implementation
// ============================================================================

impl AdminGrantRepository for PgAuthStore {
    async fn upsert(&self, grant: &AdminGrant) -> AuthResult<()> {
        self.upsert_grant(grant).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<AdminGrant>> {
        self.find_by_email_grant(email).await
    }

    async fn delete_by_email(&self, email: &Email) -> AuthResult<()> {
        sqlx::query("DELETE FROM admin_grants WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<AdminGrant>> {
        let rows = sqlx::query_as::<_, AdminGrantRow>(
            r#"
            SELECT email, role, assistant_expires, created_at
            FROM admin_grants
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_grant()).collect()
    }
}

// ============================================================================
// Referral Repository Implementation
// ============================================================================

impl ReferralRepository for PgAuthStore {
    async fn create(&self, referral: &Referral) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO referrals (referral_id, referrer, referred, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(referral.referral_id)
        .bind(referral.referrer.as_uuid())
        .bind(referral.referred.as_uuid())
        .bind(referral.status.code())
        .bind(referral.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_referred(&self, referred: &AccountId) -> AuthResult<Option<Referral>> {
        let row = sqlx::query_as::<_, ReferralRow>(
            r#"
            SELECT referral_id, referrer, referred, status, created_at
            FROM referrals
            WHERE referred = $1
            "#,
        )
        .bind(referred.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_referral()).transpose()
    }

    async fn update(&self, referral: &Referral) -> AuthResult<()> {
        sqlx::query("UPDATE referrals SET status = $2 WHERE referral_id = $1")
            .bind(referral.referral_id)
            .bind(referral.status.code())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_by_referrer(&self, referrer: &AccountId) -> AuthResult<Vec<ReferralListing>> {
        let rows = sqlx::query_as::<_, ReferralListingRow>(
            r#"
            SELECT r.referral_id, a.email AS referred_email, r.status, r.created_at
            FROM referrals r
            JOIN accounts a ON a.account_id = r.referred
            WHERE r.referrer = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(referrer.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_listing()).collect()
    }
}

// ============================================================================
// Rate Limit Store Implementation
// ============================================================================

impl RateLimitStore for PgAuthStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let now_ms = Utc::now().timestamp_millis();
        let window_floor = now_ms - config.window_ms();

        // Fixed window: a row past the floor restarts the window
        let (window_start_ms, count) = sqlx::query_as::<_, (i64, i32)>(
            r#"
            INSERT INTO otp_rate_limits (key, window_start_ms, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (key) DO UPDATE SET
                count = CASE
                    WHEN otp_rate_limits.window_start_ms <= $3 THEN 1
                    ELSE otp_rate_limits.count + 1
                END,
                window_start_ms = CASE
                    WHEN otp_rate_limits.window_start_ms <= $3 THEN $2
                    ELSE otp_rate_limits.window_start_ms
                END
            RETURNING window_start_ms, count
            "#,
        )
        .bind(key)
        .bind(now_ms)
        .bind(window_floor)
        .fetch_one(&self.pool)
        .await?;

        let count = count as u32;
        Ok(RateLimitResult {
            allowed: count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start_ms + config.window_ms(),
        })
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    status: i16,
    ban_reason: Option<String>,
    ban_expires: Option<DateTime<Utc>>,
    otp_code: Option<String>,
    otp_expires: Option<DateTime<Utc>>,
    otp_attempts: i16,
    premium_tier: i16,
    premium_expires: Option<DateTime<Utc>>,
    referral_code: String,
    referred_by: Option<Uuid>,
    referral_points: i32,
    referral_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let email = Email::new(&self.email)
            .map_err(|e| AuthError::Internal(format!("Invalid stored email: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email,
            status: AccountStatus::from_id(self.status),
            ban_reason: self.ban_reason,
            ban_expires: self.ban_expires,
            otp_code: self.otp_code,
            otp_expires: self.otp_expires,
            otp_attempts: self.otp_attempts as u16,
            premium_tier: PremiumTier::from_id(self.premium_tier),
            premium_expires: self.premium_expires,
            referral_code: ReferralCode::from_string(self.referral_code),
            referred_by: self.referred_by.map(AccountId::from_uuid),
            referral_points: self.referral_points,
            referral_verified: self.referral_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AdminGrantRow {
    email: String,
    role: i16,
    assistant_expires: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl AdminGrantRow {
    fn into_grant(self) -> AuthResult<AdminGrant> {
        let email = Email::new(&self.email)
            .map_err(|e| AuthError::Internal(format!("Invalid stored email: {}", e)))?;

        Ok(AdminGrant {
            email,
            role: AdminRole::from_id(self.role),
            assistant_expires: self.assistant_expires,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReferralRow {
    referral_id: Uuid,
    referrer: Uuid,
    referred: Uuid,
    status: String,
    created_at: DateTime<Utc>,
}

impl ReferralRow {
    fn into_referral(self) -> AuthResult<Referral> {
        let status = ReferralStatus::from_code(&self.status)
            .ok_or_else(|| AuthError::Internal(format!("Invalid referral status: {}", self.status)))?;

        Ok(Referral {
            referral_id: self.referral_id,
            referrer: AccountId::from_uuid(self.referrer),
            referred: AccountId::from_uuid(self.referred),
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReferralListingRow {
    referral_id: Uuid,
    referred_email: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl ReferralListingRow {
    fn into_listing(self) -> AuthResult<ReferralListing> {
        let status = ReferralStatus::from_code(&self.status)
            .ok_or_else(|| AuthError::Internal(format!("Invalid referral status: {}", self.status)))?;

        Ok(ReferralListing {
            referral_id: self.referral_id,
            referred_email: self.referred_email,
            status,
            created_at: self.created_at,
        })
    }
}
