//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use auth::models::premium_tier::PremiumTier;
use kernel::id::{AccountId, TipId, TransactionId};

use crate::domain::entities::{Tip, Transaction};
use crate::domain::repository::{TipRepository, TransactionRepository};
use crate::domain::value_objects::{ReviewStatus, TipCategory, TransactionKind};
use crate::error::BillingResult;

/// PostgreSQL-backed billing store
#[derive(Clone)]
pub struct PgBillingStore {
    pool: PgPool,
}

impl PgBillingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TRANSACTION_COLUMNS: &str = r#"
    transaction_id,
    account_id,
    kind,
    premium_plan,
    amount,
    proof,
    status,
    admin_notes,
    created_at,
    reviewed_at
"#;

impl TransactionRepository for PgBillingStore {
    async fn create(&self, transaction: &Transaction) -> BillingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id,
                account_id,
                kind,
                premium_plan,
                amount,
                proof,
                status,
                admin_notes,
                created_at,
                reviewed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(transaction.transaction_id.as_uuid())
        .bind(transaction.account_id.as_uuid())
        .bind(transaction.kind.id())
        .bind(transaction.premium_plan.map(|p| p.id()))
        .bind(transaction.amount)
        .bind(&transaction.proof)
        .bind(transaction.status.id())
        .bind(&transaction.admin_notes)
        .bind(transaction.created_at)
        .bind(transaction.reviewed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        transaction_id: &TransactionId,
    ) -> BillingResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE transaction_id = $1"
        ))
        .bind(transaction_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_transaction()))
    }

    async fn update(&self, transaction: &Transaction) -> BillingResult<()> {
        sqlx::query(
            r#"
            UPDATE transactions SET
                status = $2,
                admin_notes = $3,
                reviewed_at = $4
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction.transaction_id.as_uuid())
        .bind(transaction.status.id())
        .bind(&transaction.admin_notes)
        .bind(transaction.reviewed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_pending(&self) -> BillingResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE status = $1 ORDER BY created_at ASC"
        ))
        .bind(ReviewStatus::Pending.id())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_transaction()).collect())
    }

    async fn list_recent_for_account(
        &self,
        account_id: &AccountId,
        limit: i64,
    ) -> BillingResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE account_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(account_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_transaction()).collect())
    }

    async fn count_pending(&self) -> BillingResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE status = $1")
                .bind(ReviewStatus::Pending.id())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

impl TipRepository for PgBillingStore {
    async fn list_visible(&self) -> BillingResult<Vec<Tip>> {
        let rows = sqlx::query_as::<_, TipRow>(
            r#"
            SELECT
                tip_id,
                category,
                title,
                content,
                odds_value,
                price,
                is_active,
                category_enabled,
                created_by,
                created_at
            FROM tips
            WHERE is_active AND category_enabled
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_tip()).collect())
    }

    async fn count_active(&self) -> BillingResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tips WHERE is_active")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct TransactionRow {
    transaction_id: Uuid,
    account_id: Uuid,
    kind: i16,
    premium_plan: Option<i16>,
    amount: i64,
    proof: String,
    status: i16,
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl TransactionRow {
    fn into_transaction(self) -> Transaction {
        Transaction {
            transaction_id: TransactionId::from_uuid(self.transaction_id),
            account_id: AccountId::from_uuid(self.account_id),
            kind: TransactionKind::from_id(self.kind),
            premium_plan: self.premium_plan.map(PremiumTier::from_id),
            amount: self.amount,
            proof: self.proof,
            status: ReviewStatus::from_id(self.status),
            admin_notes: self.admin_notes,
            created_at: self.created_at,
            reviewed_at: self.reviewed_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TipRow {
    tip_id: Uuid,
    category: i16,
    title: String,
    content: String,
    odds_value: f64,
    price: i64,
    is_active: bool,
    category_enabled: bool,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl TipRow {
    fn into_tip(self) -> Tip {
        Tip {
            tip_id: TipId::from_uuid(self.tip_id),
            category: TipCategory::from_id(self.category),
            title: self.title,
            content: self.content,
            odds_value: self.odds_value,
            price: self.price,
            is_active: self.is_active,
            category_enabled: self.category_enabled,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}
