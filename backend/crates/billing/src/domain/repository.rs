//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{AccountId, TransactionId};

use crate::domain::entities::{Tip, Transaction};
use crate::error::BillingResult;

/// Transaction repository trait
#[trait_variant::make(TransactionRepository: Send)]
pub trait LocalTransactionRepository {
    /// Create a new transaction
    async fn create(&self, transaction: &Transaction) -> BillingResult<()>;

    /// Find transaction by ID
    async fn find_by_id(&self, transaction_id: &TransactionId) -> BillingResult<Option<Transaction>>;

    /// Persist the transaction's current state
    async fn update(&self, transaction: &Transaction) -> BillingResult<()>;

    /// All pending transactions, oldest first
    async fn list_pending(&self) -> BillingResult<Vec<Transaction>>;

    /// Most recent transactions for an account
    async fn list_recent_for_account(
        &self,
        account_id: &AccountId,
        limit: i64,
    ) -> BillingResult<Vec<Transaction>>;

    /// Number of pending transactions
    async fn count_pending(&self) -> BillingResult<i64>;
}

/// Tip repository trait
#[trait_variant::make(TipRepository: Send)]
pub trait LocalTipRepository {
    /// Tips visible to accounts (active and category enabled)
    async fn list_visible(&self) -> BillingResult<Vec<Tip>>;

    /// Number of active tips
    async fn count_active(&self) -> BillingResult<i64>;
}
