//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::account::Account;
use crate::domain::entity::admin_grant::AdminGrant;
use crate::domain::entity::referral::{Referral, ReferralListing};
use crate::domain::value_object::{email::Email, referral_code::ReferralCode};
use crate::error::AuthResult;
use kernel::id::AccountId;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Find account by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Find account by referral code
    async fn find_by_referral_code(&self, code: &ReferralCode) -> AuthResult<Option<Account>>;

    /// Persist the account's current state
    async fn update(&self, account: &Account) -> AuthResult<()>;

    /// Total number of accounts
    async fn count(&self) -> AuthResult<i64>;
}

/// Admin grant repository trait
#[trait_variant::make(AdminGrantRepository: Send)]
pub trait LocalAdminGrantRepository {
    /// Create a new grant, replacing any existing grant for the email
    async fn upsert(&self, grant: &AdminGrant) -> AuthResult<()>;

    /// Find the grant attached to an email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<AdminGrant>>;

    /// Remove the grant attached to an email
    async fn delete_by_email(&self, email: &Email) -> AuthResult<()>;

    /// All grants, most recent first
    async fn list(&self) -> AuthResult<Vec<AdminGrant>>;
}

/// Referral repository trait
#[trait_variant::make(ReferralRepository: Send)]
pub trait LocalReferralRepository {
    /// Create a referral pair
    async fn create(&self, referral: &Referral) -> AuthResult<()>;

    /// Find the referral in which this account is the referred party
    async fn find_by_referred(&self, referred: &AccountId) -> AuthResult<Option<Referral>>;

    /// Persist the referral's current state
    async fn update(&self, referral: &Referral) -> AuthResult<()>;

    /// All referrals made by an account, with referred emails
    async fn list_by_referrer(&self, referrer: &AccountId) -> AuthResult<Vec<ReferralListing>>;
}
