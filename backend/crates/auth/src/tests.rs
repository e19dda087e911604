//! Use-case tests against in-memory stores
//!
//! The OTP, referral and admin flows are exercised end to end with a
//! capturing mailer standing in for the delivery provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use platform::mailer::{MailMessage, Mailer, MailerError};
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};

use crate::application::resolve_role::RoleResolver;
use crate::application::{
    AuthConfig, BanAccountInput, BanAccountUseCase, CreateAssistantInput, CreateAssistantUseCase,
    RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase, verify_token,
};
use crate::domain::entity::account::Account;
use crate::domain::entity::admin_grant::AdminGrant;
use crate::domain::entity::referral::{Referral, ReferralListing, ReferralStatus};
use crate::domain::repository::{AccountRepository, AdminGrantRepository, ReferralRepository};
use crate::domain::value_object::{
    effective_role::EffectiveRole, email::Email, premium_tier::PremiumTier,
    referral_code::ReferralCode,
};
use crate::error::{AuthError, AuthResult};
use kernel::id::AccountId;

// ============================================================================
// In-memory fakes
// ============================================================================

#[derive(Default)]
struct MemInner {
    accounts: Mutex<Vec<Account>>,
    grants: Mutex<Vec<AdminGrant>>,
    referrals: Mutex<Vec<Referral>>,
    rate_hits: Mutex<HashMap<String, u32>>,
}

#[derive(Clone, Default)]
struct MemStore(Arc<MemInner>);

impl AccountRepository for MemStore {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        self.0.accounts.lock().unwrap().push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self
            .0
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.account_id == *account_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        Ok(self
            .0
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == *email)
            .cloned())
    }

    async fn find_by_referral_code(&self, code: &ReferralCode) -> AuthResult<Option<Account>> {
        Ok(self
            .0
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.referral_code == *code)
            .cloned())
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.0.accounts.lock().unwrap();
        if let Some(slot) = accounts
            .iter_mut()
            .find(|a| a.account_id == account.account_id)
        {
            *slot = account.clone();
        }
        Ok(())
    }

    async fn count(&self) -> AuthResult<i64> {
        Ok(self.0.accounts.lock().unwrap().len() as i64)
    }
}

impl AdminGrantRepository for MemStore {
    async fn upsert(&self, grant: &AdminGrant) -> AuthResult<()> {
        let mut grants = self.0.grants.lock().unwrap();
        grants.retain(|g| g.email != grant.email);
        grants.push(grant.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<AdminGrant>> {
        Ok(self
            .0
            .grants
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.email == *email)
            .cloned())
    }

    async fn delete_by_email(&self, email: &Email) -> AuthResult<()> {
        self.0.grants.lock().unwrap().retain(|g| g.email != *email);
        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<AdminGrant>> {
        Ok(self.0.grants.lock().unwrap().clone())
    }
}

impl ReferralRepository for MemStore {
    async fn create(&self, referral: &Referral) -> AuthResult<()> {
        self.0.referrals.lock().unwrap().push(referral.clone());
        Ok(())
    }

    async fn find_by_referred(&self, referred: &AccountId) -> AuthResult<Option<Referral>> {
        Ok(self
            .0
            .referrals
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.referred == *referred)
            .cloned())
    }

    async fn update(&self, referral: &Referral) -> AuthResult<()> {
        let mut referrals = self.0.referrals.lock().unwrap();
        if let Some(slot) = referrals
            .iter_mut()
            .find(|r| r.referral_id == referral.referral_id)
        {
            *slot = referral.clone();
        }
        Ok(())
    }

    async fn list_by_referrer(&self, referrer: &AccountId) -> AuthResult<Vec<ReferralListing>> {
        let referrals = self.0.referrals.lock().unwrap();
        let accounts = self.0.accounts.lock().unwrap();
        Ok(referrals
            .iter()
            .filter(|r| r.referrer == *referrer)
            .map(|r| ReferralListing {
                referral_id: r.referral_id,
                referred_email: accounts
                    .iter()
                    .find(|a| a.account_id == r.referred)
                    .map(|a| a.email.as_str().to_string())
                    .unwrap_or_default(),
                status: r.status,
                created_at: r.created_at,
            })
            .collect())
    }
}

impl RateLimitStore for MemStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let mut hits = self.0.rate_hits.lock().unwrap();
        let count = hits.entry(key.to_string()).or_insert(0);
        *count += 1;
        Ok(RateLimitResult {
            allowed: *count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(*count),
            reset_at_ms: 0,
        })
    }
}

#[derive(Clone, Default)]
struct CaptureMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl CaptureMailer {
    /// Digits of the code in the most recent message
    fn last_code(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let body = &sent.last().expect("no mail sent").body;
        body.chars().filter(|c| c.is_ascii_digit()).take(6).collect()
    }
}

impl Mailer for CaptureMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    store: Arc<MemStore>,
    mailer: CaptureMailer,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(AuthConfig::with_random_secret())
    }

    fn with_config(config: AuthConfig) -> Self {
        Self {
            store: Arc::new(MemStore::default()),
            mailer: CaptureMailer::default(),
            config: Arc::new(config),
        }
    }

    fn request_use_case(&self) -> RequestOtpUseCase<MemStore, MemStore, CaptureMailer, MemStore> {
        RequestOtpUseCase::new(
            self.store.clone(),
            self.store.clone(),
            Arc::new(self.mailer.clone()),
            self.store.clone(),
            self.config.clone(),
        )
    }

    fn verify_use_case(&self) -> VerifyOtpUseCase<MemStore, MemStore, MemStore> {
        VerifyOtpUseCase::new(
            self.store.clone(),
            self.store.clone(),
            RoleResolver::new(self.store.clone()),
            self.config.clone(),
        )
    }

    async fn request(&self, email: &str, referral_code: Option<&str>) -> AuthResult<()> {
        self.request_use_case()
            .execute(RequestOtpInput {
                email: email.to_string(),
                referral_code: referral_code.map(str::to_string),
                client_key: format!("ip-{email}"),
            })
            .await
            .map(|_| ())
    }

    async fn verify(&self, email: &str, otp: &str) -> AuthResult<crate::application::VerifyOtpOutput> {
        self.verify_use_case()
            .execute(VerifyOtpInput {
                email: email.to_string(),
                otp: otp.to_string(),
            })
            .await
    }

    /// Request a code and immediately verify it
    async fn sign_in(&self, email: &str, referral_code: Option<&str>) -> crate::application::VerifyOtpOutput {
        self.request(email, referral_code).await.unwrap();
        let code = self.mailer.last_code();
        self.verify(email, &code).await.unwrap()
    }

    async fn account(&self, email: &str) -> Account {
        AccountRepository::find_by_email(self.store.as_ref(), &Email::new(email).unwrap())
            .await
            .unwrap()
            .expect("account missing")
    }
}

// ============================================================================
// OTP round trip
// ============================================================================

#[tokio::test]
async fn test_request_verify_round_trip() {
    let h = Harness::new();

    h.request("punter@example.com", None).await.unwrap();
    let code = h.mailer.last_code();
    assert_eq!(code.len(), 6);

    let output = h.verify("punter@example.com", &code).await.unwrap();
    assert_eq!(output.role, EffectiveRole::User);

    let claims = verify_token(&h.config.token_secret, &output.token, Utc::now()).unwrap();
    assert_eq!(claims.email, "punter@example.com");
    assert_eq!(claims.role, "User");
}

#[tokio::test]
async fn test_code_is_single_use() {
    let h = Harness::new();

    h.request("punter@example.com", None).await.unwrap();
    let code = h.mailer.last_code();

    h.verify("punter@example.com", &code).await.unwrap();
    let second = h.verify("punter@example.com", &code).await;
    assert!(matches!(second, Err(AuthError::OtpExpired)));
}

#[tokio::test]
async fn test_unknown_email_verification() {
    let h = Harness::new();
    let result = h.verify("ghost@example.com", "123456").await;
    assert!(matches!(result, Err(AuthError::AccountNotFound)));
}

#[tokio::test]
async fn test_reissue_invalidates_previous_code() {
    let h = Harness::new();

    h.request("punter@example.com", None).await.unwrap();
    let first = h.mailer.last_code();
    h.request("punter@example.com", None).await.unwrap();
    let second = h.mailer.last_code();

    if first != second {
        let result = h.verify("punter@example.com", &first).await;
        assert!(matches!(result, Err(AuthError::InvalidOtp { .. })));
    }
    h.verify("punter@example.com", &second).await.unwrap();
}

// ============================================================================
// Auto-ban
// ============================================================================

#[tokio::test]
async fn test_three_mismatches_suspend_account() {
    let h = Harness::new();

    h.request("punter@example.com", None).await.unwrap();
    let code = h.mailer.last_code();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let first = h.verify("punter@example.com", wrong).await;
    assert!(matches!(
        first,
        Err(AuthError::InvalidOtp {
            attempts_remaining: 2
        })
    ));

    let second = h.verify("punter@example.com", wrong).await;
    assert!(matches!(
        second,
        Err(AuthError::InvalidOtp {
            attempts_remaining: 1
        })
    ));

    let third = h.verify("punter@example.com", wrong).await;
    assert!(matches!(third, Err(AuthError::Suspended { .. })));

    let account = h.account("punter@example.com").await;
    assert!(account.is_suspended(Utc::now()));
    assert_eq!(account.ban_reason.as_deref(), Some(Account::AUTO_BAN_REASON));
    assert!(account.otp_code.is_none());

    // The correct code no longer works either
    let after = h.verify("punter@example.com", &code).await;
    assert!(matches!(after, Err(AuthError::Suspended { .. })));

    // Neither does requesting a fresh one
    let request = h.request("punter@example.com", None).await;
    assert!(matches!(request, Err(AuthError::Suspended { .. })));
}

#[tokio::test]
async fn test_expired_suspension_lifts_on_request() {
    let h = Harness::new();
    h.sign_in("punter@example.com", None).await;

    let mut account = h.account("punter@example.com").await;
    let now = Utc::now();
    account.suspend("manual", now - Duration::minutes(1), now - Duration::hours(6));
    AccountRepository::update(h.store.as_ref(), &account)
        .await
        .unwrap();

    h.request("punter@example.com", None).await.unwrap();
    let account = h.account("punter@example.com").await;
    assert!(!account.is_suspended(Utc::now()));
    assert!(account.ban_reason.is_none());
}

// ============================================================================
// Referral engine
// ============================================================================

#[tokio::test]
async fn test_referral_credits_on_first_verification_only() {
    let h = Harness::new();
    h.sign_in("referrer@example.com", None).await;
    let code = h.account("referrer@example.com").await.referral_code;

    h.sign_in("friend@example.com", Some(code.as_str())).await;

    let referrer = h.account("referrer@example.com").await;
    assert_eq!(referrer.referral_points, 1);

    // A second sign-in by the same friend pays nothing more
    h.sign_in("friend@example.com", None).await;
    let referrer = h.account("referrer@example.com").await;
    assert_eq!(referrer.referral_points, 1);

    let listings = h
        .store
        .list_by_referrer(&referrer.account_id)
        .await
        .unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].status, ReferralStatus::Verified);
    assert_eq!(listings[0].referred_email, "friend@example.com");
}

#[tokio::test]
async fn test_unreferred_account_never_marked_referral_verified() {
    let h = Harness::new();
    h.sign_in("loner@example.com", None).await;

    let account = h.account("loner@example.com").await;
    assert!(account.referred_by.is_none());
    assert!(!account.referral_verified);

    // Referred accounts still get the flag once the credit lands
    h.sign_in("referrer@example.com", None).await;
    let code = h.account("referrer@example.com").await.referral_code;
    h.sign_in("friend@example.com", Some(code.as_str())).await;
    assert!(h.account("friend@example.com").await.referral_verified);
}

#[tokio::test]
async fn test_fifth_referral_grants_reward() {
    let h = Harness::new();
    h.sign_in("referrer@example.com", None).await;
    let code = h.account("referrer@example.com").await.referral_code;

    for i in 0..5 {
        h.sign_in(&format!("friend{i}@example.com"), Some(code.as_str()))
            .await;
    }

    let referrer = h.account("referrer@example.com").await;
    assert_eq!(referrer.referral_points, 0);
    assert_eq!(referrer.premium_tier, PremiumTier::Basic);
    let expires = referrer.premium_expires.expect("reward expiry");
    assert!(expires > Utc::now() + Duration::days(6));
    assert!(expires <= Utc::now() + Duration::days(7));
}

#[tokio::test]
async fn test_unknown_referral_code_is_ignored() {
    let h = Harness::new();
    h.sign_in("loner@example.com", Some("does-not-exist")).await;

    let account = h.account("loner@example.com").await;
    assert!(account.referred_by.is_none());
}

#[tokio::test]
async fn test_own_code_cannot_refer_self() {
    let h = Harness::new();
    h.sign_in("referrer@example.com", None).await;
    let referrer = h.account("referrer@example.com").await;

    // The code resolves, but only at registration time; the existing
    // account cannot re-register with its own code.
    h.sign_in("referrer@example.com", Some(referrer.referral_code.as_str()))
        .await;
    let referrer = h.account("referrer@example.com").await;
    assert_eq!(referrer.referral_points, 0);
    assert!(referrer.referred_by.is_none());
}

// ============================================================================
// Role resolution and admin grants
// ============================================================================

#[tokio::test]
async fn test_expired_assistant_grant_evicted_on_resolve() {
    let h = Harness::new();
    h.sign_in("helper@example.com", None).await;

    let email = Email::new("helper@example.com").unwrap();
    let stale = AdminGrant::assistant(email.clone(), 7, Utc::now() - Duration::days(30));
    h.store.upsert(&stale).await.unwrap();

    let account = h.account("helper@example.com").await;
    let resolver = RoleResolver::new(h.store.clone());
    let resolved = resolver.role_for(&account, Utc::now()).await.unwrap();

    assert_eq!(resolved.role, EffectiveRole::User);
    assert!(
        AdminGrantRepository::find_by_email(h.store.as_ref(), &email)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_live_grant_overrides_ban() {
    let h = Harness::new();
    h.sign_in("admin@example.com", None).await;

    let email = Email::new("admin@example.com").unwrap();
    h.store
        .upsert(&AdminGrant::admin(email, Utc::now()))
        .await
        .unwrap();

    let mut account = h.account("admin@example.com").await;
    let now = Utc::now();
    account.suspend("test", now + Duration::hours(5), now);
    AccountRepository::update(h.store.as_ref(), &account)
        .await
        .unwrap();

    let resolver = RoleResolver::new(h.store.clone());
    let resolved = resolver.role_for(&account, now).await.unwrap();
    assert_eq!(resolved.role, EffectiveRole::Admin);
}

#[tokio::test]
async fn test_create_assistant_conflicts_on_existing_grant() {
    let h = Harness::new();
    let use_case = CreateAssistantUseCase::new(h.store.clone());

    use_case
        .execute(CreateAssistantInput {
            email: "helper@example.com".to_string(),
            duration_days: 14,
        })
        .await
        .unwrap();

    let again = use_case
        .execute(CreateAssistantInput {
            email: "helper@example.com".to_string(),
            duration_days: 14,
        })
        .await;
    assert!(matches!(again, Err(AuthError::Conflict(_))));
}

#[tokio::test]
async fn test_ban_use_case_refuses_admins() {
    let h = Harness::new();
    h.sign_in("admin@example.com", None).await;
    let admin = h.account("admin@example.com").await;

    h.store
        .upsert(&AdminGrant::admin(admin.email.clone(), Utc::now()))
        .await
        .unwrap();

    let use_case = BanAccountUseCase::new(h.store.clone(), h.store.clone());
    let result = use_case
        .execute(BanAccountInput {
            account_id: admin.account_id,
            reason: "abuse".to_string(),
            duration_hours: 24,
        })
        .await;
    assert!(matches!(result, Err(AuthError::Forbidden)));
}

#[tokio::test]
async fn test_ban_use_case_suspends_user() {
    let h = Harness::new();
    h.sign_in("punter@example.com", None).await;
    let target = h.account("punter@example.com").await;

    let use_case = BanAccountUseCase::new(h.store.clone(), h.store.clone());
    use_case
        .execute(BanAccountInput {
            account_id: target.account_id,
            reason: "chargeback abuse".to_string(),
            duration_hours: 48,
        })
        .await
        .unwrap();

    let banned = h.account("punter@example.com").await;
    assert!(banned.is_suspended(Utc::now()));
    assert_eq!(banned.ban_reason.as_deref(), Some("chargeback abuse"));
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test]
async fn test_otp_requests_are_rate_limited() {
    let mut config = AuthConfig::with_random_secret();
    config.rate_limit = RateLimitConfig::new(2, 60);
    let h = Harness::with_config(config);

    h.request("punter@example.com", None).await.unwrap();
    h.request("punter@example.com", None).await.unwrap();
    let third = h.request("punter@example.com", None).await;
    assert!(matches!(third, Err(AuthError::RateLimited)));

    // A different client is unaffected
    h.request("other@example.com", None).await.unwrap();
}

// ============================================================================
// Access gateway
// ============================================================================

#[tokio::test]
async fn test_gate_guards_protected_routes() {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::presentation::{AuthAppState, AuthGateState, admin_router, auth_router};

    let h = Harness::new();
    let output = h.sign_in("punter@example.com", None).await;

    let state = AuthAppState {
        store: h.store.clone(),
        mailer: Arc::new(h.mailer.clone()),
        config: h.config.clone(),
    };
    let gate = AuthGateState {
        store: h.store.clone(),
        config: h.config.clone(),
    };

    let me_ok = auth_router(state.clone(), gate.clone())
        .oneshot(
            Request::builder()
                .uri("/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", output.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me_ok.status(), StatusCode::OK);

    let me_anonymous = auth_router(state.clone(), gate.clone())
        .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(me_anonymous.status(), StatusCode::UNAUTHORIZED);

    // A plain user never reaches the admin handlers
    let ban_as_user = admin_router(state, gate)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/ban-user")
                .header(header::AUTHORIZATION, format!("Bearer {}", output.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ban_as_user.status(), StatusCode::FORBIDDEN);
}
