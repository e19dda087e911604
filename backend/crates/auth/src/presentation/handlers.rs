//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, extract::ConnectInfo};
use chrono::Utc;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use platform::client::{client_key, extract_client_ip};
use platform::mailer::Mailer;
use platform::rate_limit::RateLimitStore;

use crate::application::resolve_role::RoleResolver;
use crate::application::{
    AuthConfig, BanAccountInput, BanAccountUseCase, CreateAssistantInput, CreateAssistantUseCase,
    RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase,
};
use crate::domain::repository::{AccountRepository, AdminGrantRepository, ReferralRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccountSummary, BanUserRequest, CreateAssistantRequest, CreateAssistantResponse,
    RequestOtpRequest, RequestOtpResponse, VerifyOtpRequest, VerifyOtpResponse,
};
use crate::presentation::middleware::AuthContext;
use kernel::id::AccountId;

/// Shared state for auth handlers
pub struct AuthAppState<S, M>
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + RateLimitStore
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<S, M> Clone for AuthAppState<S, M>
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + RateLimitStore
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mailer: Arc::clone(&self.mailer),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Request OTP
// ============================================================================

/// POST /api/auth/request-otp
pub async fn request_otp<S, M>(
    State(state): State<AuthAppState<S, M>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<RequestOtpRequest>,
) -> AuthResult<Json<RequestOtpResponse>>
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + RateLimitStore
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));

    let use_case = RequestOtpUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.mailer.clone(),
        state.store.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RequestOtpInput {
            email: req.email,
            referral_code: req.referral_code,
            client_key: client_key(client_ip),
        })
        .await?;

    Ok(Json(RequestOtpResponse {
        message: "OTP sent".to_string(),
        registered: output.registered,
    }))
}

// ============================================================================
// Verify OTP
// ============================================================================

/// POST /api/auth/verify-otp
pub async fn verify_otp<S, M>(
    State(state): State<AuthAppState<S, M>>,
    Json(req): Json<VerifyOtpRequest>,
) -> AuthResult<Json<VerifyOtpResponse>>
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + RateLimitStore
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = VerifyOtpUseCase::new(
        state.store.clone(),
        state.store.clone(),
        RoleResolver::new(state.store.clone()),
        state.config.clone(),
    );

    let output = use_case
        .execute(VerifyOtpInput {
            email: req.email,
            otp: req.otp,
        })
        .await?;

    Ok(Json(VerifyOtpResponse {
        token: output.token,
        role: output.role.code().to_string(),
        email: output.account.email.as_str().to_string(),
        assistant_expires_at_ms: output.assistant_expires.map(|at| at.timestamp_millis()),
    }))
}

// ============================================================================
// Current account
// ============================================================================

/// GET /api/auth/me
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<serde_json::Value> {
    let summary = AccountSummary::from_account(&ctx.account, Utc::now());
    Json(serde_json::json!({
        "role": ctx.role.code(),
        "account": summary,
    }))
}

// ============================================================================
// Admin: ban user
// ============================================================================

/// POST /api/admin/ban-user
pub async fn ban_user<S, M>(
    State(state): State<AuthAppState<S, M>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<BanUserRequest>,
) -> AuthResult<StatusCode>
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + RateLimitStore
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let account_id = AccountId::from_str(&req.user_id)
        .map_err(|_| AuthError::Validation("Invalid user id".into()))?;

    let use_case = BanAccountUseCase::new(state.store.clone(), state.store.clone());
    use_case
        .execute(BanAccountInput {
            account_id,
            reason: req.reason,
            duration_hours: req.duration_hours,
        })
        .await?;

    tracing::info!(actor = %ctx.account.email, target = %account_id, "Ban applied");

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin: create assistant
// ============================================================================

/// POST /api/admin/create-assistant
pub async fn create_assistant<S, M>(
    State(state): State<AuthAppState<S, M>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateAssistantRequest>,
) -> AuthResult<(StatusCode, Json<CreateAssistantResponse>)>
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + RateLimitStore
        + Clone
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = CreateAssistantUseCase::new(state.store.clone());
    let grant = use_case
        .execute(CreateAssistantInput {
            email: req.email,
            duration_days: req.duration_days,
        })
        .await?;

    tracing::info!(actor = %ctx.account.email, assistant = %grant.email, "Assistant created");

    Ok((
        StatusCode::CREATED,
        Json(CreateAssistantResponse {
            email: grant.email.as_str().to_string(),
            role: grant.role.code().to_string(),
            expires_at_ms: grant.assistant_expires.map(|at| at.timestamp_millis()),
        }),
    ))
}
