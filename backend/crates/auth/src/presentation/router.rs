//! Auth Routers

use axum::{
    Router, middleware,
    routing::{get, post},
};

use platform::mailer::Mailer;
use platform::rate_limit::RateLimitStore;

use crate::domain::repository::{AccountRepository, AdminGrantRepository, ReferralRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{
    AuthGateState, require_account, require_full_admin, require_super_admin,
};

/// Routes under /api/auth
pub fn auth_router<S, M>(state: AuthAppState<S, M>, gate: AuthGateState<S>) -> Router
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
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .layer(middleware::from_fn_with_state(gate, require_account::<S>));

    Router::new()
        .route("/request-otp", post(handlers::request_otp::<S, M>))
        .route("/verify-otp", post(handlers::verify_otp::<S, M>))
        .merge(protected)
        .with_state(state)
}

/// Auth-owned routes under /api/admin
///
/// Banning needs a full admin; assistant creation is super-admin only.
pub fn admin_router<S, M>(state: AuthAppState<S, M>, gate: AuthGateState<S>) -> Router
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
    let ban = Router::new()
        .route("/ban-user", post(handlers::ban_user::<S, M>))
        .layer(middleware::from_fn_with_state(
            gate.clone(),
            require_full_admin::<S>,
        ));

    let assistants = Router::new()
        .route("/create-assistant", post(handlers::create_assistant::<S, M>))
        .layer(middleware::from_fn_with_state(gate, require_super_admin::<S>));

    ban.merge(assistants).with_state(state)
}
