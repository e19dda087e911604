//! Billing Routers

use axum::{
    Router, middleware,
    routing::{get, post},
};

use auth::domain::repository::{AccountRepository, AdminGrantRepository, ReferralRepository};
use auth::presentation::middleware::{
    AuthGateState, require_account, require_admin, require_full_admin,
};

use crate::domain::repository::{TipRepository, TransactionRepository};
use crate::presentation::handlers::{self, BillingAppState};

/// Routes under /api/user
pub fn user_router<S, B>(state: BillingAppState<S, B>, gate: AuthGateState<S>) -> Router
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
    B: TransactionRepository + TipRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/dashboard", get(handlers::dashboard::<S, B>))
        .layer(middleware::from_fn_with_state(gate, require_account::<S>))
        .with_state(state)
}

/// Routes under /api/premium
pub fn premium_router<S, B>(state: BillingAppState<S, B>) -> Router
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
    B: TransactionRepository + TipRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/plans", get(handlers::plans::<S, B>))
        .with_state(state)
}

/// Routes under /api/payment
pub fn payment_router<S, B>(state: BillingAppState<S, B>, gate: AuthGateState<S>) -> Router
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
    B: TransactionRepository + TipRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/submit", post(handlers::submit_payment::<S, B>))
        .layer(middleware::from_fn_with_state(gate, require_account::<S>))
        .with_state(state)
}

/// Billing-owned routes under /api/admin
///
/// Any admin may read the summary and the review queue; recording a
/// review decision needs a full admin.
pub fn admin_router<S, B>(state: BillingAppState<S, B>, gate: AuthGateState<S>) -> Router
where
    S: AccountRepository
        + AdminGrantRepository
        + ReferralRepository
        + Clone
        + Send
        + Sync
        + 'static,
    B: TransactionRepository + TipRepository + Clone + Send + Sync + 'static,
{
    let read = Router::new()
        .route("/summary", get(handlers::summary::<S, B>))
        .route("/payments", get(handlers::pending_payments::<S, B>))
        .layer(middleware::from_fn_with_state(
            gate.clone(),
            require_admin::<S>,
        ));

    let review = Router::new()
        .route(
            "/verify-payment/{id}",
            post(handlers::verify_payment::<S, B>),
        )
        .layer(middleware::from_fn_with_state(gate, require_full_admin::<S>));

    read.merge(review).with_state(state)
}
