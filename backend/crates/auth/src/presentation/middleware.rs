//! Access Gateway Middleware
//!
//! Bearer-token authentication for protected routes. The token proves
//! identity; the effective role is re-resolved against the grant and
//! account tables on every call, so revocations, bans and assistant
//! expiries apply immediately instead of at token refresh.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::resolve_role::RoleResolver;
use crate::application::token::verify_token;
use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, AdminGrantRepository};
use crate::domain::value_object::effective_role::EffectiveRole;
use crate::error::{AuthError, AuthResult};

/// Middleware state
pub struct AuthGateState<S>
where
    S: AccountRepository + AdminGrantRepository + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> Clone for AuthGateState<S>
where
    S: AccountRepository + AdminGrantRepository + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

/// Authenticated caller, stored in request extensions
#[derive(Clone)]
pub struct AuthContext {
    pub account: Account,
    pub role: EffectiveRole,
}

// Takes the already-extracted token rather than the request: `Body` is
// not `Sync`, and borrowing the request across the awaits would make
// the middleware futures unusable as a tower layer.
async fn authenticate<S>(state: &AuthGateState<S>, token: Option<String>) -> AuthResult<AuthContext>
where
    S: AccountRepository + AdminGrantRepository + Clone + Send + Sync + 'static,
{
    let token = token.ok_or(AuthError::TokenInvalid)?;

    let now = Utc::now();
    let claims = verify_token(&state.config.token_secret, &token, now)?;

    let account = AccountRepository::find_by_id(state.store.as_ref(), &claims.account_id())
        .await?
        .ok_or(AuthError::TokenInvalid)?;

    let resolver = RoleResolver::new(Arc::clone(&state.store));
    let resolved = resolver.role_for(&account, now).await?;

    Ok(AuthContext {
        account,
        role: resolved.role,
    })
}

/// Require a valid bearer token
///
/// Banned accounts pass; their role is `Banned` and route handlers
/// decide what a banned caller may see.
pub async fn require_account<S>(
    State(state): State<AuthGateState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: AccountRepository + AdminGrantRepository + Clone + Send + Sync + 'static,
{
    let token = platform::bearer::extract_bearer(req.headers());
    let ctx = authenticate(&state, token)
        .await
        .map_err(IntoResponse::into_response)?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Require any admin tier (assistants included)
pub async fn require_admin<S>(
    State(state): State<AuthGateState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: AccountRepository + AdminGrantRepository + Clone + Send + Sync + 'static,
{
    let token = platform::bearer::extract_bearer(req.headers());
    let ctx = authenticate(&state, token)
        .await
        .map_err(IntoResponse::into_response)?;

    if !ctx.role.is_admin() {
        return Err(AuthError::Forbidden.into_response());
    }

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Require Admin or SuperAdmin (assistants excluded)
pub async fn require_full_admin<S>(
    State(state): State<AuthGateState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: AccountRepository + AdminGrantRepository + Clone + Send + Sync + 'static,
{
    let token = platform::bearer::extract_bearer(req.headers());
    let ctx = authenticate(&state, token)
        .await
        .map_err(IntoResponse::into_response)?;

    if !ctx.role.is_full_admin() {
        return Err(AuthError::Forbidden.into_response());
    }

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Require SuperAdmin
pub async fn require_super_admin<S>(
    State(state): State<AuthGateState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: AccountRepository + AdminGrantRepository + Clone + Send + Sync + 'static,
{
    let token = platform::bearer::extract_bearer(req.headers());
    let ctx = authenticate(&state, token)
        .await
        .map_err(IntoResponse::into_response)?;

    if !ctx.role.is_super_admin() {
        return Err(AuthError::Forbidden.into_response());
    }

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
