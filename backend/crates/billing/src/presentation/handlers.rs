//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Extension;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;

use auth::domain::repository::{AccountRepository, AdminGrantRepository, ReferralRepository};
use auth::models::AccountSummary;
use auth::models::effective_role::EffectiveRole;
use auth::presentation::middleware::AuthContext;
use kernel::id::TransactionId;

use crate::application::config::BillingConfig;
use crate::application::{
    DashboardUseCase, ReviewPaymentInput, ReviewPaymentUseCase, SubmitPaymentInput,
    SubmitPaymentUseCase, SummaryUseCase,
};
use crate::domain::repository::{TipRepository, TransactionRepository};
use crate::domain::value_objects::ReviewStatus;
use crate::error::{BillingError, BillingResult};
use crate::presentation::dto::{
    DashboardResponse, GrantView, PendingPaymentsResponse, PlansResponse, ReferralView,
    SubmitPaymentRequest, SubmitPaymentResponse, SummaryResponse, TipView, TransactionView,
    VerifyPaymentRequest,
};

/// Shared state for billing handlers
pub struct BillingAppState<S, B>
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
    pub auth_store: Arc<S>,
    pub billing_store: Arc<B>,
    pub config: Arc<BillingConfig>,
}

impl<S, B> Clone for BillingAppState<S, B>
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
    fn clone(&self) -> Self {
        Self {
            auth_store: Arc::clone(&self.auth_store),
            billing_store: Arc::clone(&self.billing_store),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /api/user/dashboard
///
/// Banned accounts still see the dashboard; the account block carries
/// the suspension details the client renders.
pub async fn dashboard<S, B>(
    State(state): State<BillingAppState<S, B>>,
    Extension(ctx): Extension<AuthContext>,
) -> BillingResult<Json<DashboardResponse>>
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
    let use_case = DashboardUseCase::new(
        state.auth_store.clone(),
        state.auth_store.clone(),
        state.billing_store.clone(),
        state.billing_store.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(ctx.account).await?;

    Ok(Json(DashboardResponse {
        account: AccountSummary::from_account(&output.account, Utc::now()),
        referrals: output.referrals.iter().map(ReferralView::from_listing).collect(),
        transactions: output
            .transactions
            .iter()
            .map(TransactionView::from_transaction)
            .collect(),
        tips: output.tips.iter().map(TipView::from_tip).collect(),
        support_contact: output.support_contact,
    }))
}

// ============================================================================
// Premium plans
// ============================================================================

/// GET /api/premium/plans
pub async fn plans<S, B>(State(state): State<BillingAppState<S, B>>) -> Json<PlansResponse>
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
    Json(PlansResponse {
        plans: state.config.plans().to_vec(),
    })
}

// ============================================================================
// Payment submission
// ============================================================================

/// POST /api/payment/submit
pub async fn submit_payment<S, B>(
    State(state): State<BillingAppState<S, B>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<SubmitPaymentRequest>,
) -> BillingResult<(StatusCode, Json<SubmitPaymentResponse>)>
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
    if ctx.role == EffectiveRole::Banned {
        return Err(auth::AuthError::Suspended {
            reason: ctx
                .account
                .ban_reason
                .clone()
                .unwrap_or_else(|| "Account is suspended".to_string()),
            expires_at: ctx.account.ban_expires,
        }
        .into());
    }

    let use_case = SubmitPaymentUseCase::new(state.billing_store.clone());
    let transaction = use_case
        .execute(SubmitPaymentInput {
            account_id: ctx.account.account_id,
            kind: req.kind,
            plan: req.plan,
            amount: req.amount,
            proof: req.proof,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitPaymentResponse {
            transaction_id: transaction.transaction_id.to_string(),
            status: transaction.status.code().to_string(),
            message: "Payment submitted, awaiting review".to_string(),
        }),
    ))
}

// ============================================================================
// Admin: pending payments
// ============================================================================

/// GET /api/admin/payments
pub async fn pending_payments<S, B>(
    State(state): State<BillingAppState<S, B>>,
) -> BillingResult<Json<PendingPaymentsResponse>>
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
    let payments = TransactionRepository::list_pending(state.billing_store.as_ref()).await?;

    Ok(Json(PendingPaymentsResponse {
        payments: payments.iter().map(TransactionView::from_transaction).collect(),
    }))
}

// ============================================================================
// Admin: verify payment
// ============================================================================

/// POST /api/admin/verify-payment/{id}
pub async fn verify_payment<S, B>(
    State(state): State<BillingAppState<S, B>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(req): Json<VerifyPaymentRequest>,
) -> BillingResult<Json<TransactionView>>
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
    let transaction_id = TransactionId::from_str(&id)
        .map_err(|_| BillingError::Validation("Invalid transaction id".into()))?;

    let decision = ReviewStatus::from_code(&req.status)
        .filter(ReviewStatus::is_terminal)
        .ok_or_else(|| {
            BillingError::Validation("Status must be \"approved\" or \"rejected\"".into())
        })?;

    let use_case =
        ReviewPaymentUseCase::new(state.billing_store.clone(), state.auth_store.clone());
    let transaction = use_case
        .execute(ReviewPaymentInput {
            transaction_id,
            decision,
            notes: req.admin_notes,
        })
        .await?;

    tracing::info!(
        actor = %ctx.account.email,
        transaction_id = %transaction.transaction_id,
        status = %transaction.status,
        "Payment review recorded"
    );

    Ok(Json(TransactionView::from_transaction(&transaction)))
}

// ============================================================================
// Admin: summary
// ============================================================================

/// GET /api/admin/summary
pub async fn summary<S, B>(
    State(state): State<BillingAppState<S, B>>,
) -> BillingResult<Json<SummaryResponse>>
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
    let use_case = SummaryUseCase::new(
        state.auth_store.clone(),
        state.auth_store.clone(),
        state.billing_store.clone(),
        state.billing_store.clone(),
    );

    let output = use_case.execute().await?;

    Ok(Json(SummaryResponse {
        account_count: output.account_count,
        pending_transaction_count: output.pending_transaction_count,
        active_tip_count: output.active_tip_count,
        admins: output.grants.iter().map(GrantView::from_grant).collect(),
    }))
}
