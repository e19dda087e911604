//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::application::config::AuthConfig;
use auth::handlers::AuthAppState;
use auth::models::email::Email;
use auth::presentation::middleware::AuthGateState;
use auth::PgAuthStore;
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use billing::handlers::BillingAppState;
use billing::{BillingConfig, PgBillingStore};
use platform::mailer::{HttpMailer, Mailer, MailerConfig, NoopMailer};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,billing=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Token configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig {
            token_secret: secret,
            ..AuthConfig::default()
        }
    };
    let auth_config = Arc::new(auth_config);

    // Ensure the configured super admin holds a grant
    if let Ok(raw) = env::var("SUPER_ADMIN_EMAIL") {
        let email = Email::new(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid SUPER_ADMIN_EMAIL: {e}"))?;
        PgAuthStore::new(pool.clone())
            .bootstrap_super_admin(&email)
            .await
            .map_err(|e| anyhow::anyhow!("Super admin bootstrap failed: {e}"))?;
        tracing::info!(email = %email, "Super admin grant ensured");
    }

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Mail delivery: a configured provider in production, log-only otherwise
    let app = match mailer_from_env() {
        Some(mailer) => build_app(pool, auth_config, Arc::new(mailer)),
        None => {
            tracing::warn!("MAIL_API_URL not set, OTP mails are logged and dropped");
            build_app(pool, auth_config, Arc::new(NoopMailer))
        }
    }
    .layer(TraceLayer::new_for_http())
    .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn mailer_from_env() -> Option<HttpMailer> {
    let api_url = env::var("MAIL_API_URL").ok()?;
    let api_key = env::var("MAIL_API_KEY").unwrap_or_default();
    let from = env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@localhost".to_string());

    let config = MailerConfig {
        api_url,
        api_key,
        from,
        timeout: Duration::from_secs(10),
    };

    match HttpMailer::new(config) {
        Ok(mailer) => Some(mailer),
        Err(e) => {
            tracing::warn!(error = %e, "Mailer setup failed, falling back to log-only");
            None
        }
    }
}

fn build_app<M>(pool: PgPool, auth_config: Arc<AuthConfig>, mailer: Arc<M>) -> Router
where
    M: Mailer + Send + Sync + 'static,
{
    let store = Arc::new(PgAuthStore::new(pool.clone()));
    let billing_store = Arc::new(PgBillingStore::new(pool));

    let billing_config = Arc::new(BillingConfig {
        support_contact: env::var("SUPPORT_CONTACT")
            .unwrap_or_else(|_| BillingConfig::default().support_contact),
        ..BillingConfig::default()
    });

    let auth_state = AuthAppState {
        store: Arc::clone(&store),
        mailer,
        config: Arc::clone(&auth_config),
    };
    let gate = AuthGateState {
        store: Arc::clone(&store),
        config: auth_config,
    };
    let billing_state = BillingAppState {
        auth_store: store,
        billing_store,
        config: billing_config,
    };

    let admin = auth::admin_router(auth_state.clone(), gate.clone()).merge(billing::admin_router(
        billing_state.clone(),
        gate.clone(),
    ));

    Router::new()
        .nest("/api/auth", auth::auth_router(auth_state, gate.clone()))
        .nest("/api/admin", admin)
        .nest(
            "/api/user",
            billing::user_router(billing_state.clone(), gate.clone()),
        )
        .nest(
            "/api/payment",
            billing::payment_router(billing_state.clone(), gate),
        )
        .nest("/api/premium", billing::premium_router(billing_state))
}
