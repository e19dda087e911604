//! Bearer Token Signing and Verification
//!
//! Tokens are `base64url(claims).base64url(signature)` where the
//! signature is HMAC-SHA256 over the encoded claims. Claims carry the
//! account id and email plus the role captured at issuance; protected
//! routes re-resolve the role and treat the claim as advisory only.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use kernel::id::AccountId;
use uuid::Uuid;

use crate::domain::value_object::effective_role::EffectiveRole;
use crate::error::{AuthError, AuthResult};

/// Claims embedded in a bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub account_id: Uuid,
    pub email: String,
    /// Role at issuance, informational only
    pub role: String,
    pub issued_at_ms: i64,
    pub expires_at_ms: i64,
}

impl TokenClaims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from_uuid(self.account_id)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expires_at_ms).single()
    }
}

/// Sign a token for an account
pub fn sign_token(
    secret: &[u8; 32],
    account_id: &AccountId,
    email: &str,
    role: EffectiveRole,
    ttl: Duration,
    now: DateTime<Utc>,
) -> AuthResult<String> {
    let claims = TokenClaims {
        account_id: *account_id.as_uuid(),
        email: email.to_string(),
        role: role.code().to_string(),
        issued_at_ms: now.timestamp_millis(),
        expires_at_ms: (now + ttl).timestamp_millis(),
    };

    let payload = serde_json::to_vec(&claims)
        .map_err(|e| AuthError::Internal(format!("token encode: {e}")))?;
    let encoded = URL_SAFE_NO_PAD.encode(&payload);

    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("hmac init: {e}")))?;
    mac.update(encoded.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{}.{}", encoded, URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify a token's signature and expiry, returning its claims
pub fn verify_token(secret: &[u8; 32], token: &str, now: DateTime<Utc>) -> AuthResult<TokenClaims> {
    let (encoded, signature_b64) = token.split_once('.').ok_or(AuthError::TokenInvalid)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::TokenInvalid)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("hmac init: {e}")))?;
    mac.update(encoded.as_bytes());
    let expected = mac.finalize().into_bytes();

    if !platform::crypto::constant_time_eq(&expected, &signature) {
        return Err(AuthError::TokenInvalid);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| AuthError::TokenInvalid)?;
    let claims: TokenClaims =
        serde_json::from_slice(&payload).map_err(|_| AuthError::TokenInvalid)?;

    if now.timestamp_millis() >= claims.expires_at_ms {
        return Err(AuthError::TokenInvalid);
    }

    Ok(claims)
}
