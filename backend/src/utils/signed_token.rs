//! Stateless, signed, time-limited tokens that carry a single user id.
//!
//! A codec is bound to a server secret and a purpose salt. The signing key is
//! derived from both, so a token minted for one purpose (a session cookie)
//! never verifies under another (a password-reset link) even though the same
//! secret backs them. Freshness is judged from the issuance time embedded in
//! the token; nothing is stored server side, so tokens cannot be revoked
//! short of rotating the secret.
//!
//! Tokens are HS256 JWS compact strings: three base64url segments joined by
//! `.`, safe to drop into a URL path or query string as-is.

use std::{fmt, sync::Arc, time::Duration};

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{types::UserId, utils::time::Clock};

/// Purpose salt for session cookies.
pub const SESSION_TOKEN_SALT: &str = "session-cookie";

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    uid: i64,
    iat: i64,
}

/// Why a token was turned away. Only ever logged; callers see `None`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("signature does not match")]
    BadSignature,
    #[error("token is older than {max_age_secs}s")]
    Expired { max_age_secs: u64 },
    #[error("token issued in the future")]
    IssuedInFuture,
    #[error("malformed token")]
    Malformed,
}

#[derive(Clone)]
pub struct SignedTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SignedTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedTokenCodec").finish_non_exhaustive()
    }
}

impl SignedTokenCodec {
    pub fn new(secret: &str, purpose_salt: &str, clock: Arc<dyn Clock>) -> Self {
        let key = derive_key(secret, purpose_salt);
        Self {
            encoding: EncodingKey::from_secret(&key),
            decoding: DecodingKey::from_secret(&key),
            clock,
        }
    }

    /// Mints a token for `user_id`, stamped with the current time.
    pub fn issue(&self, user_id: UserId) -> anyhow::Result<String> {
        let claims = TokenClaims {
            uid: user_id.get(),
            iat: self.clock.now().timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Returns the embedded user id when the token is authentic and no older
    /// than `max_age`; `None` for every kind of failure.
    pub fn verify(&self, token: &str, max_age: Duration) -> Option<UserId> {
        match self.decode(token, max_age) {
            Ok(user_id) => Some(user_id),
            Err(err) => {
                tracing::debug!(error = %err, "signed token rejected");
                None
            }
        }
    }

    fn decode(&self, token: &str, max_age: Duration) -> Result<UserId, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let age = self.clock.now().timestamp() - data.claims.iat;
        if age < 0 {
            return Err(TokenError::IssuedInFuture);
        }
        let max_age_secs = max_age.as_secs();
        if age as u64 > max_age_secs {
            return Err(TokenError::Expired { max_age_secs });
        }

        Ok(UserId::new(data.claims.uid))
    }
}

fn derive_key(secret: &str, purpose_salt: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(purpose_salt.as_bytes());
    hasher.update(b"\x00signer\x00");
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}
