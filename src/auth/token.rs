use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::constants::MAX_TOKEN_LENGTH;
use crate::error::{RapierError, Result};

const RESERVED_CLAIMS: [&str; 3] = ["sub", "exp", "iat"];

/// Bearer token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (UTC seconds)
    pub exp: i64,
    /// Issued at (UTC seconds)
    pub iat: i64,
    /// Caller-supplied extra claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Creates claims expiring `ttl` from now
    pub fn new(subject: String, ttl: chrono::Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject,
            exp: now + ttl.num_seconds(),
            iat: now,
            extra: Map::new(),
        }
    }

    /// Attaches extra claims. Registered names (`sub`, `exp`, `iat`) are ignored.
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        for (key, value) in extra {
            if !RESERVED_CLAIMS.contains(&key.as_str()) {
                self.extra.insert(key, value);
            }
        }
        self
    }

    /// A token is valid strictly before its expiry instant
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs and verifies bearer tokens with a shared HMAC key
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenManager {
    /// Creates a new token manager with a secret and default lifetime
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        }
    }

    /// Signs the given claims
    pub fn generate_token(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| RapierError::AuthError(format!("Failed to generate token: {}", e)))
    }

    /// Issues a token for `subject` that expires after `ttl`, or the default lifetime
    pub fn issue_token(
        &self,
        subject: &str,
        extra: Option<Map<String, Value>>,
        ttl: Option<Duration>,
    ) -> Result<String> {
        let ttl = chrono::Duration::from_std(ttl.unwrap_or(self.default_ttl))
            .map_err(|e| RapierError::AuthError(format!("Invalid token lifetime: {}", e)))?;

        let mut claims = Claims::new(subject.to_string(), ttl);
        if let Some(extra) = extra {
            claims = claims.with_extra(extra);
        }
        self.generate_token(&claims)
    }

    /// Verifies signature and expiry.
    ///
    /// Every failure collapses to `None`; the reason is only logged.
    pub fn decode_token(&self, token: &str) -> Option<Claims> {
        if token.is_empty() || token.len() > MAX_TOKEN_LENGTH {
            log::debug!("Token rejected: length {}", token.len());
            return None;
        }

        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                log::debug!("Token validation failed: {}", e);
                return None;
            }
        };

        if claims.is_expired() {
            log::debug!("Token expired");
            return None;
        }

        if claims.sub.is_empty() {
            log::debug!("Token has an empty subject");
            return None;
        }

        Some(claims)
    }
}

/// Extracts bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    let (scheme, token) = auth_header.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}
