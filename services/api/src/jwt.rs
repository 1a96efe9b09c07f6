//! Bearer token issuance and near-expiry refresh
//!
//! Tokens are stateless HS256 JWTs carrying the username and an expiry.
//! Refresh refuses tokens that still have more than the threshold remaining,
//! which bounds how often a token can be renewed.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared signing secret
    pub secret: String,
    /// Token lifetime in seconds
    pub token_expiry: u64,
    /// Refresh is refused while more than this many seconds remain
    pub refresh_threshold: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: shared signing secret (required)
    /// - `JWT_TOKEN_EXPIRY`: token lifetime in seconds (default: 300)
    /// - `JWT_REFRESH_THRESHOLD`: refresh window in seconds (default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);

        let refresh_threshold = std::env::var("JWT_REFRESH_THRESHOLD")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(JwtConfig {
            secret,
            token_expiry,
            refresh_threshold,
        })
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// A signed token together with its expiry
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// Token errors
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signature invalid, token malformed, or already expired
    #[error("invalid token")]
    Invalid,

    /// The token still has too much validity left to be refreshed
    #[error("token is not expired yet")]
    NotYetExpired,

    /// Signing a fresh token failed
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues, verifies, and refreshes bearer tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
    refresh_threshold: u64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token within the refresh window must not decode as
        // already expired, and an expired one must not pass.
        validation.leeway = 0;

        JwtService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_expiry: config.token_expiry,
            refresh_threshold: config.refresh_threshold,
        }
    }

    /// Issue a token for a username with a full expiry window
    pub fn issue(&self, username: &str) -> Result<SignedToken, TokenError> {
        let now = Utc::now();
        let expires = now + Duration::seconds(self.token_expiry as i64);

        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp() as u64,
            exp: expires.timestamp() as u64,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(SignedToken { token, expires })
    }

    /// Verify a token's signature and expiry and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        Ok(data.claims)
    }

    /// Reissue a token that is within the refresh threshold of expiring
    pub fn refresh(&self, token: &str) -> Result<SignedToken, TokenError> {
        let claims = self.verify(token)?;

        let now = Utc::now().timestamp() as u64;
        if claims.exp.saturating_sub(now) > self.refresh_threshold {
            return Err(TokenError::NotYetExpired);
        }

        self.issue(&claims.sub)
    }
}
