//! Password hashing and access tokens.
//!
//! Passwords are stored as bcrypt hashes.
//!
//! Access tokens are HS256 JWTs carrying [`AccessClaims`], signed with the server's token secret. Clients send them
//! back as a `Bearer` token in the `Authorization` header, or in the `jwt` cookie.
use std::time::Duration;

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use chrono::Utc;
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use loyalty_engine::db_types::User;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub const ACCESS_TOKEN_COOKIE: &str = "jwt";
const PASSWORD_HASH_COST: u32 = 10;

//--------------------------------------------   Passwords  ---------------------------------------------------------
/// Hashes `password` with a fresh salt. This is deliberately slow, so call it from a blocking context.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, PASSWORD_HASH_COST).map_err(|e| AuthError::HashError(e.to_string()))
}

/// Checks `password` against a hash produced by [`hash_password`]. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or_else(|e| {
        warn!("🔑️ Stored password hash could not be checked. {e}");
        false
    })
}

//--------------------------------------------   Access tokens  -----------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub uid: i64,
    pub login: String,
    /// Expiry, as a unix timestamp
    pub exp: i64,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.token_secret.reveal().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expiry: config.token_expiry,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Issues a new access token for the given user. This method DOES NOT check the user's credentials. This must be
    /// done prior to calling `issue_token`.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let exp = Utc::now().timestamp().saturating_add(i64::try_from(self.expiry.as_secs()).unwrap_or(i64::MAX));
        let claims = AccessClaims { uid: user.id, login: user.login.clone(), exp };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &AccessClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))
    }

    /// Checks the token's algorithm, signature and expiry, and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::ValidationError,
            _ => AuthError::PoorlyFormattedToken(e.to_string()),
        })?;
        Ok(data.claims)
    }
}

//--------------------------------------------   Extractor  ---------------------------------------------------------
/// The user making the request, as established by a valid access token. Adding this as a handler argument makes the
/// route require authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub login: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ServerError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::ConfigurationError("No token issuer has been configured".into()))?;
    let token = access_token(req).ok_or(AuthError::MissingToken)?;
    let claims = issuer.validate_token(&token).map_err(|e| {
        debug!("🔑️ Rejected access token. {e}");
        e
    })?;
    trace!("🔑️ Request authenticated for user #{}", claims.uid);
    Ok(AuthenticatedUser { id: claims.uid, login: claims.login })
}

fn access_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .or_else(|| req.cookie(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()))
}
