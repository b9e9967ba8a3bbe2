use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;

/// The role required for catalogue writes.
pub const ADMIN_ROLE: &str = "admin";

const NO_TOKEN: &str = "No token provided, authorization denied";
const BAD_TOKEN: &str = "Invalid or expired token";

/// Claims
///
/// Payload carried inside the bearer JWT. Signed with the shared HS256 secret and
/// validated on every protected request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): identifier of the caller.
    pub sub: String,
    /// Role names granted to the caller. Missing in the token means no roles.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration Time (exp): tokens are rejected after this unix timestamp.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

impl Claims {
    /// Builds claims issued now and valid for `ttl_secs` seconds.
    pub fn new(sub: impl Into<String>, roles: Vec<String>, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: sub.into(),
            roles,
            iat: now.max(0) as usize,
            exp: (now + ttl_secs).max(0) as usize,
        }
    }
}

/// Signs claims with the shared secret (HS256). Used by local tooling and tests to mint
/// tokens the server will accept.
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// TokenVerifier
///
/// Decoding key plus validation rules, built once at startup and cloned into the
/// authentication middleware through `FromRef`.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // Expiry is always checked.
        validation.validate_exp = true;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature and expiry and returns the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                    kind => tracing::debug!(?kind, "rejected invalid token"),
                }
                ApiError::Unauthorized(BAD_TOKEN.to_string())
            })
    }
}

/// AuthUser
///
/// The verified identity of a request, attached to the request extensions by
/// `authenticate`. Handlers behind that middleware can take it as an argument;
/// anywhere else the extractor rejects with 401.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            roles: claims.roles,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.to_string()))
    }
}

/// Pulls the raw token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// authenticate
///
/// First link of the protected chain. Rejects with 401 when the bearer token is missing,
/// malformed, badly signed or expired; otherwise attaches the `AuthUser` and continues.
pub async fn authenticate(
    State(verifier): State<TokenVerifier>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let token = bearer_token(&parts).ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.to_string()))?;
    let user = AuthUser::from(verifier.verify(token)?);

    tracing::debug!(sub = %user.id, roles = ?user.roles, "request authenticated");
    parts.extensions.insert(user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// RequiredRole
///
/// Per-route parameter for `require_role`, passed as the middleware state.
#[derive(Clone, Debug)]
pub struct RequiredRole(Arc<str>);

impl RequiredRole {
    pub fn new(role: impl Into<Arc<str>>) -> Self {
        Self(role.into())
    }

    pub fn admin() -> Self {
        Self::new(ADMIN_ROLE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// require_role
///
/// Second link of the protected chain; must be layered inside `authenticate`.
/// No attached identity → 401. Identity without the required role → 403.
pub async fn require_role(
    State(required): State<RequiredRole>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.to_string()))?;

    if !user.has_role(required.as_str()) {
        tracing::info!(sub = %user.id, required = required.as_str(), "role check failed");
        return Err(ApiError::Forbidden(format!(
            "{} privileges required",
            capitalize(required.as_str())
        )));
    }

    Ok(next.run(request).await)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
