use std::sync::Arc;

use auth::AuthError;
use auth::Authenticator;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;

const BEARER_SCHEME: &str = "Bearer";

/// Identity of the caller, established by [`authenticate`].
///
/// Lives in the request extensions for the duration of one request. Handlers
/// take it as an extractor argument; reaching such a handler without it is
/// rejected with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedContext {
    pub user_id: UserId,
}

/// Middleware that validates bearer tokens and attaches an [`AuthenticatedContext`].
///
/// Rejected requests never reach the inner handler.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = authorize(req.headers(), &authenticator).map_err(|e| {
        tracing::warn!(
            method = %req.method(),
            uri = %req.uri(),
            reason = %e,
            "Request rejected by auth gate"
        );
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Resolve the caller identity from request headers.
///
/// # Errors
/// * `Missing` - No `Authorization` header
/// * `Malformed` - Header is not `Bearer <token>`, the token cannot be parsed,
///   or its subject is not a user id
/// * `InvalidSignature` - Token was not signed with the configured key
/// * `Expired` - Token is past its expiry
pub fn authorize(
    headers: &HeaderMap,
    authenticator: &Authenticator,
) -> Result<AuthenticatedContext, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = authenticator.verify_token(token)?;

    let user_id = UserId::from_string(&claims.sub)
        .map_err(|e| AuthError::Malformed(format!("Invalid subject: {}", e)))?;

    Ok(AuthenticatedContext { user_id })
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Malformed("Authorization header is not ASCII".to_string()))?;

    // Scheme names are case-insensitive.
    let token = value
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
        .map(|(_, token)| token.trim())
        .ok_or_else(|| {
            AuthError::Malformed("Expected Authorization: Bearer <token>".to_string())
        })?;

    if token.is_empty() {
        return Err(AuthError::Malformed("Empty bearer token".to_string()));
    }

    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedContext>()
            .copied()
            .ok_or_else(|| {
                tracing::error!(uri = %parts.uri, "Handler reached without auth gate");
                ApiError::from(AuthError::Missing)
            })
    }
}
