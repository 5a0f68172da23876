use std::collections::HashSet;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::Profile;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Identity resolved by the authentication filter for one request.
///
/// A tagged variant rather than a single principal shape: a service identity
/// carries the authorities embedded in its token, an end user carries the
/// state looked up from the store at validation time. Stored in the request's
/// extensions, so it lives exactly as long as the request.
#[derive(Debug, Clone)]
pub enum Principal {
    Service {
        authorities: Vec<String>,
    },
    EndUser {
        id: UserId,
        username: Username,
        roles: HashSet<Role>,
        profile: Profile,
    },
}

impl Principal {
    /// Whether this principal carries the given role (end users only).
    pub fn has_role(&self, role: Role) -> bool {
        match self {
            Principal::Service { .. } => false,
            Principal::EndUser { roles, .. } => roles.contains(&role),
        }
    }
}

/// Extracting a `Principal` rejects with 401 when the filter left the
/// request unauthenticated.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Authentication filter, run once per request before any handler.
///
/// Never rejects a request by itself. A missing header, a mismatched prefix,
/// or an invalid token all forward the request unauthenticated; downstream
/// handlers decide whether anonymous access is allowed. Only a valid token
/// whose subject resolves to an identity installs a [`Principal`].
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let header_value = req
        .headers()
        .get(state.auth.header.as_str())
        .and_then(|value| value.to_str().ok());

    // No header, or a prefix that does not match exactly: the token is
    // absent, not invalid.
    let token = match header_value.and_then(|value| value.strip_prefix(state.auth.prefix.as_str()))
    {
        Some(token) => token,
        None => return next.run(req).await,
    };

    let claims = match state.token_codec.validate(token) {
        Ok(claims) => claims,
        Err(e) => {
            // Invalid tokens degrade to an unauthenticated request.
            tracing::warn!("token rejected: {}", e);
            return next.run(req).await;
        }
    };

    let principal = if claims.sub == state.auth.service_username {
        // Internal service-to-service credential: the embedded authorities
        // claim is trusted without a store lookup.
        Some(Principal::Service {
            authorities: claims.authorities().to_vec(),
        })
    } else {
        resolve_end_user(&state, &claims.sub).await
    };

    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// Look up a token subject in the user store.
///
/// A subject that no longer exists (deleted after the token was issued) or
/// is inactive yields no principal; the request proceeds unauthenticated
/// rather than faulting.
async fn resolve_end_user(state: &AppState, subject: &str) -> Option<Principal> {
    let username = Username::new(subject.to_string()).ok()?;

    match state.user_service.find_by_username(&username).await {
        Ok(user) if user.active => Some(Principal::EndUser {
            id: user.id,
            username: user.username,
            roles: user.roles,
            profile: user.profile,
        }),
        Ok(_) => {
            tracing::warn!(username = %username, "token subject is inactive");
            None
        }
        Err(UserError::NotFoundByUsername(_)) => {
            tracing::warn!(username = %username, "token subject no longer exists");
            None
        }
        Err(e) => {
            tracing::error!(username = %username, "user lookup failed during authentication: {}", e);
            None
        }
    }
}
