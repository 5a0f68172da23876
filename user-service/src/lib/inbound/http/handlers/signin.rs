use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Verify credentials and issue a bearer token.
///
/// Unknown usernames, inactive accounts, and wrong passwords are
/// indistinguishable from the outside: all answer 401.
pub async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequestBody>,
) -> Result<ApiSuccess<SigninResponseData>, ApiError> {
    let invalid_credentials = || ApiError::Unauthorized("Invalid credentials".to_string());

    let username =
        Username::new(body.username).map_err(|_| invalid_credentials())?;

    let user = state
        .user_service
        .find_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => invalid_credentials(),
            _ => ApiError::from(e),
        })?;

    if !user.active {
        return Err(invalid_credentials());
    }

    let password_matches = state
        .password_hasher
        .verify(&body.password, &user.password_hash)
        .map_err(|e| {
            ApiError::InternalServerError(format!("Password verification failed: {}", e))
        })?;

    if !password_matches {
        return Err(invalid_credentials());
    }

    // Ordinary users get no embedded authorities; the filter resolves their
    // roles from the store on each request.
    let token = state
        .token_codec
        .issue(user.username.as_str())
        .map_err(|e| ApiError::InternalServerError(format!("Token issuance failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SigninResponseData {
            user: (&user).into(),
            token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SigninRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigninResponseData {
    pub user: UserData,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.profile.display_name.clone(),
            profile_picture_url: user.profile.profile_picture_url.clone(),
            created_at: user.created_at,
        }
    }
}
