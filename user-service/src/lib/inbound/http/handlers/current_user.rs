use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::Principal;

/// Profile summary of the authenticated caller.
///
/// Only end users have a profile; a service identity gets 403.
pub async fn current_user(
    principal: Principal,
) -> Result<ApiSuccess<CurrentUserResponseData>, ApiError> {
    match principal {
        Principal::EndUser {
            id,
            username,
            profile,
            ..
        } => Ok(ApiSuccess::new(
            StatusCode::OK,
            CurrentUserResponseData {
                id: id.to_string(),
                username: username.as_str().to_string(),
                name: profile.display_name,
                profile_picture: profile.profile_picture_url,
            },
        )),
        Principal::Service { .. } => Err(ApiError::Forbidden(
            "Service identities have no user profile".to_string(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub id: String,
    pub username: String,
    pub name: String,
    pub profile_picture: Option<String>,
}
