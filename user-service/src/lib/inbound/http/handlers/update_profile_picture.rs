use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Role;
use crate::inbound::http::middleware::Principal;
use crate::inbound::http::router::AppState;

/// Replace the caller's profile picture. Body is the raw URL string.
///
/// Requires an authenticated end user carrying the USER role.
pub async fn update_profile_picture(
    State(state): State<AppState>,
    principal: Principal,
    picture_url: String,
) -> Result<ApiSuccess<UpdateProfilePictureResponseData>, ApiError> {
    if !principal.has_role(Role::User) {
        return Err(ApiError::Forbidden(
            "USER role required to update the profile picture".to_string(),
        ));
    }

    let user_id = match principal {
        Principal::EndUser { id, .. } => id,
        // Unreachable once the role check passed, but keep the match total.
        Principal::Service { .. } => {
            return Err(ApiError::Forbidden(
                "Service identities have no profile picture".to_string(),
            ))
        }
    };

    state
        .user_service
        .update_profile_picture(&user_id, picture_url)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UpdateProfilePictureResponseData {
            message: "Profile picture updated successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateProfilePictureResponseData {
    pub message: String,
}
