use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;
use crate::user::models::Username;

pub async fn get_user_summary(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<ApiSuccess<UserSummaryData>, ApiError> {
    let username = Username::new(username).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .find_by_username(&username)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// Batch summary lookup. Usernames that don't resolve (unknown or not even
/// valid usernames) are silently omitted from the result.
pub async fn get_user_summaries(
    State(state): State<AppState>,
    Json(usernames): Json<Vec<String>>,
) -> Result<ApiSuccess<Vec<UserSummaryData>>, ApiError> {
    let usernames: Vec<Username> = usernames
        .into_iter()
        .filter_map(|name| Username::new(name).ok())
        .collect();

    state
        .user_service
        .find_by_usernames(&usernames)
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                users.iter().map(UserSummaryData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummaryData {
    pub id: String,
    pub username: String,
    pub name: String,
    pub profile_picture: Option<String>,
}

impl From<&User> for UserSummaryData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            name: user.profile.display_name.clone(),
            profile_picture: user.profile.profile_picture_url.clone(),
        }
    }
}
