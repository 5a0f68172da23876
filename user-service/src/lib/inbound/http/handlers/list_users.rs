use axum::extract::State;
use axum::http::StatusCode;

use super::get_user::GetUserResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<GetUserResponseData>>, ApiError> {
    state
        .user_service
        .find_all()
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                users.iter().map(GetUserResponseData::from).collect(),
            )
        })
}
