use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenCodec;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_user::current_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::register_user::register_user;
use super::handlers::signin::signin;
use super::handlers::update_profile_picture::update_profile_picture;
use super::handlers::user_summaries::get_user_summaries;
use super::handlers::user_summaries::get_user_summary;
use super::middleware::authenticate as auth_filter;
use crate::config::JwtConfig;
use crate::domain::user::ports::UserServicePort;

/// Bearer-token filter settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub header: String,
    pub prefix: String,
    pub service_username: String,
}

impl From<&JwtConfig> for AuthSettings {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            header: jwt.header.clone(),
            prefix: jwt.prefix.clone(),
            service_username: jwt.service_username.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub token_codec: Arc<TokenCodec>,
    pub password_hasher: Arc<PasswordHasher>,
    pub auth: Arc<AuthSettings>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    token_codec: Arc<TokenCodec>,
    auth: AuthSettings,
) -> Router {
    let state = AppState {
        user_service,
        token_codec,
        password_hasher: Arc::new(PasswordHasher::new()),
        auth: Arc::new(auth),
    };

    // The authentication filter runs on every route and never rejects;
    // handlers that need an identity extract a Principal themselves.
    let routes = Router::new()
        .route("/api/auth/signin", post(signin))
        .route("/api/users", post(register_user).get(list_users))
        .route("/api/users/me", get(current_user))
        .route("/api/users/me/picture", put(update_profile_picture))
        .route("/api/users/summary/in", post(get_user_summaries))
        .route("/api/users/summary/:username", get(get_user_summary))
        .route("/api/users/:username", get(get_user))
        .layer(middleware::from_fn_with_state(state.clone(), auth_filter));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    routes
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
