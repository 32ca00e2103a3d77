use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_profile::get_profile;
use super::handlers::get_user::get_user;
use super::handlers::hello::hello;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_profile::update_profile;
use super::middleware::authenticate as auth_middleware;
use super::middleware::panic_response;
use crate::domain::user::ports::IdentityServicePort;
use crate::domain::user::ports::TokenService;

const X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<dyn IdentityServicePort>,
}

pub fn create_router(
    identity_service: Arc<dyn IdentityServicePort>,
    token_service: Arc<dyn TokenService>,
) -> Router {
    let state = AppState { identity_service };

    let public_routes = Router::new()
        .route("/", get(hello))
        .route("/register", post(register))
        .route("/login", post(login));

    let protected_routes = Router::new()
        .route("/me", get(get_profile).patch(update_profile))
        .route("/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            token_service,
            auth_middleware,
        ));

    let routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state);

    with_http_layers(routes)
}

/// Wrap routes in the shared stack, outermost first: CORS, request id
/// assignment and echo, tracing, panic recovery.
fn with_http_layers(router: Router) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                request_id = %request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default(),
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

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}
