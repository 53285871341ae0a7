use std::sync::Arc;

use axum::extract::FromRef;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use sportmatch_shared::middleware::metrics_middleware;
use sportmatch_shared::types::auth::JwtKeys;

pub mod config;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;

use config::AppConfig;
use store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig, metrics_handle: PrometheusHandle) -> Self {
        let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_ttl_secs);
        Self {
            store,
            config: Arc::new(config),
            jwt,
            metrics_handle,
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        // Accounts
        .route("/register", post(routes::register::register))
        .route("/login", post(routes::login::login))
        .route("/me", get(routes::me::me))
        // Profiles
        .route("/profiles", get(routes::profiles::list_profiles).post(routes::profiles::create_profile))
        .route(
            "/profiles/:id",
            get(routes::profiles::get_profile)
                .put(routes::profiles::update_profile)
                .delete(routes::profiles::delete_profile),
        )
        // Likes and matches
        .route("/likes", post(routes::likes::submit_like))
        .route("/likes/check/:target_id", get(routes::likes::check_like))
        .route("/users/:id/matches", get(routes::matches::list_matched_users))
        .route("/matches", get(routes::matches::list_matches).post(routes::matches::create_match))
        .route("/matches/:id", get(routes::matches::get_match))
        // Inbox
        .route("/messages", get(routes::messages::list_messages).post(routes::messages::send_message))
        .route("/messages/read", patch(routes::messages::mark_read))
        .route("/messages/unread", get(routes::messages::unread_count))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origin_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    tracing::info!(count = origins.len(), "CORS restricted to configured origins");
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
}
