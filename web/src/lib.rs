use std::sync::Arc;

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use domain::connection_store::{ConnectionStore, DbConnectionStore};
use domain::gateway::{google, Provider};
use domain::identity::{IdentityVerifier, JwtIdentityVerifier};
use log::*;
use service::config::Config;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use self::error::{Error, Result};

mod controller;
mod error;
mod extractors;
mod params;
mod response;
pub mod router;

/// Request-handling state shared by every route.
///
/// Each capability sits behind a trait object so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub connection_store: Arc<dyn ConnectionStore>,
    pub identity_verifier: Arc<dyn IdentityVerifier>,
    pub provider: Arc<dyn Provider>,
}

impl AppState {
    /// Wires the production capabilities onto the service's infrastructure.
    ///
    /// Fails when the Google client registration or the identity secret is not configured.
    pub fn new(service_state: &service::AppState) -> core::result::Result<Self, domain::error::Error> {
        let config = service_state.config.clone();

        Ok(Self {
            connection_store: Arc::new(DbConnectionStore::new(
                &service_state.database_connection,
            )),
            identity_verifier: Arc::new(JwtIdentityVerifier::from_config(&config)?),
            provider: Arc::new(google::new_provider(&config)?),
            config,
        })
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{}:{}", interface, app_state.config.port);
    let listener = TcpListener::bind(&server_url).await?;

    info!("Server starting... listening for connections on http://{server_url}");

    let cors_layer = cors_layer(&app_state.config);
    let app = router::define_routes(app_state).layer(cors_layer);

    axum::serve(listener, app).await
}

/// Credentialed CORS cannot use a wildcard origin, so `*` is dropped from the list.
fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| {
            if *origin == "*" {
                warn!("Ignoring wildcard CORS origin, list each allowed origin explicitly");
            }
            !origin.is_empty() && *origin != "*"
        })
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!("Ignoring invalid CORS origin: {origin}"))
                .ok()
        })
        .collect();

    info!("CORS allowed origins: {allowed_origins:?}");

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allowed_origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::ORIGIN, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use clap::Parser;
    use tower::ServiceExt;

    fn config(allowed_origins: &str) -> Config {
        Config::try_parse_from(["sheets_link", "--allowed-origins", allowed_origins]).unwrap()
    }

    #[tokio::test]
    async fn wildcard_origin_is_dropped_instead_of_failing() {
        let app = Router::new()
            .route("/health", get(|| async { "healthy" }))
            .layer(cors_layer(&config("*,https://app.example.com")));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(ORIGIN, "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_cors_headers() {
        let app = Router::new()
            .route("/health", get(|| async { "healthy" }))
            .layer(cors_layer(&config("*")));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(ORIGIN, "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
