use crate::{
    controller::{google_sheets_connection_controller, health_check_controller},
    params, response, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Sheets Link API"
        ),
        paths(
            google_sheets_connection_controller::start,
            google_sheets_connection_controller::start_get,
            google_sheets_connection_controller::callback,
            google_sheets_connection_controller::revoke,
            google_sheets_connection_controller::read,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::connection_status::ConnectionStatus,
                params::google_sheets_connection::StartParams,
                response::google_sheets_connection::StartResponse,
                response::google_sheets_connection::ConnectionResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "sheets_link", description = "Google Sheets account linking API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Every integration route expects the host application's JWT as a bearer token.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(google_sheets_connection_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn google_sheets_connection_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/integrations/google-sheets/start",
            post(google_sheets_connection_controller::start)
                .get(google_sheets_connection_controller::start_get),
        )
        .route(
            "/integrations/google-sheets/callback",
            get(google_sheets_connection_controller::callback),
        )
        .route(
            "/integrations/google-sheets/revoke",
            post(google_sheets_connection_controller::revoke),
        )
        .route(
            "/integrations/google-sheets/connection",
            get(google_sheets_connection_controller::read),
        )
        .with_state(app_state)
}
