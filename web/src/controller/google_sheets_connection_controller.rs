//! Controller for linking a caller's Google account for Sheets access.
//!
//! Every route requires the host application's bearer token, including the
//! callback, which the frontend forwards after Google redirects back to it.

use crate::extractors::authenticated_caller::AuthenticatedCaller;
use crate::params::google_sheets_connection::{CallbackParams, StartParams, StartQuery};
use crate::response::google_sheets_connection::{ConnectionResponse, StartResponse};
use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header::LOCATION, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{Error as DomainError, LinkErrorKind};
use domain::google_sheets_connection as GoogleSheetsConnectionApi;
use log::*;

/// POST begin linking a Google account
#[utoipa::path(
    post,
    path = "/integrations/google-sheets/start",
    request_body(content = StartParams, description = "Optional; an empty body uses the default path", content_type = "application/json"),
    responses(
        (status = 200, description = "Google authorization URL to send the user to", body = StartResponse),
        (status = 400, description = "Body is not valid StartParams JSON"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn start(
    AuthenticatedCaller(caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let params = start_params(&body)?;
    Ok(start_response(&app_state, &caller, params.redirect_path))
}

/// GET begin linking a Google account
#[utoipa::path(
    get,
    path = "/integrations/google-sheets/start",
    params(StartQuery),
    responses(
        (status = 200, description = "Google authorization URL to send the user to", body = StartResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn start_get(
    AuthenticatedCaller(caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Query(params): Query<StartQuery>,
) -> Result<impl IntoResponse, Error> {
    Ok(start_response(&app_state, &caller, params.redirect_path))
}

/// An empty or blank body means no parameters were given.
fn start_params(body: &[u8]) -> Result<StartParams, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartParams::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected start request body: {e}");
        Error::from(DomainError::link(
            LinkErrorKind::InvalidRequest,
            &e.to_string(),
        ))
    })
}

fn start_response(
    app_state: &AppState,
    caller: &domain::identity::AuthenticatedCaller,
    redirect_path: Option<String>,
) -> Json<StartResponse> {
    let authorization_url = GoogleSheetsConnectionApi::start(
        &app_state.config,
        app_state.provider.as_ref(),
        caller,
        redirect_path.as_deref(),
    );

    Json(StartResponse { authorization_url })
}

/// GET complete linking after Google redirects back
#[utoipa::path(
    get,
    path = "/integrations/google-sheets/callback",
    params(CallbackParams),
    responses(
        (status = 302, description = "Redirect to the in-app path the flow was started from"),
        (status = 400, description = "Invalid or foreign state"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Google rejected the authorization code"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn callback(
    AuthenticatedCaller(caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    if let Some(error) = &params.error {
        warn!(
            "Google returned authorization error {error:?} for user {}",
            caller.user_id
        );
    }

    let state = params
        .state
        .as_deref()
        .ok_or_else(|| DomainError::link(LinkErrorKind::InvalidState, "missing state"))?;

    let redirect_url = GoogleSheetsConnectionApi::callback(
        &app_state.config,
        app_state.connection_store.as_ref(),
        app_state.provider.as_ref(),
        &caller,
        params.code.as_deref(),
        state,
    )
    .await?;

    Ok((StatusCode::FOUND, [(LOCATION, redirect_url.to_string())]))
}

/// POST revoke the caller's Google connection
#[utoipa::path(
    post,
    path = "/integrations/google-sheets/revoke",
    responses(
        (status = 204, description = "Connection revoked, or there was none"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn revoke(
    AuthenticatedCaller(caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    GoogleSheetsConnectionApi::revoke(
        app_state.connection_store.as_ref(),
        app_state.provider.as_ref(),
        &caller,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET the caller's Google connection
#[utoipa::path(
    get,
    path = "/integrations/google-sheets/connection",
    responses(
        (status = 200, description = "Connection details without tokens", body = ConnectionResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedCaller(caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Google Sheets connection for user {}", caller.user_id);

    let connection =
        GoogleSheetsConnectionApi::status(app_state.connection_store.as_ref(), &caller).await?;

    Ok(Json(ConnectionResponse::from(connection)))
}
