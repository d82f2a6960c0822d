use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /integrations/google-sheets/start`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartParams {
    /// In-app path to return to once Google access is granted.
    pub(crate) redirect_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub(crate) struct StartQuery {
    /// In-app path to return to once Google access is granted.
    pub(crate) redirect_path: Option<String>,
}

/// Query Google appends when redirecting back to the callback.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CallbackParams {
    /// Authorization code; absent when the user declined access.
    pub(crate) code: Option<String>,
    /// The state issued by start.
    pub(crate) state: Option<String>,
    /// Set by Google instead of `code` when authorization failed.
    pub(crate) error: Option<String>,
}
