//! Linking a host application user to their Google account for Sheets access.
//!
//! The flow is three independent operations. [`start`] hands the caller an
//! authorization URL whose `state` carries everything needed to finish the flow,
//! [`callback`] completes the link and stores the connection, and [`revoke`]
//! invalidates it. No state is kept in memory between requests.

use chrono::Utc;
use log::*;
use secrecy::ExposeSecret;
use service::config::Config;
use sheets_auth::oauth::{IdentityAssertion, StateToken};
use url::Url;

use crate::connection_status::ConnectionStatus;
use crate::connection_store::ConnectionStore;
use crate::error::{DomainErrorKind, Error, InternalErrorKind, LinkErrorKind};
use crate::gateway::{Provider, TokenGrant};
use crate::google_sheets_connections::Model;
use crate::identity::AuthenticatedCaller;
use crate::Id;

/// Builds the Google authorization URL for `caller`.
///
/// `redirect_path` is where the caller lands once the flow completes. A missing or
/// unsafe path falls back to the configured default.
pub fn start(
    config: &Config,
    provider: &dyn Provider,
    caller: &AuthenticatedCaller,
    redirect_path: Option<&str>,
) -> String {
    let redirect_path = match redirect_path {
        Some(path) if is_safe_redirect_path(path) => path,
        Some(path) => {
            warn!(
                "Ignoring unsafe redirect path {:?} for user {}",
                path, caller.user_id
            );
            config.default_redirect_path()
        }
        None => config.default_redirect_path(),
    };

    let state = StateToken::new(&caller.user_id, redirect_path).encode();
    let authorization_url = provider.authorization_url(&state);

    info!("Redirecting user {} to Google OAuth", caller.user_id);
    authorization_url
}

/// Completes the flow: validates `state`, exchanges `code`, and stores the connection.
///
/// Returns the in-app URL to redirect the caller to. Nothing is written unless
/// every step succeeds, in which case the store is written exactly once.
pub async fn callback(
    config: &Config,
    store: &dyn ConnectionStore,
    provider: &dyn Provider,
    caller: &AuthenticatedCaller,
    code: Option<&str>,
    state: &str,
) -> Result<Url, Error> {
    info!("Processing Google OAuth callback for user {}", caller.user_id);

    let state = StateToken::decode(state)
        .inspect_err(|e| warn!("Rejected undecodable state for user {}: {e}", caller.user_id))?;

    if state.user_id != caller.user_id {
        warn!(
            "State minted for user {} presented by user {}",
            state.user_id, caller.user_id
        );
        return Err(Error::link(
            LinkErrorKind::InvalidState,
            "state was issued to a different user",
        ));
    }

    let redirect_url = resolve_redirect(config, &state.redirect_path)?;

    let code = code.filter(|c| !c.is_empty()).ok_or_else(|| {
        Error::link(
            LinkErrorKind::TokenExchangeFailed,
            "authorization was not granted",
        )
    })?;

    let exchanged = provider.exchange_code(code).await.inspect_err(|e| {
        warn!(
            "Failed to exchange OAuth code for user {}: {:?}",
            caller.user_id, e
        )
    })?;

    let id_token = exchanged.id_token.as_deref().ok_or_else(|| {
        Error::link(
            LinkErrorKind::TokenExchangeFailed,
            "token response carried no id_token",
        )
    })?;
    let identity = IdentityAssertion::decode(id_token)?;

    let existing = store.find_by_user(&caller.user_id).await?;
    let connection = linked_connection(caller, identity, exchanged.grant, existing);

    store.upsert(connection).await?;

    info!(
        "Successfully linked Google account for user {}",
        caller.user_id
    );
    Ok(redirect_url)
}

/// Marks the caller's connection revoked after asking Google to invalidate the grant.
///
/// Revoking when there is no active connection succeeds without contacting Google.
/// A failed upstream revocation is logged and does not block the local transition.
pub async fn revoke(
    store: &dyn ConnectionStore,
    provider: &dyn Provider,
    caller: &AuthenticatedCaller,
) -> Result<(), Error> {
    let Some(connection) = store.find_by_user(&caller.user_id).await? else {
        debug!("No Google connection to revoke for user {}", caller.user_id);
        return Ok(());
    };

    if !connection.is_active() {
        debug!(
            "Google connection for user {} is already revoked",
            caller.user_id
        );
        return Ok(());
    }

    let token = connection
        .refresh_token
        .as_deref()
        .unwrap_or(&connection.access_token);
    if let Err(e) = provider.revoke_token(token).await {
        warn!(
            "Google did not confirm revocation for user {}, revoking locally: {:?}",
            caller.user_id, e
        );
    }

    store
        .upsert(Model {
            status: ConnectionStatus::Revoked,
            updated_at: Utc::now().into(),
            ..connection
        })
        .await?;

    info!("Revoked Google connection for user {}", caller.user_id);
    Ok(())
}

/// Returns the caller's connection, if one was ever made.
pub async fn status(
    store: &dyn ConnectionStore,
    caller: &AuthenticatedCaller,
) -> Result<Option<Model>, Error> {
    store.find_by_user(&caller.user_id).await
}

fn linked_connection(
    caller: &AuthenticatedCaller,
    identity: IdentityAssertion,
    grant: TokenGrant,
    existing: Option<Model>,
) -> Model {
    let now = Utc::now();

    // A re-link keeps the sheet selection. The old refresh token survives only
    // for the same Google account.
    let (id, created_at, spreadsheet_id, sheet_id, sheet_title, previous_refresh) =
        match existing {
            Some(existing) => {
                let previous_refresh = (existing.google_user_id == identity.subject_id)
                    .then_some(existing.refresh_token)
                    .flatten();
                (
                    existing.id,
                    existing.created_at,
                    existing.spreadsheet_id,
                    existing.sheet_id,
                    existing.sheet_title,
                    previous_refresh,
                )
            }
            None => (Id::new_v4(), now.into(), None, None, None, None),
        };

    Model {
        id,
        user_id: caller.user_id.clone(),
        google_user_id: identity.subject_id,
        google_email: Some(identity.email),
        spreadsheet_id,
        sheet_id,
        sheet_title,
        access_token: grant.access_token.expose_secret().to_string(),
        refresh_token: grant
            .refresh_token
            .map(|t| t.expose_secret().to_string())
            .or(previous_refresh),
        access_token_expires_at: grant.expires_at.into(),
        scopes: grant.scopes.join(" "),
        status: ConnectionStatus::Active,
        created_at,
        updated_at: now.into(),
    }
}

/// A redirect path must be an absolute in-app path: a single leading `/`, no
/// scheme-relative `//` prefix and no backslashes or control characters.
fn is_safe_redirect_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

/// Resolves a redirect path against the configured application origin.
fn resolve_redirect(config: &Config, path: &str) -> Result<Url, Error> {
    let origin = Url::parse(config.app_origin()).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    })?;

    if !is_safe_redirect_path(path) {
        warn!("State carried unsafe redirect path {:?}", path);
        return Err(Error::link(
            LinkErrorKind::InvalidState,
            "state carried an unsafe redirect path",
        ));
    }

    match origin.join(path) {
        Ok(url) if url.origin() == origin.origin() => Ok(url),
        _ => Err(Error::link(
            LinkErrorKind::InvalidState,
            "redirect path does not resolve within the application origin",
        )),
    }
}
