//! Spotify authorization-code flow.
//!
//! The flow reuses a cached token when one exists for the client id and
//! covers the required scopes. Otherwise it binds the callback listener on the
//! redirect port, opens the consent page in the browser and waits for the
//! redirect. The code from the redirect is exchanged for a token with the
//! client secret (HTTP basic auth), and the token is cached for the next run.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::{net::TcpListener, sync::Mutex, sync::oneshot, time::Instant};

use crate::{
    config,
    error::{AuthError, FetchError},
    info,
    management::TokenManager,
    server::start_api_server,
    success,
    types::{AuthorizationReply, PendingAuthorization, Token, TokenResponse},
    utils, warning,
};

/// Client credentials of the registered Spotify application.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// An authorized connection to the Spotify Web API, valid for one run.
#[derive(Debug, Clone)]
pub struct AuthSession {
    client: Client,
    access_token: String,
    cached: bool,
}

impl AuthSession {
    /// `cached` tells whether the token came from the token cache rather than
    /// from a consent the user just gave.
    pub fn new(client: Client, access_token: String, cached: bool) -> Self {
        Self {
            client,
            access_token,
            cached,
        }
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Whether `error` means Spotify no longer accepts the cached token.
    ///
    /// A token from a consent given in this run is never treated as stale.
    pub fn is_rejected_by(&self, error: &FetchError) -> bool {
        self.cached && matches!(error, FetchError::Unauthorized)
    }
}

/// Produces an [`AuthSession`], from cache if possible, interactively otherwise.
///
/// # Errors
///
/// Any [`AuthError`] of the interactive path: the user denied consent, the
/// callback never arrived, the listener could not bind or the token endpoint
/// rejected the code. Problems with the cached token are never returned;
/// they only cause the interactive path to run.
pub async fn authorize(credentials: &Credentials) -> Result<AuthSession, AuthError> {
    let client = Client::new();

    if let Some(access_token) = cached_token(&client, credentials).await {
        success!("Reusing cached Spotify authorization.");
        return Ok(AuthSession::new(client, access_token, true));
    }

    interactive_session(client, credentials).await
}

/// Drops the cached token of the client and runs the interactive flow again.
///
/// Used when Spotify rejects a cached token that has not expired yet, for
/// example after the user revoked the application's access.
pub async fn reauthorize(credentials: &Credentials) -> Result<AuthSession, AuthError> {
    if let Err(e) = TokenManager::clear(&credentials.client_id).await {
        warning!("Failed to remove cached token: {}", e);
    }

    interactive_session(Client::new(), credentials).await
}

async fn interactive_session(
    client: Client,
    credentials: &Credentials,
) -> Result<AuthSession, AuthError> {
    let token = authorize_interactive(&client, credentials).await?;
    let manager = TokenManager::new(&credentials.client_id, token);
    if let Err(e) = manager.persist().await {
        warning!("Failed to save token to cache: {}", e);
    }

    success!("Successfully authenticated with Spotify!");
    Ok(AuthSession::new(
        client,
        manager.current_token().access_token.clone(),
        false,
    ))
}

async fn cached_token(client: &Client, credentials: &Credentials) -> Option<String> {
    let mut manager = TokenManager::load(&credentials.client_id).await.ok()?;
    if !manager.has_scopes(config::SPOTIFY_SCOPE) {
        return None;
    }

    match manager.get_valid_token(client, credentials).await {
        Ok(token) => Some(token),
        Err(e) => {
            warning!("Cached token cannot be refreshed: {}", e);
            None
        }
    }
}

async fn authorize_interactive(
    client: &Client,
    credentials: &Credentials,
) -> Result<Token, AuthError> {
    let state = utils::generate_state();
    let auth_url = authorize_url(credentials, &state)?;
    let addr = config::callback_addr(redirect_port(&credentials.redirect_uri)?);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| AuthError::Listener {
            addr: addr.clone(),
            source,
        })?;

    let shared_state = Arc::new(Mutex::new(Some(PendingAuthorization {
        state,
        reply: None,
    })));
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, server_state, shutdown_rx).await {
            warning!("Callback listener stopped: {}", e);
        }
    });

    info!("Opening browser for Spotify authentication...");
    info!("Please log in and authorize the application.");
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let reply = wait_for_reply(
        shared_state,
        Duration::from_secs(config::AUTH_TIMEOUT_SECS),
    )
    .await;

    let _ = shutdown_tx.send(());
    let _ = server.await;

    match reply {
        Some(AuthorizationReply::Code(code)) => exchange_code(client, credentials, &code).await,
        Some(AuthorizationReply::Denied(reason)) => Err(AuthError::Denied(reason)),
        Some(AuthorizationReply::StateMismatch) => Err(AuthError::StateMismatch),
        None => Err(AuthError::TimedOut(config::AUTH_TIMEOUT_SECS)),
    }
}

/// Builds the consent page URL for the authorization-code flow.
pub fn authorize_url(credentials: &Credentials, state: &str) -> Result<Url, AuthError> {
    let base = config::spotify_apiauth_url();
    Url::parse_with_params(
        &base,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("scope", config::SPOTIFY_SCOPE),
            ("state", state),
        ],
    )
    .map_err(|_| AuthError::RedirectUri(base))
}

fn redirect_port(redirect_uri: &str) -> Result<u16, AuthError> {
    Url::parse(redirect_uri)
        .ok()
        .and_then(|u| u.port_or_known_default())
        .ok_or_else(|| AuthError::RedirectUri(redirect_uri.to_string()))
}

async fn wait_for_reply(
    shared_state: Arc<Mutex<Option<PendingAuthorization>>>,
    max_wait: Duration,
) -> Option<AuthorizationReply> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(reply) = lock.as_ref().and_then(|p| p.reply.clone()) {
            return Some(reply);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}

pub async fn exchange_code(
    client: &Client,
    credentials: &Credentials,
    code: &str,
) -> Result<Token, AuthError> {
    request_token(
        client,
        credentials,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Posts `form` to the token endpoint, authenticating with the client secret.
pub async fn request_token(
    client: &Client,
    credentials: &Credentials,
    form: &[(&str, &str)],
) -> Result<Token, AuthError> {
    let res = client
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(form)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(AuthError::Rejected { status, body });
    }

    let json: TokenResponse = res.json().await?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token: json.refresh_token.unwrap_or_default(),
        scope: json.scope.unwrap_or_default(),
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
