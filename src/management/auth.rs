use std::{io::ErrorKind, path::PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    error::AuthError,
    spotify::auth::{Credentials, request_token},
    types::Token,
    utils,
};

/// Seconds before the real expiry at which a token counts as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Cached Spotify token of one client id.
///
/// Tokens live in `<local data dir>/spyt/cache/token-<key>.json`, where the
/// key is derived from the client id, so switching applications never reuses
/// a token granted to another one.
pub struct TokenManager {
    client_id: String,
    token: Token,
}

impl TokenManager {
    /// Wraps a freshly obtained `token`; nothing is written until [`Self::persist`].
    pub fn new(client_id: &str, token: Token) -> Self {
        TokenManager {
            client_id: client_id.to_string(),
            token,
        }
    }

    /// Reads the cached token of `client_id`.
    ///
    /// Fails when no token was cached yet or the file cannot be parsed.
    pub async fn load(client_id: &str) -> Result<Self, String> {
        let path = Self::token_path(client_id);
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self::new(client_id, token))
    }

    /// Writes the token to the cache, creating the cache directory if needed.
    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path(&self.client_id);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Removes the cached token of `client_id`. A missing cache entry is fine.
    pub async fn clear(client_id: &str) -> Result<(), String> {
        match async_fs::remove_file(Self::token_path(client_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Returns an access token that is valid right now, refreshing if needed.
    ///
    /// A refreshed token is written back to the cache; a failed write is
    /// ignored because the in-memory token is still usable for this run.
    pub async fn get_valid_token(
        &mut self,
        client: &Client,
        credentials: &Credentials,
    ) -> Result<String, AuthError> {
        if self.is_expired() {
            let mut fresh = request_token(
                client,
                credentials,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", self.token.refresh_token.as_str()),
                ],
            )
            .await?;

            // Spotify may omit these on refresh; keep the old values then.
            if fresh.refresh_token.is_empty() {
                fresh.refresh_token = self.token.refresh_token.clone();
            }
            if fresh.scope.is_empty() {
                fresh.scope = self.token.scope.clone();
            }
            self.token = fresh;
            let _ = self.persist().await;
        }

        Ok(self.token.access_token.clone())
    }

    /// Whether the cached grant covers every scope in `required`.
    pub fn has_scopes(&self, required: &str) -> bool {
        let granted: Vec<&str> = self.token.scope.split_whitespace().collect();
        required.split_whitespace().all(|s| granted.contains(&s))
    }

    /// Whether the token expires within the next four minutes.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    /// The token as currently held, without checking its expiry.
    pub fn current_token(&self) -> &Token {
        &self.token
    }

    fn token_path(client_id: &str) -> PathBuf {
        let mut path = config::app_data_dir();
        path.push("cache");
        path.push(format!("token-{}.json", utils::cache_key(client_id)));
        path
    }
}
