use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::types::{AuthorizationReply, PendingAuthorization};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuthorization>>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(pending) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    // Only the first redirect counts.
    if pending.reply.is_some() {
        return Html("<h4>Authorization already received.</h4>");
    }

    let reply = read_reply(&params, &pending.state);
    let page = match reply {
        AuthorizationReply::Code(_) => Html(
            "<h2>Authentication successful!</h2><p>You can close this window and return to the terminal.</p>",
        ),
        AuthorizationReply::Denied(_) => Html("<h4>Authorization denied.</h4>"),
        AuthorizationReply::StateMismatch => Html("<h4>Login failed.</h4>"),
    };
    pending.reply = Some(reply);
    page
}

/// Interprets the redirect query of the authorization-code flow.
pub fn read_reply(params: &HashMap<String, String>, expected_state: &str) -> AuthorizationReply {
    if params.get("state").map(String::as_str) != Some(expected_state) {
        return AuthorizationReply::StateMismatch;
    }

    if let Some(error) = params.get("error") {
        return AuthorizationReply::Denied(error.clone());
    }

    match params.get("code") {
        Some(code) if !code.is_empty() => AuthorizationReply::Code(code.clone()),
        _ => AuthorizationReply::Denied("missing authorization code".to_string()),
    }
}
