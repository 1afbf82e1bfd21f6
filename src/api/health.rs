use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::types::PendingAuthorization;

/// Liveness probe of the callback listener.
pub async fn health(
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuthorization>>>>,
) -> Json<Value> {
    let awaiting = shared_state
        .lock()
        .await
        .as_ref()
        .is_some_and(|p| p.reply.is_none());

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "awaiting_callback": awaiting,
    }))
}
