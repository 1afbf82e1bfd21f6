use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};

use crate::{api, types::PendingAuthorization};

pub fn router(state: Arc<Mutex<Option<PendingAuthorization>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

/// Serves the callback routes on `listener` until `shutdown` fires.
pub async fn start_api_server(
    listener: TcpListener,
    state: Arc<Mutex<Option<PendingAuthorization>>>,
    shutdown: oneshot::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
}
