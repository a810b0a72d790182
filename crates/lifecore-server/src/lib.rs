//! LifeCore Relay Server
//!
//! Accepts messages sealed for the server's X25519 key, opens them and
//! persists the plaintext. A store-only endpoint keeps opaque payloads
//! as they arrive.

pub mod config;
pub mod handlers;
pub mod services;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use config::ServerConfig;
use lifecore_core::ports::PayloadStore;
use services::RelayService;
use storage::{FileStore, MemoryStore};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/receive", post(handlers::receive::store))
        .route("/receive_box", post(handlers::receive::open_box))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Browser clients post from other origins
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the store, relay and router described by `config`. Returns the
/// router and the address to listen on.
pub async fn app_from_config(config: ServerConfig) -> Result<(Router, String)> {
    let addr = config.listen_address();

    let store: Arc<dyn PayloadStore> = if config.uses_memory_storage() {
        warn!("Using in-memory storage; received messages are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let store = FileStore::new(&config.storage_dir)
            .await
            .with_context(|| format!("Failed to create storage directory {}", config.storage_dir))?;
        info!("Storage directory: {}", store.dir().display());
        Arc::new(store)
    };

    if config.echo_plaintext {
        warn!("ECHO_PLAINTEXT is on; decrypted messages are returned to the sender");
    }

    let relay = RelayService::new(config.identity, store).with_echo_plaintext(config.echo_plaintext);
    let app = router(AppState {
        relay: Arc::new(relay),
    });

    Ok((app, addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use lifecore_core::KeyPair;
    use serde_json::Value;
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn config(vars: &[(&str, String)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ServerConfig::from_lookup(move |key| vars.get(key).cloned()).unwrap()
    }

    async fn health(app: Router) -> Value {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_app_from_memory_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config(&[
            ("PORT", "8081".to_string()),
            ("STORAGE_DIR", ":memory:".to_string()),
            (
                "SERVER_PRIV_FILE",
                tmp.path().join("missing.b64").to_string_lossy().to_string(),
            ),
        ]);

        let (app, addr) = app_from_config(config).await.unwrap();

        assert_eq!(addr, "0.0.0.0:8081");
        assert_eq!(health(app).await["key_configured"], false);
    }

    #[tokio::test]
    async fn test_app_from_file_config_creates_storage() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = tmp.path().join("nested/received");
        let server = KeyPair::generate().unwrap();
        let config = config(&[
            ("BIND_ADDRESS", "127.0.0.1".to_string()),
            ("STORAGE_DIR", storage.to_string_lossy().to_string()),
            ("SERVER_PRIV_B64", server.secret_key.to_base64()),
        ]);

        let (app, addr) = app_from_config(config).await.unwrap();

        assert_eq!(addr, "127.0.0.1:3000");
        assert!(storage.is_dir());
        assert_eq!(health(app).await["key_configured"], true);
    }
}
