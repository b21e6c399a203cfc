//! Axum router setup.

use crate::config::ServerConfig;
use crate::handlers::notes;
use crate::storage::VaultStorage;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(storage: VaultStorage, config: &ServerConfig) -> Router {
    Router::new()
        .route(
            "/api/notes/{id}",
            get(notes::fetch_note).delete(notes::delete_note),
        )
        .route("/api/notes", post(notes::save_note))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_payload_size))
        .with_state(storage)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        build_router(VaultStorage::in_memory().unwrap(), &ServerConfig::default())
    }

    fn save_body(sync_id: &str, content: &str, hash: &str) -> Body {
        Body::from(
            serde_json::json!({
                "syncId": sync_id,
                "encryptedContent": content,
                "hash": hash,
            })
            .to_string(),
        )
    }

    async fn json_of(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_vault_is_404() {
        let response = test_router()
            .oneshot(
                Request::get("/api/notes/ghost")
                    .header("x-vault-hash", "fp-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_of(response).await["error"], "Vault not found");
    }

    #[tokio::test]
    async fn test_get_without_hash_is_400() {
        let response = test_router()
            .oneshot(Request::get("/api/notes/alpha").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_then_fetch_roundtrip() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/notes")
                    .header("content-type", "application/json")
                    .body(save_body("alpha", "ciphertext-blob", "fp-1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await["success"], true);

        let response = app
            .oneshot(
                Request::get("/api/notes/alpha")
                    .header("x-vault-hash", "fp-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_of(response).await;
        assert_eq!(body["encryptedContent"], "ciphertext-blob");
        assert_eq!(body["hash"], "fp-1");
        assert!(body["lastUpdated"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_save_missing_fields_is_400() {
        let response = test_router()
            .oneshot(
                Request::post("/api/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"syncId": "alpha"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "Missing data");
    }

    #[tokio::test]
    async fn test_ownership_lock_on_push() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/notes")
                    .header("content-type", "application/json")
                    .body(save_body("alpha", "owner-blob", "fp-1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // A different fingerprint cannot overwrite.
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/notes")
                    .header("content-type", "application/json")
                    .body(save_body("alpha", "hijack-blob", "fp-2"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // The stored record is unchanged.
        let response = app
            .oneshot(
                Request::get("/api/notes/alpha")
                    .header("x-vault-hash", "fp-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_of(response).await["encryptedContent"], "owner-blob");
    }

    #[tokio::test]
    async fn test_get_with_wrong_hash_is_403() {
        let app = test_router();

        app.clone()
            .oneshot(
                Request::post("/api/notes")
                    .header("content-type", "application/json")
                    .body(save_body("alpha", "blob", "fp-1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::get("/api/notes/alpha")
                    .header("x-vault-hash", "fp-2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let app = test_router();

        app.clone()
            .oneshot(
                Request::post("/api/notes")
                    .header("content-type", "application/json")
                    .body(save_body("alpha", "blob", "fp-1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        // Wrong fingerprint: refused.
        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/notes/alpha")
                    .header("x-vault-hash", "fp-2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Matching fingerprint: removed.
        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/notes/alpha")
                    .header("x-vault-hash", "fp-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Gone now.
        let response = app
            .oneshot(
                Request::delete("/api/notes/alpha")
                    .header("x-vault-hash", "fp-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
