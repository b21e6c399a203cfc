//! Note fetch/save/delete handlers.
//!
//! Every operation presents the ownership fingerprint: in the
//! `x-vault-hash` header for GET and DELETE, in the body for POST. A
//! record is mutated or disclosed only when the presented fingerprint
//! matches the stored one.

use crate::error::ServerError;
use crate::storage::{RemoveOutcome, UpsertOutcome, VaultStorage};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Header carrying the ownership fingerprint.
pub const VAULT_HASH_HEADER: &str = "x-vault-hash";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub encrypted_content: String,
    pub hash: String,
    pub last_updated: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteRequest {
    #[serde(default)]
    pub sync_id: String,
    #[serde(default)]
    pub encrypted_content: String,
    #[serde(default)]
    pub hash: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn presented_hash(headers: &HeaderMap) -> Result<String, ServerError> {
    headers
        .get(VAULT_HASH_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or_else(|| ServerError::BadRequest("Missing vault hash".to_string()))
}

pub async fn fetch_note(
    State(storage): State<VaultStorage>,
    Path(sync_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<NoteResponse>, ServerError> {
    let hash = presented_hash(&headers)?;

    let record = storage
        .fetch(&sync_id)?
        .ok_or_else(|| ServerError::NotFound("Vault not found".to_string()))?;

    if record.fingerprint != hash {
        tracing::warn!(sync_id = %sync_id, "fetch refused: fingerprint mismatch");
        return Err(ServerError::Forbidden(
            "This ID is already taken by someone else".to_string(),
        ));
    }

    Ok(Json(NoteResponse {
        encrypted_content: record.encrypted_blob,
        hash: record.fingerprint,
        last_updated: record.last_updated,
    }))
}

pub async fn save_note(
    State(storage): State<VaultStorage>,
    Json(req): Json<SaveNoteRequest>,
) -> Result<Json<SuccessResponse>, ServerError> {
    if req.sync_id.is_empty() || req.encrypted_content.is_empty() || req.hash.is_empty() {
        return Err(ServerError::BadRequest("Missing data".to_string()));
    }

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    match storage.upsert(&req.sync_id, &req.encrypted_content, &req.hash, &now)? {
        UpsertOutcome::Accepted => Ok(Json(SuccessResponse { success: true })),
        UpsertOutcome::FingerprintMismatch => {
            tracing::warn!(sync_id = %req.sync_id, "save refused: fingerprint mismatch");
            Err(ServerError::Forbidden(
                "This ID is locked to another code".to_string(),
            ))
        }
    }
}

pub async fn delete_note(
    State(storage): State<VaultStorage>,
    Path(sync_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, ServerError> {
    let hash = presented_hash(&headers)?;

    match storage.remove(&sync_id, &hash)? {
        RemoveOutcome::Removed => {
            tracing::info!(sync_id = %sync_id, "vault record deleted");
            Ok(Json(SuccessResponse { success: true }))
        }
        RemoveOutcome::FingerprintMismatch => Err(ServerError::Forbidden(
            "This ID is locked to another code".to_string(),
        )),
        RemoveOutcome::Missing => Err(ServerError::NotFound("Vault not found".to_string())),
    }
}
