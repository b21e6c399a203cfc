//! HTTP implementation of the remote vault collaborator.

use crate::sync::models::{NoteRecord, SaveRequest, VAULT_HASH_HEADER};
use crate::sync::remote::{FetchOutcome, PushOutcome, RemoteError, RemoteVault, RemoveOutcome};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Bound on every network round-trip; expiry folds into the offline path.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body shape shared by all non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: Option<String>,
}

/// HTTP client for the NoteVault persistence service.
pub struct HttpRemoteVault {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteVault {
    /// Create a client for the given server base URL.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn note_url(&self, sync_id: &str) -> String {
        format!("{}/api/notes/{}", self.base_url, sync_id)
    }

    /// Map a server-side failure status to a remote error, pulling the
    /// diagnostic detail out of the body when the server included one.
    async fn storage_fault(response: reqwest::Response) -> RemoteError {
        let status = response.status();
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.details.unwrap_or(body.error),
            Err(_) => String::new(),
        };
        if detail.is_empty() {
            RemoteError::Storage(format!("Server error {}", status))
        } else {
            RemoteError::Storage(detail)
        }
    }
}

#[async_trait]
impl RemoteVault for HttpRemoteVault {
    async fn fetch(&self, sync_id: &str, fingerprint: &str) -> Result<FetchOutcome, RemoteError> {
        let response = self
            .client
            .get(self.note_url(sync_id))
            .header(VAULT_HASH_HEADER, fingerprint)
            .send()
            .await
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let record: NoteRecord = response
                    .json()
                    .await
                    .map_err(|e| RemoteError::Storage(format!("Invalid record body: {}", e)))?;
                Ok(FetchOutcome::Found(record))
            }
            StatusCode::FORBIDDEN => Ok(FetchOutcome::Forbidden),
            StatusCode::NOT_FOUND => Ok(FetchOutcome::Missing),
            _ => Err(Self::storage_fault(response).await),
        }
    }

    async fn push(
        &self,
        sync_id: &str,
        blob: &str,
        fingerprint: &str,
    ) -> Result<PushOutcome, RemoteError> {
        let body = SaveRequest {
            sync_id: sync_id.to_string(),
            encrypted_content: blob.to_string(),
            hash: fingerprint.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/api/notes", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(PushOutcome::Accepted),
            StatusCode::FORBIDDEN => Ok(PushOutcome::Forbidden),
            _ => Err(Self::storage_fault(response).await),
        }
    }

    async fn delete(&self, sync_id: &str, fingerprint: &str) -> Result<RemoveOutcome, RemoteError> {
        let response = self
            .client
            .delete(self.note_url(sync_id))
            .header(VAULT_HASH_HEADER, fingerprint)
            .send()
            .await
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(RemoveOutcome::Removed),
            StatusCode::FORBIDDEN => Ok(RemoveOutcome::Forbidden),
            StatusCode::NOT_FOUND => Ok(RemoveOutcome::Missing),
            _ => Err(Self::storage_fault(response).await),
        }
    }
}
