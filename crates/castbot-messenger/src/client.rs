// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the platform's graph API.
//!
//! Provides [`MessengerClient`] which handles request construction,
//! access-token authentication, error body parsing, and transient error
//! retry.

use std::time::Duration;

use castbot_config::model::MessengerConfig;
use castbot_core::{CastbotError, MediaKind};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, AttachmentUploadRequest, CreateLabelRequest, CreatedLabel, LabelPage,
    LabelUserRequest, LabelUserResponse, RemoteLabel, UploadResponse,
};

/// HTTP client for the remote messaging platform.
///
/// Manages the page access token, connection pooling, and retry logic for
/// transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct MessengerClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    max_retries: u32,
}

impl MessengerClient {
    /// Creates a new platform client from configuration.
    ///
    /// Requires `messenger.access_token` to be set.
    pub fn new(config: &MessengerConfig) -> Result<Self, CastbotError> {
        let token = config.access_token.as_deref().ok_or_else(|| {
            CastbotError::Config("messenger.access_token is required for platform access".into())
        })?;

        if token.is_empty() {
            return Err(CastbotError::Config(
                "messenger.access_token cannot be empty".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CastbotError::Platform {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            access_token: token.to_string(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    /// Fetch the complete remote label list, following cursor pagination.
    ///
    /// The result is one immutable snapshot; callers must not re-fetch
    /// mid-pass when diffing against it.
    pub async fn list_labels(&self) -> Result<Vec<RemoteLabel>, CastbotError> {
        let url = format!("{}/me/custom_labels", self.base_url);
        let mut labels = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![("fields", "name")];
            if let Some(ref cursor) = after {
                query.push(("after", cursor));
            }

            let page: LabelPage = self
                .request(Method::GET, &url, &query, None::<&()>)
                .await?;
            labels.extend(page.data);

            let has_next = page
                .paging
                .as_ref()
                .and_then(|p| p.next.as_ref())
                .is_some();
            after = page
                .paging
                .and_then(|p| p.cursors)
                .and_then(|c| c.after);
            if !has_next || after.is_none() {
                break;
            }
        }

        debug!(count = labels.len(), "fetched remote label snapshot");
        Ok(labels)
    }

    /// Create a remote label. Returns the platform-assigned id.
    pub async fn create_label(&self, name: &str) -> Result<String, CastbotError> {
        let url = format!("{}/me/custom_labels", self.base_url);
        let created: CreatedLabel = self
            .request(Method::POST, &url, &[], Some(&CreateLabelRequest { name }))
            .await?;
        debug!(label = name, id = %created.id, "created remote label");
        Ok(created.id)
    }

    /// Associate a user with a remote label.
    pub async fn add_user_to_label(
        &self,
        label_id: &str,
        messenger_id: &str,
    ) -> Result<(), CastbotError> {
        let url = format!("{}/{label_id}/label", self.base_url);
        let response: LabelUserResponse = self
            .request(
                Method::POST,
                &url,
                &[],
                Some(&LabelUserRequest {
                    user: messenger_id,
                }),
            )
            .await?;
        if !response.success {
            return Err(CastbotError::Platform {
                message: format!("platform declined to add user to label {label_id}"),
                source: None,
            });
        }
        Ok(())
    }

    /// Host a media item on the platform from a public URL.
    ///
    /// Returns the reusable remote attachment handle.
    pub async fn upload_from_url(
        &self,
        kind: MediaKind,
        media_url: &str,
    ) -> Result<String, CastbotError> {
        let url = format!("{}/me/message_attachments", self.base_url);
        let uploaded: UploadResponse = self
            .request(
                Method::POST,
                &url,
                &[],
                Some(&AttachmentUploadRequest::new(kind, media_url)),
            )
            .await?;
        debug!(kind = %kind, url = media_url, "uploaded attachment");
        Ok(uploaded.attachment_id)
    }

    /// Send one API request with access-token auth and transient-error retry.
    ///
    /// On 429/500/503, retries once after a 1-second delay. Non-transient
    /// failures are surfaced with the platform's own error message when the
    /// body parses as a graph error envelope.
    async fn request<B, T>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, CastbotError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, url, "retrying platform request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let mut req = self
                .client
                .request(method.clone(), url)
                .query(&[("access_token", self.access_token.as_str())])
                .query(query);
            if let Some(body) = body {
                req = req.json(body);
            }

            let response = req.send().await.map_err(|e| CastbotError::Platform {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, url, "platform response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| CastbotError::Platform {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| CastbotError::Platform {
                    message: format!("failed to parse platform response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient platform error, will retry");
                last_error = Some(CastbotError::Platform {
                    message: format!("platform returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "platform error ({}): {}",
                    api_err.error.type_, api_err.error.message
                ),
                Err(_) => format!("platform returned {status}: {body}"),
            };
            return Err(CastbotError::Platform {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| CastbotError::Platform {
            message: "platform request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
