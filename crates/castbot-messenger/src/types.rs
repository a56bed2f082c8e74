// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the platform's graph API.

use castbot_core::MediaKind;
use serde::{Deserialize, Serialize};

/// A broadcast label owned by the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteLabel {
    pub id: String,
    pub name: String,
}

/// One page of the label listing.
#[derive(Debug, Deserialize)]
pub struct LabelPage {
    pub data: Vec<RemoteLabel>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Graph-style cursor paging envelope.
#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
}

/// Request body for label creation.
#[derive(Debug, Serialize)]
pub struct CreateLabelRequest<'a> {
    pub name: &'a str,
}

/// Response to label creation.
#[derive(Debug, Deserialize)]
pub struct CreatedLabel {
    pub id: String,
}

/// Request body for associating a user with a label.
#[derive(Debug, Serialize)]
pub struct LabelUserRequest<'a> {
    pub user: &'a str,
}

/// Response to a label association call.
#[derive(Debug, Deserialize)]
pub struct LabelUserResponse {
    pub success: bool,
}

/// Request body for hosting a media item from a public URL.
#[derive(Debug, Serialize)]
pub struct AttachmentUploadRequest<'a> {
    pub message: AttachmentMessage<'a>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentMessage<'a> {
    pub attachment: AttachmentSpec<'a>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentSpec<'a> {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub payload: AttachmentPayload<'a>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentPayload<'a> {
    pub url: &'a str,
    pub is_reusable: bool,
}

impl<'a> AttachmentUploadRequest<'a> {
    /// Build the nested upload envelope the platform expects.
    pub fn new(kind: MediaKind, url: &'a str) -> Self {
        Self {
            message: AttachmentMessage {
                attachment: AttachmentSpec {
                    kind,
                    payload: AttachmentPayload {
                        url,
                        is_reusable: true,
                    },
                },
            },
        }
    }
}

/// Response to a media upload.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub attachment_id: String,
}

/// Error envelope returned by the platform on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub code: Option<i64>,
}
