// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote messaging platform client for the Castbot messenger bot.
//!
//! Talks a Graph-style REST API: broadcast label CRUD, label membership,
//! and media upload from a public URL. Transient errors (429/500/503) are
//! retried once; everything else surfaces as a platform error carrying the
//! API's human-readable message.

pub mod client;
pub mod media;
pub mod types;

pub use client::MessengerClient;
pub use media::media_kind_for_url;
pub use types::RemoteLabel;
