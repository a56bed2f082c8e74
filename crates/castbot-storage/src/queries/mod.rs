// SPDX-FileCopyrightText: 2026 Castbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod attachments;
pub mod bot_data;
pub mod cache;
pub mod channels;
pub mod settings;
pub mod users;
