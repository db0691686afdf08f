// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Local content model management for a headless CMS.
//!
//! Content models come in two kinds. __Custom types__ are document schemas
//! made of ordered sections of fields, where a section may hold at most one
//! __slice zone__: a field whose value is a list of reusable components. Those
//! reusable components are __slices__, kept in slice libraries and shared
//! between custom types.
//!
//! # Editing
//!
//! Every custom type edit is a pure transform that consumes a custom type and
//! returns the edited one. Transforms never fail; an edit that does not apply,
//! e.g., deleting a field that does not exist, returns the custom type as it
//! was. Field order is significant and is preserved by every transform.
//!
//! # Sync Status
//!
//! Local models are compared against a snapshot of their remote counterparts
//! to tell whether they are new, modified, or synced. See [`status`].

pub mod config;
pub mod custom_type;
pub mod path;
pub mod slice;
pub mod status;
pub mod store;

pub use config::ProjectConfig;
pub use custom_type::{CustomType, CustomTypeFormat};
pub use status::ModelStatus;
pub use store::Project;
