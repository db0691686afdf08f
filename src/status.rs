// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Model sync status.
//!
//! Determine how a local model relates to its remote counterpart. A model is
//! either __new__ (no remote counterpart at all), __modified__ (remote exists
//! but differs), or __synced__.
//!
//! # Slices
//!
//! Slice screenshots are compared separately from the rest of the model. The
//! upload pipeline embeds the content hash of a screenshot into its remote URL,
//! so a local screenshot matches when the remote URL of its variation contains
//! its hash. Screenshot URLs are then stripped from both models before they are
//! compared structurally, so URL-only differences never count as changes.
//!
//! Structural comparison ignores key order inside objects but respects the
//! order of sequences, i.e., swapping two variations is a modification.
//!
//! # Custom Types
//!
//! Custom types have no screenshots. Since field order decides how fields are
//! rendered and returned by the API, reordering sections, fields, or group
//! sub-fields is a modification.

use crate::{
    custom_type::{field::Field, CustomType, Section},
    slice::{Screenshot, SliceModel},
};

use indexmap::IndexMap;
use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Sync status of a local model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelStatus {
    /// No remote counterpart.
    New,

    /// Remote counterpart differs.
    Modified,

    /// Remote counterpart matches.
    Synced,
}

impl Display for ModelStatus {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::New => fmt.write_str("new"),
            Self::Modified => fmt.write_str("modified"),
            Self::Synced => fmt.write_str("synced"),
        }
    }
}

/// Local slice model paired with its remote counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontEndSliceModel {
    pub local: SliceModel,
    pub remote: Option<SliceModel>,

    /// Local screenshots keyed by variation id.
    pub local_screenshots: HashMap<String, Screenshot>,
}

impl FrontEndSliceModel {
    /// Sync status of slice.
    pub fn status(&self) -> ModelStatus {
        match &self.remote {
            Some(remote) => compare_slice_models(&self.local, remote, &self.local_screenshots),
            None => ModelStatus::New,
        }
    }
}

/// Compare local slice model against existing remote slice model.
pub fn compare_slice_models(
    local: &SliceModel,
    remote: &SliceModel,
    local_screenshots: &HashMap<String, Screenshot>,
) -> ModelStatus {
    if !screenshots_match(remote, local_screenshots) {
        return ModelStatus::Modified;
    }

    if local.without_image_urls() != remote.without_image_urls() {
        return ModelStatus::Modified;
    }

    ModelStatus::Synced
}

fn screenshots_match(remote: &SliceModel, local_screenshots: &HashMap<String, Screenshot>) -> bool {
    remote.variations.iter().all(|variation| {
        match (variation.image_url(), local_screenshots.get(&variation.id)) {
            (None, None) => true,
            (Some(url), Some(screenshot)) => url.contains(&screenshot.hash),
            _ => false,
        }
    })
}

/// Local custom type paired with its remote counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontEndCustomTypeModel {
    pub local: CustomType,
    pub remote: Option<CustomType>,
}

impl FrontEndCustomTypeModel {
    /// Sync status of custom type.
    pub fn status(&self) -> ModelStatus {
        match &self.remote {
            Some(remote) => compare_custom_type_models(&self.local, remote),
            None => ModelStatus::New,
        }
    }
}

/// Compare local custom type against existing remote custom type.
pub fn compare_custom_type_models(local: &CustomType, remote: &CustomType) -> ModelStatus {
    let sections_match = same_order(&local.json, &remote.json)
        && local
            .json
            .values()
            .zip(remote.json.values())
            .all(|(local, remote)| sections_match(local, remote));

    if !sections_match || local != remote {
        return ModelStatus::Modified;
    }

    ModelStatus::Synced
}

fn sections_match(local: &Section, remote: &Section) -> bool {
    same_order(local, remote)
        && local
            .values()
            .zip(remote.values())
            .all(|pair| match pair {
                (Field::Group(local), Field::Group(remote)) => match (local.fields(), remote.fields()) {
                    (Some(local), Some(remote)) => same_order(local, remote),
                    (local, remote) => local.is_none() && remote.is_none(),
                },
                _ => true,
            })
}

fn same_order<V>(local: &IndexMap<String, V>, remote: &IndexMap<String, V>) -> bool {
    local.keys().eq(remote.keys())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_type::{field::Widget, CustomTypeFormat, MAIN_SECTION};
    use simple_test_case::test_case;

    fn slice(image_url: Option<&str>) -> SliceModel {
        let variation = match image_url {
            Some(url) => format!(r#"{{"id":"default","name":"Default","imageUrl":"{url}"}}"#),
            None => r#"{"id":"default","name":"Default"}"#.to_owned(),
        };
        let data = format!(r#"{{"id":"hero","type":"SharedSlice","name":"Hero","variations":[{variation}]}}"#);
        serde_json::from_str(&data).unwrap()
    }

    fn screenshots(hash: Option<&str>) -> HashMap<String, Screenshot> {
        hash.map(|hash| {
            (
                "default".to_owned(),
                Screenshot {
                    path: "slices/Hero/screenshot-default.png".into(),
                    hash: hash.into(),
                },
            )
        })
        .into_iter()
        .collect()
    }

    #[test_case(Some("https://cdn/abc123/preview.png"), Some("abc123"), ModelStatus::Synced; "hash in url")]
    #[test_case(Some("https://cdn/def456/preview.png"), Some("abc123"), ModelStatus::Modified; "hash not in url")]
    #[test_case(None, None, ModelStatus::Synced; "both absent")]
    #[test_case(Some(""), None, ModelStatus::Synced; "empty url counts as absent")]
    #[test_case(None, Some("abc123"), ModelStatus::Modified; "remote missing screenshot")]
    #[test_case(Some("https://cdn/abc123/preview.png"), None, ModelStatus::Modified; "local missing screenshot")]
    #[test]
    fn compare_slice_screenshots(url: Option<&str>, hash: Option<&str>, expect: ModelStatus) {
        let local = slice(None);
        let remote = slice(url);
        let result = compare_slice_models(&local, &remote, &screenshots(hash));
        pretty_assertions::assert_eq!(result, expect);
    }

    #[test]
    fn compare_slice_ignores_image_urls() {
        let local = slice(Some("https://cdn/abc123/preview.png?v=1"));
        let remote = slice(Some("https://cdn/abc123/preview.png?v=2"));
        let result = compare_slice_models(&local, &remote, &screenshots(Some("abc123")));
        pretty_assertions::assert_eq!(result, ModelStatus::Synced);
    }

    #[test]
    fn compare_slice_ignores_key_order() {
        let local: SliceModel = serde_json::from_str(
            r#"{"id":"hero","name":"Hero","variations":[{"id":"a","name":"A","version":"1"}]}"#,
        )
        .unwrap();
        let remote: SliceModel = serde_json::from_str(
            r#"{"name":"Hero","variations":[{"version":"1","name":"A","id":"a"}],"id":"hero"}"#,
        )
        .unwrap();
        pretty_assertions::assert_eq!(compare_slice_models(&local, &remote, &HashMap::new()), ModelStatus::Synced);
    }

    #[test]
    fn compare_slice_respects_variation_order() {
        let local: SliceModel =
            serde_json::from_str(r#"{"id":"hero","variations":[{"id":"a"},{"id":"b"}]}"#).unwrap();
        let remote: SliceModel =
            serde_json::from_str(r#"{"id":"hero","variations":[{"id":"b"},{"id":"a"}]}"#).unwrap();
        pretty_assertions::assert_eq!(compare_slice_models(&local, &remote, &HashMap::new()), ModelStatus::Modified);
    }

    #[test]
    fn compare_slice_detects_content_change() {
        let local = slice(None);
        let mut remote = slice(None);
        remote.rest.insert("description".into(), "changed".into());
        pretty_assertions::assert_eq!(compare_slice_models(&local, &remote, &HashMap::new()), ModelStatus::Modified);
    }

    #[test]
    fn slice_without_remote_is_new() {
        let model = FrontEndSliceModel {
            local: slice(None),
            remote: None,
            local_screenshots: HashMap::new(),
        };
        pretty_assertions::assert_eq!(model.status(), ModelStatus::New);

        let model = FrontEndSliceModel {
            remote: Some(slice(None)),
            ..model
        };
        pretty_assertions::assert_eq!(model.status(), ModelStatus::Synced);
    }

    fn custom_type() -> CustomType {
        CustomType::new("blog", "Blog", true, CustomTypeFormat::Custom)
            .add_field(MAIN_SECTION, "title", Field::Text(Widget::labeled("Title")))
            .add_field(MAIN_SECTION, "body", Field::StructuredText(Widget::labeled("Body")))
    }

    #[test]
    fn compare_custom_type_synced() {
        pretty_assertions::assert_eq!(compare_custom_type_models(&custom_type(), &custom_type()), ModelStatus::Synced);
    }

    #[test]
    fn compare_custom_type_field_order_matters() {
        let local = custom_type().reorder_field(MAIN_SECTION, 2, 1);
        pretty_assertions::assert_eq!(compare_custom_type_models(&local, &custom_type()), ModelStatus::Modified);
    }

    #[test]
    fn compare_custom_type_section_order_matters() {
        let remote = custom_type().create_section("SEO");
        let local = remote
            .clone()
            .rename_section(MAIN_SECTION, "tmp")
            .delete_section("tmp")
            .create_section(MAIN_SECTION)
            .update_section(MAIN_SECTION, remote.json[MAIN_SECTION].clone());
        pretty_assertions::assert_eq!(compare_custom_type_models(&local, &remote), ModelStatus::Modified);
    }

    #[test]
    fn compare_custom_type_content_change() {
        let local = custom_type().delete_field(MAIN_SECTION, "body");
        pretty_assertions::assert_eq!(compare_custom_type_models(&local, &custom_type()), ModelStatus::Modified);

        let mut local = custom_type();
        local.label = Some("Renamed".into());
        pretty_assertions::assert_eq!(compare_custom_type_models(&local, &custom_type()), ModelStatus::Modified);
    }

    #[test]
    fn custom_type_without_remote_is_new() {
        let model = FrontEndCustomTypeModel {
            local: custom_type(),
            remote: None,
        };
        pretty_assertions::assert_eq!(model.status(), ModelStatus::New);
    }
}
