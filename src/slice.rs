// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Shared slice models.
//!
//! A __slice__ is a reusable content component that can be made selectable in
//! any slice zone. Each slice comes in one or more __variations__, each with an
//! optional screenshot reference. Only the parts of a slice model that the
//! sync status logic needs are typed; everything else is kept as ordered JSON
//! so it can be written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slice model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SliceModel {
    pub id: String,

    #[serde(default)]
    pub variations: Vec<Variation>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl SliceModel {
    /// Copy of slice model without any variation screenshot reference.
    pub fn without_image_urls(&self) -> Self {
        let mut stripped = self.clone();
        for variation in &mut stripped.variations {
            variation.image_url = None;
        }

        stripped
    }
}

/// Variation of a slice.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Variation {
    pub id: String,

    /// Remote screenshot reference.
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Variation {
    /// Screenshot reference, treating an empty URL as no reference at all.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Locally held screenshot of a variation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Screenshot {
    /// Where the screenshot lives on disk.
    pub path: String,

    /// Content hash of screenshot bytes.
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_slice_model() -> anyhow::Result<()> {
        let data = indoc! {r#"
            {
              "id": "hero",
              "type": "SharedSlice",
              "name": "Hero",
              "variations": [
                { "id": "default", "imageUrl": "", "name": "Default", "primary": {} },
                { "id": "imageLeft", "imageUrl": "https://cdn/abc/preview.png", "name": "Image Left" }
              ]
            }
        "#};
        let slice: SliceModel = serde_json::from_str(data)?;

        assert_eq!(slice.id, "hero");
        assert_eq!(slice.rest["name"], Value::String("Hero".into()));
        assert_eq!(slice.variations.len(), 2);
        assert_eq!(slice.variations[0].image_url(), None);
        assert_eq!(
            slice.variations[1].image_url(),
            Some("https://cdn/abc/preview.png")
        );

        Ok(())
    }

    #[test]
    fn strip_image_urls() -> anyhow::Result<()> {
        let data = r#"{"id":"hero","variations":[{"id":"default","imageUrl":"x","name":"Default"}]}"#;
        let slice: SliceModel = serde_json::from_str(data)?;
        let result = serde_json::to_string(&slice.without_image_urls())?;
        let expect = r#"{"id":"hero","variations":[{"id":"default","name":"Default"}]}"#;
        assert_eq!(result, expect);

        Ok(())
    }
}
