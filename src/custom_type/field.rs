// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Field variants of a custom type.
//!
//! Every entry of a section is a __field__. Fields are internally tagged by
//! their `"type"` key, which is also how they appear in the serialized model
//! files. There are three structural kinds of field:
//!
//! - [`Uid`], the unique identifier field of a document.
//! - [`Group`], a field that owns its own ordered mapping of sub-fields.
//! - [`SliceZone`], the field that lists the slices selectable in a section.
//!
//! Everything else is a scalar widget. Scalar widgets are the only fields that
//! can live inside a group, which is why they get their own type:
//! [`NestableWidget`]. Nesting a group inside a group, or a slice zone inside a
//! group, simply cannot be expressed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered mapping of group sub-fields.
pub type GroupFields = IndexMap<String, NestableWidget>;

/// Ordered mapping of slice ids selectable in a slice zone.
pub type SliceChoices = IndexMap<String, SliceChoice>;

/// Fieldset label given to every slice zone created by the editor.
pub const SLICE_ZONE_FIELDSET: &str = "Slice Zone";

/// Field of a section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum Field {
    #[serde(rename = "UID")]
    Uid(Uid),
    Group(Group),
    Slices(SliceZone),
    Boolean(Widget),
    Color(Widget),
    Date(Widget),
    Embed(Widget),
    GeoPoint(Widget),
    Image(Widget),
    IntegrationFields(Widget),
    Link(Widget),
    Number(Widget),
    Range(Widget),
    Select(Widget),
    Separator(Widget),
    StructuredText(Widget),
    Text(Widget),
    Timestamp(Widget),
}

impl Field {
    /// Check if field is a slice zone.
    pub fn is_slice_zone(&self) -> bool {
        matches!(self, Self::Slices(_))
    }

    /// Narrow field to a group.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Narrow field to a slice zone.
    pub fn as_slice_zone(&self) -> Option<&SliceZone> {
        match self {
            Self::Slices(zone) => Some(zone),
            _ => None,
        }
    }
}

/// Scalar widget that may be placed inside a group.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum NestableWidget {
    Boolean(Widget),
    Color(Widget),
    Date(Widget),
    Embed(Widget),
    GeoPoint(Widget),
    Image(Widget),
    IntegrationFields(Widget),
    Link(Widget),
    Number(Widget),
    Range(Widget),
    Select(Widget),
    Separator(Widget),
    StructuredText(Widget),
    Text(Widget),
    Timestamp(Widget),
}

/// Body of a scalar widget.
///
/// Widget configuration differs per widget kind and is owned by the remote
/// API, so it is kept as an ordered JSON object and written back verbatim.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Widget {
    /// Construct widget with only a label in its configuration.
    pub fn labeled(label: impl Into<String>) -> Self {
        let mut config = Map::new();
        config.insert("label".into(), Value::String(label.into()));
        Self {
            config: Some(config),
            ..Default::default()
        }
    }
}

/// Unique identifier field.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Uid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<UidConfig>,

    /// Keys this crate does not model, written back untouched.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UidConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Group of sub-fields.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GroupConfig>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Group {
    /// Construct new empty group.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            config: Some(GroupConfig {
                label: Some(label.into()),
                placeholder: None,
                repeat: Some(false),
                fields: Some(GroupFields::new()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Sub-fields of group, if any were ever defined.
    pub fn fields(&self) -> Option<&GroupFields> {
        self.config.as_ref().and_then(|config| config.fields.as_ref())
    }
}

/// Group configuration.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GroupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<GroupFields>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Slice zone field.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SliceZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SliceZoneConfig>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl SliceZone {
    /// Construct new slice zone without any choices.
    pub fn new() -> Self {
        Self {
            fieldset: Some(SLICE_ZONE_FIELDSET.into()),
            config: Some(SliceZoneConfig::default()),
            ..Default::default()
        }
    }

    /// Check if slice is selectable in this zone.
    pub fn has_choice(&self, slice_id: &str) -> bool {
        self.config
            .as_ref()
            .is_some_and(|config| config.choices.contains_key(slice_id))
    }
}

/// Slice zone configuration.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SliceZoneConfig {
    #[serde(default)]
    pub choices: SliceChoices,

    /// Keys this crate does not model, written back untouched.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Marker for a slice selectable in a slice zone.
///
/// Only membership in [`SliceZoneConfig::choices`] carries meaning.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum SliceChoice {
    #[default]
    SharedSlice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_field_variants() -> anyhow::Result<()> {
        let data = indoc! {r#"
            {
              "uid": { "type": "UID", "config": { "label": "UID" } },
              "title": { "type": "StructuredText", "config": { "single": "heading1", "label": "Title" } },
              "items": {
                "type": "Group",
                "config": {
                  "label": "Items",
                  "fields": { "flag": { "type": "Boolean" } }
                }
              },
              "slices": {
                "type": "Slices",
                "fieldset": "Slice Zone",
                "config": { "choices": { "hero": { "type": "SharedSlice" } } }
              }
            }
        "#};
        let result: IndexMap<String, Field> = serde_json::from_str(data)?;

        assert_eq!(
            result.keys().collect::<Vec<_>>(),
            vec!["uid", "title", "items", "slices"]
        );
        assert!(matches!(result["uid"], Field::Uid(_)));
        assert!(matches!(result["title"], Field::StructuredText(_)));
        let group = result["items"].as_group().unwrap();
        assert_eq!(
            group.fields().unwrap()["flag"],
            NestableWidget::Boolean(Widget::default())
        );
        assert!(result["slices"].as_slice_zone().unwrap().has_choice("hero"));

        Ok(())
    }

    #[test]
    fn reject_group_inside_group() {
        let data = r#"{ "type": "Group", "config": { "fields": { "inner": { "type": "Group" } } } }"#;
        let result = serde_json::from_str::<Field>(data);
        assert!(result.is_err());
    }

    #[test]
    fn serialize_new_slice_zone() -> anyhow::Result<()> {
        let result = serde_json::to_string(&Field::Slices(SliceZone::new()))?;
        let expect = r#"{"type":"Slices","fieldset":"Slice Zone","config":{"choices":{}}}"#;
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn unmodeled_keys_survive_round_trip() -> anyhow::Result<()> {
        let data = indoc! {r#"
            {
              "uid": {
                "type": "UID",
                "config": { "label": "UID", "customRegex": "^[a-z]+$" },
                "hidden": true
              },
              "items": {
                "type": "Group",
                "config": {
                  "label": "Items",
                  "fields": { "flag": { "type": "Boolean", "deprecated": true } },
                  "min": 1
                },
                "legacy": "v1"
              },
              "slices": {
                "type": "Slices",
                "fieldset": "Slice Zone",
                "config": {
                  "labels": { "hero": [{ "name": "dark", "display": "Dark" }] },
                  "choices": { "hero": { "type": "SharedSlice" } }
                },
                "compact": false
              }
            }
        "#};
        let section: IndexMap<String, Field> = serde_json::from_str(data)?;
        let zone = section["slices"].as_slice_zone().unwrap();
        assert!(zone.config.as_ref().unwrap().rest.contains_key("labels"));

        let result = serde_json::to_value(&section)?;
        let expect: Value = serde_json::from_str(data)?;
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn widget_config_keeps_key_order() -> anyhow::Result<()> {
        let data = r#"{"type":"Text","config":{"placeholder":"p","label":"l","useAsTitle":true}}"#;
        let field: Field = serde_json::from_str(data)?;
        let result = serde_json::to_string(&field)?;
        assert_eq!(result, data);

        Ok(())
    }
}
