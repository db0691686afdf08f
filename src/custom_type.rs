// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Custom type document tree.
//!
//! A __custom type__ is a content schema. Its body is an ordered mapping of
//! __sections__, and each section is an ordered mapping of __fields__. Groups
//! add one more level of nesting through their own ordered mapping of
//! sub-fields. The whole thing is a strict tree: every level exclusively owns
//! the level below it.
//!
//! # Editing
//!
//! All editing operations consume a custom type and hand back the edited
//! custom type. Each call applies exactly one structural edit while keeping
//! the following intact:
//!
//! - Keys are unique at every level of the tree.
//! - Entries that an edit does not touch keep their relative order.
//! - A section holds at most one slice zone, and slice zone keys are unique
//!   across the whole custom type, because all slice zones get flattened into
//!   one namespace of API ids.
//! - A section's slice zone always comes last in its field order.
//!
//! Referencing a section, field, or group that does not exist is not an error.
//! The custom type is simply returned unchanged. Callers that need to tell the
//! user about a bad reference must check for it themselves.
//!
//! # See Also
//!
//! 1. [`field`]
//! 2. [`fields`]

pub mod field;
pub mod fields;

use crate::custom_type::{
    field::{Field, Group, GroupFields, NestableWidget, SliceChoice, SliceZone, SliceZoneConfig},
    fields::{remove_key, reorder_fields, update_fields},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Ordered mapping of field key to field.
pub type Section = IndexMap<String, Field>;

/// Name of the section every new custom type starts with.
pub const MAIN_SECTION: &str = "Main";

/// Content schema made of ordered sections.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomType {
    /// Unique identifier, never changes once created.
    pub id: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Whether multiple documents of this type may exist.
    pub repeatable: bool,

    /// Ordered mapping of section key to section.
    pub json: IndexMap<String, Section>,

    #[serde(default = "default_status")]
    pub status: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<CustomTypeFormat>,
}

fn default_status() -> bool {
    true
}

/// Format of custom type.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomTypeFormat {
    #[default]
    Custom,
    Page,
}

impl Display for CustomTypeFormat {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Custom => fmt.write_str("custom"),
            Self::Page => fmt.write_str("page"),
        }
    }
}

impl CustomType {
    /// Construct new custom type.
    ///
    /// Starts out with a single main section holding the UID field. Page
    /// types also get a slice zone in their main section.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        repeatable: bool,
        format: CustomTypeFormat,
    ) -> Self {
        let uid = Field::Uid(field::Uid {
            config: Some(field::UidConfig {
                label: Some("UID".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let custom_type = Self {
            id: id.into(),
            label: Some(label.into()),
            repeatable,
            json: IndexMap::from([(MAIN_SECTION.to_owned(), Section::from([("uid".to_owned(), uid)]))]),
            status: true,
            format: Some(format),
        };

        match format {
            CustomTypeFormat::Page => custom_type.convert_to_page_type(),
            CustomTypeFormat::Custom => custom_type,
        }
    }

    /// Format of custom type, defaulting to [`CustomTypeFormat::Custom`].
    pub fn format(&self) -> CustomTypeFormat {
        self.format.unwrap_or_default()
    }

    /// Sections in insertion order.
    pub fn section_entries(&self) -> Vec<(&str, &Section)> {
        self.json
            .iter()
            .map(|(key, section)| (key.as_str(), section))
            .collect()
    }

    /// First section of custom type.
    ///
    /// The main section is positional rather than named, because users are
    /// free to rename it.
    pub fn main_section_entry(&self) -> Option<(&str, &Section)> {
        self.json
            .first()
            .map(|(key, section)| (key.as_str(), section))
    }

    /// Look up section by key.
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.json.get(section_id)
    }

    /// Key and value of a section's slice zone.
    pub fn section_slice_zone_entry(&self, section_id: &str) -> Option<(&str, &SliceZone)> {
        self.section(section_id)?
            .iter()
            .find_map(|(key, field)| field.as_slice_zone().map(|zone| (key.as_str(), zone)))
    }

    /// Configuration of a section's slice zone.
    pub fn section_slice_zone_config(&self, section_id: &str) -> Option<&SliceZoneConfig> {
        self.section_slice_zone_entry(section_id)
            .and_then(|(_, zone)| zone.config.as_ref())
    }

    /// Find the next available slice zone key for a section.
    ///
    /// Probes `slices`, `slices1`, `slices2`, ... starting from the index of
    /// the section, skipping every key that is already a slice zone anywhere in
    /// the custom type, or already a field of the target section. Sections
    /// that do not exist probe as if they were appended last.
    ///
    /// Skipping plain fields keeps a new zone from overwriting one. The result
    /// only differs from probing zones alone when the target section holds a
    /// non-zone field under a probed key, e.g., a text field named `slices1`.
    pub fn find_next_section_slice_zone_key(&self, section_id: &str) -> String {
        let mut index = self
            .json
            .get_index_of(section_id)
            .unwrap_or(self.json.len());
        let target = self.section(section_id);

        loop {
            let proposed = match index {
                0 => "slices".to_owned(),
                index => format!("slices{index}"),
            };

            let taken_by_zone = self.json.values().any(|section| {
                section
                    .get(&proposed)
                    .is_some_and(Field::is_slice_zone)
            });
            let taken_by_field = target.is_some_and(|section| section.contains_key(&proposed));
            if !taken_by_zone && !taken_by_field {
                return proposed;
            }

            index += 1;
        }
    }

    /// Create slice zone for a section.
    ///
    /// Appended as the last field of the section. Does nothing if the section
    /// already has a slice zone.
    #[must_use]
    pub fn create_section_slice_zone(mut self, section_id: &str) -> Self {
        if self.section(section_id).is_none() || self.section_slice_zone_entry(section_id).is_some() {
            return self;
        }

        let key = self.find_next_section_slice_zone_key(section_id);
        if let Some(section) = self.json.get_mut(section_id) {
            section.insert(key, Field::Slices(SliceZone::new()));
        }

        self
    }

    /// Delete slice zone of a section, key and all.
    #[must_use]
    pub fn delete_section_slice_zone(mut self, section_id: &str) -> Self {
        let Some(key) = self
            .section_slice_zone_entry(section_id)
            .map(|(key, _)| key.to_owned())
        else {
            return self;
        };

        if let Some(section) = self.json.get_mut(section_id) {
            section.shift_remove(&key);
        }

        self
    }

    /// Make a slice selectable in a section's slice zone.
    ///
    /// New choices go last. Does nothing if the section has no slice zone or
    /// the slice is already a choice.
    #[must_use]
    pub fn add_slice_zone_slice(self, section_id: &str, slice_id: &str) -> Self {
        self.edit_slice_zone(section_id, |config| {
            if !config.choices.contains_key(slice_id) {
                config.choices.insert(slice_id.to_owned(), SliceChoice::SharedSlice);
            }
        })
    }

    /// Remove a slice from a section's slice zone choices.
    ///
    /// Remaining choices keep their order.
    #[must_use]
    pub fn delete_slice_zone_slice(self, section_id: &str, slice_id: &str) -> Self {
        self.edit_slice_zone(section_id, |config| {
            config.choices = remove_key(&config.choices, slice_id);
        })
    }

    fn edit_slice_zone<E>(mut self, section_id: &str, editor: E) -> Self
    where
        E: FnOnce(&mut SliceZoneConfig),
    {
        let Some(section) = self.json.get_mut(section_id) else {
            return self;
        };

        let zone = section.values_mut().find_map(|field| match field {
            Field::Slices(zone) => Some(zone),
            _ => None,
        });
        if let Some(zone) = zone {
            editor(zone.config.get_or_insert_with(SliceZoneConfig::default));
        }

        self
    }

    /// Convert custom type into a page type.
    ///
    /// Page types always have a slice zone in their main section, i.e., the
    /// first section by position, so one is created if missing.
    #[must_use]
    pub fn convert_to_page_type(mut self) -> Self {
        self.format = Some(CustomTypeFormat::Page);
        let main = self.main_section_entry().map(|(key, _)| key.to_owned());
        match main {
            Some(main) => self.create_section_slice_zone(&main),
            None => self,
        }
    }

    /// Create new empty section at the end.
    ///
    /// Does nothing if the section already exists.
    #[must_use]
    pub fn create_section(mut self, section_id: &str) -> Self {
        if !self.json.contains_key(section_id) {
            self.json.insert(section_id.to_owned(), Section::new());
        }

        self
    }

    /// Delete section and everything in it.
    #[must_use]
    pub fn delete_section(mut self, section_id: &str) -> Self {
        self.json.shift_remove(section_id);
        self
    }

    /// Rename section in place.
    ///
    /// The renamed section keeps its position among the other sections.
    #[must_use]
    pub fn rename_section(mut self, section_id: &str, new_section_id: &str) -> Self {
        if section_id == new_section_id {
            return self;
        }

        if let Some(section) = self.section(section_id).cloned() {
            self.json = update_fields(&self.json, section_id, new_section_id, section);
        }

        self
    }

    /// Replace all fields of a section.
    #[must_use]
    pub fn update_section(mut self, section_id: &str, updated_section: Section) -> Self {
        if let Some(section) = self.json.get_mut(section_id) {
            *section = updated_section;
        }

        self
    }

    /// Add field to a section.
    ///
    /// New keys are appended, existing keys are overwritten in place. Slice
    /// zones cannot be added this way, see [`Self::create_section_slice_zone`].
    #[must_use]
    pub fn add_field(mut self, section_id: &str, new_field_id: &str, new_field: Field) -> Self {
        if new_field.is_slice_zone() {
            return self;
        }

        if let Some(section) = self.json.get_mut(section_id) {
            if section.get(new_field_id).is_some_and(Field::is_slice_zone) {
                return self;
            }

            section.insert(new_field_id.to_owned(), new_field);
        }

        self
    }

    /// Delete field of a section.
    #[must_use]
    pub fn delete_field(mut self, section_id: &str, field_id: &str) -> Self {
        if let Some(section) = self.json.get_mut(section_id) {
            section.shift_remove(field_id);
        }

        self
    }

    /// Update field of a section, optionally renaming its key.
    ///
    /// The updated field keeps the position of `previous_field_id`. Any other
    /// field already keyed by `new_field_id` gets replaced.
    #[must_use]
    pub fn update_field(
        mut self,
        section_id: &str,
        previous_field_id: &str,
        new_field_id: &str,
        new_field: Field,
    ) -> Self {
        if new_field.is_slice_zone() {
            return self;
        }

        if let Some(section) = self.json.get_mut(section_id) {
            if section.contains_key(previous_field_id) {
                *section = update_fields(section, previous_field_id, new_field_id, new_field);
            }
        }

        self
    }

    /// Move field of a section to a new position.
    ///
    /// Indices count fields in display order without the slice zone. The
    /// slice zone never takes part in reordering and is put back last.
    #[must_use]
    pub fn reorder_field(
        mut self,
        section_id: &str,
        source_index: usize,
        destination_index: usize,
    ) -> Self {
        let Some(section) = self.json.get_mut(section_id) else {
            return self;
        };

        let (zones, fields): (Section, Section) = section
            .drain(..)
            .partition(|(_, field)| field.is_slice_zone());
        let mut reordered = reorder_fields(&fields, source_index, destination_index);
        reordered.extend(zones);
        *section = reordered;

        self
    }

    /// Look up a group field of a section.
    pub fn group_field(&self, section_id: &str, group_field_id: &str) -> Option<&Group> {
        self.section(section_id)?.get(group_field_id)?.as_group()
    }

    /// Add sub-field to a group.
    ///
    /// New keys are appended, existing keys are overwritten in place.
    #[must_use]
    pub fn add_group_field(
        self,
        section_id: &str,
        group_field_id: &str,
        new_field_id: &str,
        new_field: NestableWidget,
    ) -> Self {
        self.edit_group(section_id, group_field_id, |group| {
            let mut fields = group.fields().cloned().unwrap_or_default();
            fields.insert(new_field_id.to_owned(), new_field);
            Some(update_group_fields(group, fields))
        })
    }

    /// Delete sub-field of a group.
    #[must_use]
    pub fn delete_group_field(self, section_id: &str, group_field_id: &str, field_id: &str) -> Self {
        self.edit_group(section_id, group_field_id, |group| {
            let fields = group.fields()?;
            Some(update_group_fields(group, remove_key(fields, field_id)))
        })
    }

    /// Update sub-field of a group, optionally renaming its key.
    ///
    /// Same semantics as [`Self::update_field`], scoped to the group.
    #[must_use]
    pub fn update_group_field(
        self,
        section_id: &str,
        group_field_id: &str,
        previous_field_id: &str,
        new_field_id: &str,
        new_field: NestableWidget,
    ) -> Self {
        self.edit_group(section_id, group_field_id, |group| {
            let fields = group.fields()?;
            if !fields.contains_key(previous_field_id) {
                return None;
            }

            let updated = update_fields(fields, previous_field_id, new_field_id, new_field);
            Some(update_group_fields(group, updated))
        })
    }

    /// Move sub-field of a group to a new position.
    #[must_use]
    pub fn reorder_group_field(
        self,
        section_id: &str,
        group_field_id: &str,
        source_index: usize,
        destination_index: usize,
    ) -> Self {
        self.edit_group(section_id, group_field_id, |group| {
            let fields = group.fields()?;
            let reordered = reorder_fields(fields, source_index, destination_index);
            Some(update_group_fields(group, reordered))
        })
    }

    fn edit_group<E>(mut self, section_id: &str, group_field_id: &str, editor: E) -> Self
    where
        E: FnOnce(&Group) -> Option<Group>,
    {
        let Some(group) = self.group_field(section_id, group_field_id) else {
            return self;
        };

        if let Some(updated) = editor(group) {
            if let Some(section) = self.json.get_mut(section_id) {
                section.insert(group_field_id.to_owned(), Field::Group(updated));
            }
        }

        self
    }
}

/// Replace sub-fields of a group, keeping the rest of its configuration.
pub fn update_group_fields(group: &Group, fields: GroupFields) -> Group {
    let mut updated = group.clone();
    updated.config.get_or_insert_with(Default::default).fields = Some(fields);
    updated
}
