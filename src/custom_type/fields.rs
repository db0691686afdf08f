// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Ordered field mapping primitives.
//!
//! Sections and groups both store their fields as ordered mappings where the
//! position of each entry is meaningful, i.e., it is the order fields are
//! rendered in and the order they show up in API responses. The helpers here
//! rebuild such mappings without ever disturbing the position of entries they
//! were not asked to touch.

use indexmap::IndexMap;

/// Substitute one entry of an ordered mapping.
///
/// Rebuilds `fields` in order, replacing the entry at `previous_field_id`
/// with `new_field` keyed by `new_field_id`. The substituted entry keeps the
/// position of `previous_field_id`. Any other entry already keyed by
/// `new_field_id` is dropped, so no duplicate key survives the rename.
///
/// If `previous_field_id` is absent, nothing is inserted, but an entry keyed
/// by `new_field_id` is still dropped.
pub fn update_fields<T: Clone>(
    fields: &IndexMap<String, T>,
    previous_field_id: &str,
    new_field_id: &str,
    new_field: T,
) -> IndexMap<String, T> {
    let mut new_field = Some(new_field);
    let mut updated = IndexMap::with_capacity(fields.len());
    for (key, value) in fields {
        if key == previous_field_id {
            // INVARIANT: Previous key only ever matches once.
            if let Some(field) = new_field.take() {
                updated.insert(new_field_id.to_owned(), field);
            }
        } else if key != new_field_id {
            updated.insert(key.clone(), value.clone());
        }
    }

    updated
}

/// Move one entry of an ordered mapping.
///
/// Removes the entry at `source_index` and reinserts it at
/// `destination_index`, shifting everything in between. Returns the mapping
/// unchanged if either index is out of bounds.
pub fn reorder_fields<T: Clone>(
    fields: &IndexMap<String, T>,
    source_index: usize,
    destination_index: usize,
) -> IndexMap<String, T> {
    let mut reordered = fields.clone();
    if source_index < reordered.len() && destination_index < reordered.len() {
        reordered.move_index(source_index, destination_index);
    }

    reordered
}

/// Remove one entry of an ordered mapping.
///
/// Relative order of remaining entries is kept.
pub fn remove_key<T: Clone>(fields: &IndexMap<String, T>, key: &str) -> IndexMap<String, T> {
    let mut removed = fields.clone();
    removed.shift_remove(key);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn abc() -> IndexMap<String, u8> {
        IndexMap::from([("a".into(), 1), ("b".into(), 2), ("c".into(), 3)])
    }

    fn entries(fields: &IndexMap<String, u8>) -> Vec<(&str, u8)> {
        fields.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }

    #[test]
    fn update_fields_rename_keeps_position() {
        let result = update_fields(&abc(), "b", "x", 9);
        pretty_assertions::assert_eq!(entries(&result), vec![("a", 1), ("x", 9), ("c", 3)]);
    }

    #[test]
    fn update_fields_same_key_replaces_value() {
        let result = update_fields(&abc(), "b", "b", 9);
        pretty_assertions::assert_eq!(entries(&result), vec![("a", 1), ("b", 9), ("c", 3)]);
    }

    #[test]
    fn update_fields_collision_drops_old_destination() {
        let result = update_fields(&abc(), "a", "c", 9);
        pretty_assertions::assert_eq!(entries(&result), vec![("c", 9), ("b", 2)]);

        let result = update_fields(&abc(), "c", "a", 9);
        pretty_assertions::assert_eq!(entries(&result), vec![("b", 2), ("a", 9)]);
    }

    #[test]
    fn update_fields_missing_previous_key() {
        let result = update_fields(&abc(), "zzz", "b", 9);
        pretty_assertions::assert_eq!(entries(&result), vec![("a", 1), ("c", 3)]);
    }

    #[test_case(0, 2, vec![("b", 2), ("c", 3), ("a", 1)]; "first to last")]
    #[test_case(2, 0, vec![("c", 3), ("a", 1), ("b", 2)]; "last to first")]
    #[test_case(1, 1, vec![("a", 1), ("b", 2), ("c", 3)]; "same index")]
    #[test_case(0, 1, vec![("b", 2), ("a", 1), ("c", 3)]; "adjacent swap")]
    #[test_case(3, 0, vec![("a", 1), ("b", 2), ("c", 3)]; "source out of bounds")]
    #[test_case(0, 7, vec![("a", 1), ("b", 2), ("c", 3)]; "destination out of bounds")]
    #[test]
    fn reorder_fields_moves_entry(source: usize, destination: usize, expect: Vec<(&str, u8)>) {
        let fields = abc();
        let result = reorder_fields(&fields, source, destination);
        pretty_assertions::assert_eq!(entries(&result), expect);
    }

    #[test]
    fn reorder_fields_round_trip() {
        let fields = abc();
        for i in 0..fields.len() {
            for j in 0..fields.len() {
                let result = reorder_fields(&reorder_fields(&fields, i, j), j, i);
                pretty_assertions::assert_eq!(entries(&result), entries(&fields));
            }
        }
    }

    #[test]
    fn remove_key_keeps_order() {
        let result = remove_key(&abc(), "b");
        pretty_assertions::assert_eq!(entries(&result), vec![("a", 1), ("c", 3)]);

        let again = remove_key(&result, "b");
        pretty_assertions::assert_eq!(again, result);
    }
}
