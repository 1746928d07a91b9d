//! In-place sorting of record sequences by one field.
//!
//! The comparison is chosen from the field's [`FieldKind`]:
//!
//! | Kind | Order |
//! |------|-------|
//! | signed / unsigned integer | numeric |
//! | float | IEEE 754 total order (`-NaN < -inf < ... < inf < NaN`) |
//! | string | byte-wise lexicographic |
//! | timestamp | chronological |
//!
//! Fields of an unsupported kind cannot be sorted on. The sort is stable:
//! records that compare equal keep their relative order, so re-sorting an
//! already sorted sequence leaves it unchanged.

use std::cmp::Ordering;

use horizon_grid_core::logging::{PerfSpan, span_names, targets};
use horizon_grid_core::record::{FieldDescriptor, FieldKind, FieldRef, Record};

/// Errors that can occur while sorting.
///
/// The sequence is never modified when an error is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The field ordinal does not exist on the record type.
    #[error("cannot sort by field {field}: record has {count} fields")]
    FieldOutOfRange { field: usize, count: usize },

    /// The field's kind has no defined order.
    #[error("field '{field}' of type {type_name} is not sortable")]
    UnsortableKind {
        field: &'static str,
        type_name: &'static str,
    },
}

type Compare = for<'a, 'b> fn(FieldRef<'a>, FieldRef<'b>) -> Ordering;

/// Sorts `records` in place by the field at `field`.
///
/// Sequences with zero or one element are returned untouched without
/// looking at `field`.
#[tracing::instrument(
    name = "horizon_grid::sort",
    skip(records),
    fields(len = records.len()),
    target = "horizon_grid::sort",
    level = "debug",
    err
)]
pub fn sort_records<T: Record>(
    records: &mut [T],
    field: usize,
    ascending: bool,
) -> Result<(), SortError> {
    if records.len() <= 1 {
        return Ok(());
    }

    let (descriptor, compare) = comparator::<T>(field)?;
    let _perf = PerfSpan::new(span_names::SORT);
    records.sort_by(|a, b| order(compare, a, b, field, ascending));

    tracing::debug!(
        target: targets::SORT,
        field = descriptor.name,
        ascending,
        "sorted records"
    );
    Ok(())
}

/// Sorts `records` like [`sort_records`] and returns the new position of
/// the record that was at `tracked`.
pub(crate) fn sort_tracking<T: Record>(
    records: &mut Vec<T>,
    field: usize,
    ascending: bool,
    tracked: usize,
) -> Result<usize, SortError> {
    if records.len() <= 1 {
        return Ok(tracked);
    }

    let (descriptor, compare) = comparator::<T>(field)?;
    let _perf = PerfSpan::new(span_names::SORT);
    let mut permutation: Vec<usize> = (0..records.len()).collect();
    permutation.sort_by(|&a, &b| order(compare, &records[a], &records[b], field, ascending));

    let position = permutation
        .iter()
        .position(|&from| from == tracked)
        .unwrap_or(tracked);
    let mut taken: Vec<Option<T>> = records.drain(..).map(Some).collect();
    records.extend(permutation.iter().filter_map(|&from| taken[from].take()));

    tracing::debug!(
        target: targets::SORT,
        field = descriptor.name,
        ascending,
        tracked,
        position,
        "sorted records"
    );
    Ok(position)
}

fn comparator<T: Record>(field: usize) -> Result<(&'static FieldDescriptor, Compare), SortError> {
    let fields = T::fields();
    let descriptor = fields.get(field).ok_or(SortError::FieldOutOfRange {
        field,
        count: fields.len(),
    })?;

    let compare: Compare = match descriptor.kind {
        FieldKind::Int => compare_int,
        FieldKind::Uint => compare_uint,
        FieldKind::Float => compare_float,
        FieldKind::String => compare_str,
        FieldKind::Timestamp => compare_timestamp,
        FieldKind::Unsupported => {
            return Err(SortError::UnsortableKind {
                field: descriptor.name,
                type_name: descriptor.type_name,
            });
        }
    };
    Ok((descriptor, compare))
}

fn order<T: Record>(compare: Compare, a: &T, b: &T, field: usize, ascending: bool) -> Ordering {
    let ordering = match (a.field_ref(field), b.field_ref(field)) {
        (Some(a), Some(b)) => compare(a, b),
        _ => Ordering::Equal,
    };
    if ascending { ordering } else { ordering.reverse() }
}

fn compare_int(a: FieldRef<'_>, b: FieldRef<'_>) -> Ordering {
    match (a, b) {
        (FieldRef::Int(a), FieldRef::Int(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

fn compare_uint(a: FieldRef<'_>, b: FieldRef<'_>) -> Ordering {
    match (a, b) {
        (FieldRef::Uint(a), FieldRef::Uint(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

fn compare_float(a: FieldRef<'_>, b: FieldRef<'_>) -> Ordering {
    match (a, b) {
        (FieldRef::Float(a), FieldRef::Float(b)) => a.total_cmp(&b),
        _ => Ordering::Equal,
    }
}

fn compare_str(a: FieldRef<'_>, b: FieldRef<'_>) -> Ordering {
    match (a, b) {
        (FieldRef::Str(a), FieldRef::Str(b)) => a.as_bytes().cmp(b.as_bytes()),
        _ => Ordering::Equal,
    }
}

fn compare_timestamp(a: FieldRef<'_>, b: FieldRef<'_>) -> Ordering {
    match (a, b) {
        (FieldRef::Timestamp(a), FieldRef::Timestamp(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use horizon_grid_macros::Record;

    #[derive(Debug, Clone, Default, PartialEq, Record)]
    struct Sample {
        id: i32,
        count: u16,
        weight: f64,
        name: String,
        seen: DateTime<Utc>,
        tags: Vec<String>,
    }

    fn sample(id: i32, count: u16, weight: f64, name: &str, day: u32) -> Sample {
        Sample {
            id,
            count,
            weight,
            name: name.into(),
            seen: Utc.with_ymd_and_hms(2020, 1, day, 0, 0, 0).unwrap(),
            tags: Vec::new(),
        }
    }

    fn samples() -> Vec<Sample> {
        vec![
            sample(2, 30, 0.5, "beta", 3),
            sample(-1, 10, f64::NAN, "Alpha", 1),
            sample(7, 20, -3.25, "alpha", 2),
        ]
    }

    fn ids(records: &[Sample]) -> Vec<i32> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_sort_signed_both_directions() {
        let mut records = samples();
        sort_records(&mut records, 0, true).unwrap();
        assert_eq!(ids(&records), vec![-1, 2, 7]);
        sort_records(&mut records, 0, false).unwrap();
        assert_eq!(ids(&records), vec![7, 2, -1]);
    }

    #[test]
    fn test_sort_unsigned() {
        let mut records = samples();
        sort_records(&mut records, 1, true).unwrap();
        assert_eq!(ids(&records), vec![-1, 7, 2]);
    }

    #[test]
    fn test_sort_float_total_order() {
        let mut records = samples();
        sort_records(&mut records, 2, true).unwrap();
        // Positive NaN orders after every number.
        assert_eq!(ids(&records), vec![7, 2, -1]);
    }

    #[test]
    fn test_sort_string_is_bytewise() {
        let mut records = samples();
        sort_records(&mut records, 3, true).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn test_sort_timestamp() {
        let mut records = samples();
        sort_records(&mut records, 4, false).unwrap();
        assert_eq!(ids(&records), vec![2, 7, -1]);
    }

    #[test]
    fn test_unsupported_field_leaves_records_untouched() {
        let mut records = samples();
        let before = ids(&records);
        let err = sort_records(&mut records, 5, true).unwrap_err();
        assert_eq!(
            err,
            SortError::UnsortableKind {
                field: "tags",
                type_name: "Vec<String>",
            }
        );
        assert_eq!(ids(&records), before);
    }

    #[test]
    fn test_out_of_range_field() {
        let mut records = samples();
        assert_eq!(
            sort_records(&mut records, 6, true),
            Err(SortError::FieldOutOfRange { field: 6, count: 6 })
        );
    }

    #[test]
    fn test_short_sequences_always_succeed() {
        let mut empty: Vec<Sample> = Vec::new();
        assert!(sort_records(&mut empty, 99, true).is_ok());

        let mut single = vec![sample(1, 1, 1.0, "x", 1)];
        assert!(sort_records(&mut single, 5, false).is_ok());
    }

    #[test]
    fn test_equal_keys_keep_their_order() {
        let mut records = vec![
            sample(1, 5, 0.0, "same", 1),
            sample(2, 5, 0.0, "same", 1),
            sample(3, 1, 0.0, "same", 1),
        ];
        sort_records(&mut records, 1, false).unwrap();
        assert_eq!(ids(&records), vec![1, 2, 3]);
        sort_records(&mut records, 3, true).unwrap();
        assert_eq!(ids(&records), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_tracking_follows_the_record() {
        let mut records = samples();
        let position = sort_tracking(&mut records, 0, false, 1).unwrap();
        assert_eq!(ids(&records), vec![7, 2, -1]);
        assert_eq!(position, 2);
        assert_eq!(records[position].id, -1);
    }

    #[test]
    fn test_sort_tracking_rejects_unsortable_field() {
        let mut records = samples();
        let before = ids(&records);
        assert!(sort_tracking(&mut records, 5, true, 0).is_err());
        assert_eq!(ids(&records), before);
    }

    #[test]
    fn test_repeated_ascending_sort_keeps_values() {
        let mut records = samples();
        sort_records(&mut records, 0, true).unwrap();
        let once = ids(&records);
        sort_records(&mut records, 0, true).unwrap();
        assert_eq!(ids(&records), once);
    }
}
