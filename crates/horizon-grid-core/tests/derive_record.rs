//! Integration tests for the #[derive(Record)] macro.

use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use horizon_grid_core::record::{FieldKind, FieldRef, FieldValue, Record, introspect};
use horizon_grid_core::{BindingError, FieldError};
use horizon_grid_macros::Record;

#[derive(Debug, Clone, Default, PartialEq)]
struct Location {
    lat: f64,
    lon: f64,
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Measurement {
    #[record(label = "ID")]
    id: i32,
    station: String,
    reading: f32,
    samples: u16,
    taken_at: DateTime<Utc>,
    location: Location,
    #[record(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
}

#[derive(Record)]
struct Timestamps {
    naive: NaiveDateTime,
    system: Option<SystemTime>,
    plain: SystemTime,
}

impl Default for Timestamps {
    fn default() -> Self {
        Self {
            naive: NaiveDateTime::default(),
            system: None,
            plain: SystemTime::UNIX_EPOCH,
        }
    }
}

#[derive(Record, Default)]
struct Nothing {
    #[record(skip)]
    #[allow(dead_code)]
    hidden: i32,
}

#[test]
fn test_descriptors_follow_declaration_order() {
    let fields = Measurement::fields();
    let names: Vec<_> = fields.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        ["id", "station", "reading", "samples", "taken_at", "location"]
    );
    for (i, field) in fields.iter().enumerate() {
        assert_eq!(field.ordinal, i);
    }
}

#[test]
fn test_kind_classification() {
    let kinds: Vec<_> = Measurement::fields().iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        [
            FieldKind::Int,
            FieldKind::String,
            FieldKind::Float,
            FieldKind::Uint,
            FieldKind::Timestamp,
            FieldKind::Unsupported,
        ]
    );

    let kinds: Vec<_> = Timestamps::fields().iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        [FieldKind::Timestamp, FieldKind::Unsupported, FieldKind::Timestamp]
    );
}

#[test]
fn test_labels_default_to_names() {
    let fields = Measurement::fields();
    assert_eq!(fields[0].label, "ID");
    assert_eq!(fields[1].label, "station");
    assert_eq!(fields[5].type_name, "Location");
}

#[test]
fn test_field_access_by_ordinal() {
    let taken_at = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
    let mut m = Measurement {
        id: 7,
        station: "north".into(),
        reading: 1.5,
        samples: 3,
        taken_at,
        ..Default::default()
    };

    assert_eq!(m.field_ref(0), Some(FieldRef::Int(7)));
    assert_eq!(m.field_ref(1), Some(FieldRef::Str("north")));
    assert_eq!(m.field(2), Some(FieldValue::Float(1.5)));
    assert_eq!(m.field_ref(3), Some(FieldRef::Uint(3)));
    assert_eq!(m.field_ref(4), Some(FieldRef::Timestamp(taken_at)));
    assert_eq!(m.field_ref(5), Some(FieldRef::Unsupported("Location")));
    assert_eq!(m.field_ref(6), None);

    m.set_field(1, FieldValue::String("south".into())).unwrap();
    m.set_field(3, FieldValue::Uint(9)).unwrap();
    assert_eq!(m.station, "south");
    assert_eq!(m.samples, 9);
}

#[test]
fn test_rejected_writes_leave_record_unchanged() {
    let mut m = Measurement {
        samples: 4,
        ..Default::default()
    };
    let before = m.clone();

    assert!(matches!(
        m.set_field(3, FieldValue::Uint(70_000)),
        Err(FieldError::OutOfRange { field: "samples", .. })
    ));
    assert!(matches!(
        m.set_field(0, FieldValue::Float(1.0)),
        Err(FieldError::KindMismatch { field: "id", .. })
    ));
    assert!(matches!(
        m.set_field(5, FieldValue::Int(1)),
        Err(FieldError::Unsupported { field: "location", .. })
    ));
    assert_eq!(
        m.set_field(42, FieldValue::Int(1)),
        Err(FieldError::NoSuchField { ordinal: 42, count: 6 })
    );
    assert_eq!(m, before);
}

#[test]
fn test_introspect() {
    assert_eq!(introspect::<Measurement>().unwrap().len(), 6);
    assert!(matches!(
        introspect::<Nothing>(),
        Err(BindingError::NoFields { .. })
    ));
}
