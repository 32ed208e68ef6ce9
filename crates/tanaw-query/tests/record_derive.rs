//! Tests for `#[derive(Record)]` against the query engine.

use chrono::NaiveDate;
use tanaw_macros::Record as DeriveRecord;
use tanaw_query::{AccessorRegistry, FieldKind, Number, Query, Record, Timestamp, Value};

#[derive(Debug, Clone, DeriveRecord)]
struct Bulletin {
    #[field(Text)]
    id: String,

    #[field(Text)]
    title: String,

    #[field(Number, rename = "signal")]
    signal_level: u8,

    #[field(Date)]
    issued_at: String,

    #[field(Tags)]
    areas: Vec<String>,

    #[field(Text)]
    advisory: Option<String>,

    #[field(skip)]
    #[allow(dead_code)]
    raw_text: String,
}

#[derive(Debug, DeriveRecord)]
struct Event {
    #[field(Text)]
    title: String,

    #[field(kind = "date")]
    starts_on: NaiveDate,

    #[field(Bool)]
    public: bool,
}

fn bulletin(id: &str, signal_level: u8, issued_at: &str, areas: &[&str]) -> Bulletin {
    Bulletin {
        id: id.to_string(),
        title: format!("Bulletin {}", id),
        signal_level,
        issued_at: issued_at.to_string(),
        areas: areas.iter().map(|a| a.to_string()).collect(),
        advisory: None,
        raw_text: String::new(),
    }
}

#[test]
fn generates_field_constants() {
    assert_eq!(Bulletin::ID, "id");
    assert_eq!(Bulletin::SIGNAL, "signal");
    assert_eq!(Bulletin::ISSUED_AT, "issued_at");
    assert_eq!(Event::STARTS_ON, "starts_on");
}

#[test]
fn field_kinds_follow_declaration_order() {
    assert_eq!(
        Bulletin::field_kinds(),
        &[
            ("id", FieldKind::Text),
            ("title", FieldKind::Text),
            ("signal", FieldKind::Number),
            ("issued_at", FieldKind::Date),
            ("areas", FieldKind::Tags),
            ("advisory", FieldKind::Text),
        ]
    );
}

#[test]
fn field_value_reads_fields() {
    let b = bulletin("WB-7", 3, "2024-10-24T05:00:00", &["Albay", "Sorsogon"]);
    assert_eq!(b.field_value(Bulletin::SIGNAL), Value::Number(Number::U64(3)));
    assert_eq!(b.field_value(Bulletin::ID), Value::from("WB-7"));
    assert!(b.field_value("advisory").is_none());
    assert!(b.field_value("raw_text").is_none());
    assert!(b.field_value("signal_level").is_none());
}

#[test]
fn from_record_registers_every_field() {
    let accessors = AccessorRegistry::<Bulletin>::from_record();
    assert_eq!(
        accessors.fields(),
        vec!["advisory", "areas", "id", "issued_at", "signal", "title"]
    );

    let b = bulletin("WB-1", 2, "2024-10-24", &[]);
    assert_eq!(
        accessors.resolve(&b, Bulletin::ISSUED_AT),
        Value::Timestamp(Timestamp::parse("2024-10-24").unwrap())
    );
}

#[test]
fn derived_records_run_through_the_engine() {
    let bulletins = vec![
        bulletin("WB-1", 1, "2024-10-22T11:00:00", &["Albay"]),
        bulletin("WB-2", 3, "2024-10-23T05:00:00", &["Albay", "Camarines Sur"]),
        bulletin("WB-3", 4, "2024-10-23T17:00:00", &["Catanduanes"]),
        bulletin("WB-4", 2, "2024-10-24T05:00:00", &["Albay"]),
    ];
    let accessors = AccessorRegistry::from_record();

    let view = Query::new()
        .includes_tag(Bulletin::AREAS, "Albay")
        .between(Bulletin::SIGNAL, 2, 5)
        .sort_desc(Bulletin::ISSUED_AT)
        .run(&bulletins, &accessors)
        .unwrap();

    let ids: Vec<&str> = view.items.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["WB-4", "WB-2"]);
}

#[test]
fn chrono_dates_and_bools() {
    let events = vec![
        Event {
            title: "Relief drive".into(),
            starts_on: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
            public: true,
        },
        Event {
            title: "Drill".into(),
            starts_on: NaiveDate::from_ymd_opt(2024, 10, 28).unwrap(),
            public: false,
        },
    ];
    let accessors = AccessorRegistry::from_record();

    let view = Query::new()
        .equals("public", true)
        .at_least(Event::STARTS_ON, "2024-10-01")
        .run(&events, &accessors)
        .unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].title, "Relief drive");

    let sorted = Query::new()
        .sort_asc(Event::STARTS_ON)
        .run(&events, &accessors)
        .unwrap();
    assert_eq!(sorted.items[0].title, "Drill");
}
