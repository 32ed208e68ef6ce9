//! End-to-end list scenarios over dashboard-shaped records.

use serde_json::{json, Value as Json};
use tanaw_query::{
    query, AccessorRegistry, FieldKind, FilterClause, FilterSet, Number, Page, Query, QueryError,
    SortSpec, Value,
};

// ============================================================================
// Evacuation centers
// ============================================================================

#[derive(Debug, Clone)]
struct Center {
    name: &'static str,
    barangay: &'static str,
    capacity: u32,
    occupied: u32,
}

fn center(name: &'static str, barangay: &'static str, capacity: u32, occupied: u32) -> Center {
    Center {
        name,
        barangay,
        capacity,
        occupied,
    }
}

fn center_accessors() -> AccessorRegistry<Center> {
    AccessorRegistry::new()
        .register("name", FieldKind::Text, |c: &Center| Value::from(c.name))
        .register("barangay", FieldKind::Text, |c: &Center| Value::from(c.barangay))
        .register("capacity", FieldKind::Number, |c: &Center| {
            Value::Number(Number::from(c.capacity))
        })
        .computed("occupancy_rate", FieldKind::Number, |c: &Center| {
            if c.capacity == 0 {
                return Value::None;
            }
            Value::Number(Number::F64(
                f64::from(c.occupied) / f64::from(c.capacity) * 100.0,
            ))
        })
}

fn rate(c: &Center) -> u32 {
    c.occupied * 100 / c.capacity
}

#[test]
fn occupancy_rate_sorted_descending_first_page() {
    let centers: Vec<Center> = [25, 90, 60, 95, 10, 80]
        .into_iter()
        .enumerate()
        .map(|(i, occupied)| Center {
            name: ["A", "B", "C", "D", "E", "F"][i],
            barangay: "Poblacion",
            capacity: 100,
            occupied,
        })
        .collect();

    let view = Query::new()
        .sort_desc("occupancy_rate")
        .page(1, 3)
        .run(&centers, &center_accessors())
        .unwrap();

    let rates: Vec<u32> = view.items.iter().map(|c| rate(c)).collect();
    assert_eq!(rates, vec![95, 90, 80]);
    assert_eq!(view.total_matched, 6);
    assert_eq!(view.total_pages, 2);
}

#[test]
fn free_text_search_across_name_and_barangay() {
    let centers = vec![
        center("San Jose Center", "Poblacion", 100, 20),
        center("Central Hall", "San Roque", 300, 150),
        center("Riverside Gym", "Ilaya", 80, 80),
    ];

    let view = Query::new()
        .any_of(["name", "barangay"], "san")
        .run(&centers, &center_accessors())
        .unwrap();

    let names: Vec<&str> = view.items.iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["San Jose Center", "Central Hall"]);
}

#[test]
fn page_past_the_end_is_empty_not_an_error() {
    let centers: Vec<Center> = (0..4)
        .map(|i| center("Hall", "Ilaya", 10, i))
        .collect();

    let view = Query::new()
        .page(5, 2)
        .run(&centers, &center_accessors())
        .unwrap();

    assert!(view.items.is_empty());
    assert_eq!(view.total_matched, 4);
    assert_eq!(view.total_pages, 2);
    assert_eq!(Page::new(5, 2).clamp_to(view.total_pages), Page::new(2, 2));
}

#[test]
fn zero_capacity_center_sorts_last() {
    let centers = vec![
        center("Closed Chapel", "Ilaya", 0, 0),
        center("Gym", "Ilaya", 100, 40),
        center("School", "Ilaya", 100, 70),
    ];

    for sort in [SortSpec::asc("occupancy_rate"), SortSpec::desc("occupancy_rate")] {
        let view = query(
            &centers,
            &FilterSet::new(),
            Some(&sort),
            Page::default(),
            &center_accessors(),
        )
        .unwrap();
        assert_eq!(view.items[2].name, "Closed Chapel");
    }
}

#[test]
fn occupancy_range_filter_is_inclusive() {
    let centers = vec![
        center("A", "Ilaya", 100, 50),
        center("B", "Ilaya", 100, 80),
        center("C", "Ilaya", 100, 81),
    ];

    let view = Query::new()
        .between("occupancy_rate", 50, 80)
        .run(&centers, &center_accessors())
        .unwrap();
    assert_eq!(view.total_matched, 2);
}

// ============================================================================
// Incidents (schemaless JSON)
// ============================================================================

fn incidents() -> Vec<Json> {
    vec![
        json!({
            "id": "INC-001", "title": "Flash flood along the creek",
            "status": "active", "severity": "high",
            "reported_at": "2024-10-22T08:15:00", "tags": ["flood", "rescue"]
        }),
        json!({
            "id": "INC-002", "title": "Landslide on the provincial road",
            "status": "resolved", "severity": "medium",
            "reported_at": "2024-10-21", "tags": ["landslide"]
        }),
        json!({
            "id": "INC-003", "title": "House fire",
            "status": "active", "severity": "high",
            "reported_at": "2024-10-23T14:00:00Z", "tags": []
        }),
        json!({
            "id": "INC-004", "title": "Uprooted tree",
            "status": "monitoring", "severity": "low", "tags": ["road"]
        }),
    ]
}

fn incident_accessors() -> AccessorRegistry<Json> {
    AccessorRegistry::new()
        .raw("id", FieldKind::Text)
        .raw("title", FieldKind::Text)
        .raw("status", FieldKind::Text)
        .raw("severity", FieldKind::Text)
        .raw("reported_at", FieldKind::Date)
        .raw("tags", FieldKind::Tags)
}

fn ids(items: &[&Json]) -> Vec<String> {
    items
        .iter()
        .map(|i| i["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn dates_sort_chronologically_with_missing_last() {
    let records = incidents();
    let view = Query::new()
        .sort_desc("reported_at")
        .run(&records, &incident_accessors())
        .unwrap();
    assert_eq!(
        ids(&view.items),
        vec!["INC-003", "INC-001", "INC-002", "INC-004"]
    );
}

#[test]
fn date_range_with_open_upper_bound() {
    let records = incidents();
    let view = Query::new()
        .at_least("reported_at", "2024-10-22")
        .run(&records, &incident_accessors())
        .unwrap();
    assert_eq!(ids(&view.items), vec!["INC-001", "INC-003"]);
}

#[test]
fn status_and_tag_filters_combine() {
    let records = incidents();
    let view = Query::new()
        .equals("status", "active")
        .includes_tag("tags", "flood")
        .run(&records, &incident_accessors())
        .unwrap();
    assert_eq!(ids(&view.items), vec!["INC-001"]);

    let everything = Query::new()
        .equals("status", "all")
        .includes_tag("tags", "all")
        .run(&records, &incident_accessors())
        .unwrap();
    assert_eq!(everything.total_matched, records.len());
}

#[test]
fn equals_is_case_sensitive() {
    let records = incidents();
    let view = Query::new()
        .equals("severity", "High")
        .run(&records, &incident_accessors())
        .unwrap();
    assert_eq!(view.total_matched, 0);
}

#[test]
fn filter_set_built_from_clauses() {
    let records = incidents();
    let filters: FilterSet = vec![
        FilterClause::contains("title", "ROAD"),
        FilterClause::equals("severity", ""),
    ]
    .into();
    let view = query(&records, &filters, None, Page::first(10), &incident_accessors()).unwrap();
    assert_eq!(ids(&view.items), vec!["INC-002"]);
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn configuration_errors_fail_fast() {
    let records = incidents();
    let accessors = incident_accessors();

    assert_eq!(
        Query::new().page(1, 0).run(&records, &accessors).unwrap_err(),
        QueryError::InvalidPageSize(0)
    );
    assert_eq!(
        Query::new().page(0, 10).run(&records, &accessors).unwrap_err(),
        QueryError::InvalidPageNumber
    );
    assert_eq!(
        Query::new()
            .sort_asc("occupancy_rate")
            .run(&records, &accessors)
            .unwrap_err(),
        QueryError::UnknownSortField {
            field: "occupancy_rate".into()
        }
    );
}

#[test]
fn empty_input_yields_one_empty_page() {
    let records: Vec<Json> = Vec::new();
    let view = Query::new()
        .sort_asc("title")
        .run(&records, &incident_accessors())
        .unwrap();
    assert!(view.is_empty());
    assert_eq!(view.total_pages, 1);
}
