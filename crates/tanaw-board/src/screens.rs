//! The four list screens.
//!
//! A screen knows its dataset, its accessor registry and its columns.
//! [`build_query`] turns the list controls into a [`Query`]; [`list`] runs it
//! and snaps an out-of-range page back to the last page.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tanaw_query::{AccessorRegistry, Direction, FilterSet, Query, Record, ResultView, Value};

use crate::cli::ListArgs;
use crate::data::DataSource;
use crate::records::{Bulletin, Center, Event, Incident};

/// Column alignment in the text table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A table column bound to a record field.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
    pub align: Align,
}

const fn col(field: &'static str, header: &'static str) -> Column {
    Column {
        field,
        header,
        align: Align::Left,
    }
}

const fn num(field: &'static str, header: &'static str) -> Column {
    Column {
        field,
        header,
        align: Align::Right,
    }
}

pub trait ListScreen {
    type Row: Record + Serialize + DeserializeOwned + 'static;

    /// Screen name, used in output.
    const NAME: &'static str;
    /// Dataset file name.
    const DATASET: &'static str;
    const COLUMNS: &'static [Column];

    fn accessors() -> AccessorRegistry<Self::Row>;
}

pub struct Incidents;

impl ListScreen for Incidents {
    type Row = Incident;
    const NAME: &'static str = "incidents";
    const DATASET: &'static str = "incidents.json";
    const COLUMNS: &'static [Column] = &[
        col(Incident::ID, "ID"),
        col(Incident::TITLE, "Title"),
        col(Incident::INCIDENT_TYPE, "Type"),
        col(Incident::SEVERITY, "Severity"),
        col(Incident::STATUS, "Status"),
        col(Incident::BARANGAY, "Barangay"),
        col(Incident::REPORTED_AT, "Reported"),
        num(Incident::AFFECTED_FAMILIES, "Families"),
    ];

    fn accessors() -> AccessorRegistry<Incident> {
        Incident::accessors()
    }
}

pub struct Centers;

impl ListScreen for Centers {
    type Row = Center;
    const NAME: &'static str = "centers";
    const DATASET: &'static str = "evacuation_centers.json";
    const COLUMNS: &'static [Column] = &[
        col(Center::ID, "ID"),
        col(Center::NAME, "Name"),
        col(Center::BARANGAY, "Barangay"),
        num(Center::CAPACITY, "Capacity"),
        num(Center::OCCUPIED, "Occupied"),
        num(Center::OCCUPANCY_RATE, "Rate %"),
        col(Center::STATUS, "Status"),
        col(Center::FACILITIES, "Facilities"),
    ];

    fn accessors() -> AccessorRegistry<Center> {
        Center::accessors()
    }
}

pub struct Bulletins;

impl ListScreen for Bulletins {
    type Row = Bulletin;
    const NAME: &'static str = "bulletins";
    const DATASET: &'static str = "weather_bulletins.json";
    const COLUMNS: &'static [Column] = &[
        col(Bulletin::ID, "ID"),
        col(Bulletin::TITLE, "Title"),
        num(Bulletin::SIGNAL_LEVEL, "Signal"),
        col(Bulletin::REGION, "Region"),
        col(Bulletin::ISSUED_AT, "Issued"),
        col(Bulletin::STATUS, "Status"),
    ];

    fn accessors() -> AccessorRegistry<Bulletin> {
        Bulletin::accessors()
    }
}

pub struct Events;

impl ListScreen for Events {
    type Row = Event;
    const NAME: &'static str = "events";
    const DATASET: &'static str = "events.json";
    const COLUMNS: &'static [Column] = &[
        col(Event::ID, "ID"),
        col(Event::TITLE, "Title"),
        col(Event::CATEGORY, "Category"),
        col(Event::LOCATION, "Location"),
        col(Event::STARTS_AT, "Starts"),
        num(Event::DURATION_HOURS, "Hours"),
    ];

    fn accessors() -> AccessorRegistry<Event> {
        Event::accessors()
    }
}

/// One rendered page of a screen.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub screen: &'static str,
    pub query: Query,
    pub page: usize,
    pub total_matched: usize,
    pub total_pages: usize,
    #[serde(skip)]
    pub columns: &'static [Column],
    #[serde(skip)]
    pub cells: Vec<Vec<String>>,
    pub items: Vec<serde_json::Value>,
}

/// Builds the query state for a screen from its filters and list controls.
pub fn build_query(filters: FilterSet, list: &ListArgs, page_size: usize) -> Query {
    let query = Query::new()
        .with_filters(filters)
        .page(list.page, list.page_size.unwrap_or(page_size));
    match &list.sort {
        Some(field) => {
            let direction = if list.desc {
                Direction::Desc
            } else {
                Direction::Asc
            };
            query.sort_by(field, direction)
        }
        None => query,
    }
}

/// Loads the screen's dataset and runs `query` against it.
pub fn list<S: ListScreen>(source: &DataSource, query: Query) -> Result<Listing> {
    let rows: Vec<S::Row> = source
        .load(S::DATASET)
        .with_context(|| format!("loading {} data", S::NAME))?;
    render_page::<S>(&rows, query)
}

/// Runs `query` over `rows`, snapping an out-of-range page to the last one.
pub fn render_page<S: ListScreen>(rows: &[S::Row], query: Query) -> Result<Listing> {
    let accessors = S::accessors();
    let mut query = query;
    let mut view = query
        .run(rows, &accessors)
        .with_context(|| format!("querying {}", S::NAME))?;

    let requested = query.current_page();
    if view.is_out_of_range(requested) {
        let last = requested.clamp_to(view.total_pages);
        tracing::warn!(
            screen = S::NAME,
            requested = requested.number,
            last = last.number,
            "page out of range, showing last page"
        );
        query = query.with_page(last);
        view = query
            .run(rows, &accessors)
            .with_context(|| format!("querying {}", S::NAME))?;
    }

    listing::<S>(query, view, &accessors)
}

fn listing<S: ListScreen>(
    query: Query,
    view: ResultView<&S::Row>,
    accessors: &AccessorRegistry<S::Row>,
) -> Result<Listing> {
    let cells: Vec<Vec<String>> = view
        .items
        .iter()
        .map(|row| {
            S::COLUMNS
                .iter()
                .map(|column| cell(*row, column.field, accessors))
                .collect()
        })
        .collect();
    let items = view
        .items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .context("serializing rows")?;

    Ok(Listing {
        screen: S::NAME,
        page: query.current_page().number,
        query,
        total_matched: view.total_matched,
        total_pages: view.total_pages,
        columns: S::COLUMNS,
        cells,
        items,
    })
}

/// Display text for one cell.
///
/// Stored fields show their raw value, so dates keep the format they were
/// entered in. Computed fields are resolved through the registry.
fn cell<R: Record>(row: &R, field: &str, accessors: &AccessorRegistry<R>) -> String {
    let computed = accessors.get(field).is_some_and(|a| a.is_computed());
    let value = if computed {
        accessors.resolve(row, field)
    } else {
        row.field_value(field)
    };
    match value {
        Value::Number(n) => {
            let rounded = (n.to_f64() * 10.0).round() / 10.0;
            if rounded.fract() == 0.0 {
                format!("{:.0}", rounded)
            } else {
                format!("{:.1}", rounded)
            }
        }
        Value::Tags(tags) => tags.join(", "),
        other => other.to_text().map(|t| t.into_owned()).unwrap_or_default(),
    }
}
