//! Record types for the dashboard screens and their accessor registries.

use serde::{Deserialize, Serialize};
use tanaw_query::{AccessorRegistry, FieldKind, Number, Record, Timestamp, Value};

/// A reported incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
pub struct Incident {
    #[field(Text)]
    pub id: String,
    #[field(Text)]
    pub title: String,
    #[field(Text)]
    pub incident_type: String,
    #[field(Text)]
    pub severity: String,
    #[field(Text)]
    pub status: String,
    #[field(Text)]
    pub barangay: String,
    /// ISO-8601; may be blank for reports with no timestamp.
    #[field(Date)]
    pub reported_at: String,
    #[field(Number)]
    pub affected_families: u32,
    #[field(Tags)]
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Incident {
    pub fn accessors() -> AccessorRegistry<Incident> {
        AccessorRegistry::from_record()
    }
}

/// An evacuation center and its current headcount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
pub struct Center {
    #[field(Text)]
    pub id: String,
    #[field(Text)]
    pub name: String,
    #[field(Text)]
    pub barangay: String,
    #[field(Text)]
    pub address: String,
    #[field(Number)]
    pub capacity: u32,
    #[field(Number)]
    pub occupied: u32,
    #[field(Text)]
    pub status: String,
    #[field(Tags)]
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Center {
    /// Computed field: `occupied / capacity * 100`.
    pub const OCCUPANCY_RATE: &'static str = "occupancy_rate";

    /// Percentage of capacity in use, or `None` for a zero-capacity center.
    pub fn occupancy_rate(&self) -> Option<f64> {
        if self.capacity == 0 {
            return None;
        }
        Some(f64::from(self.occupied) / f64::from(self.capacity) * 100.0)
    }

    pub fn accessors() -> AccessorRegistry<Center> {
        AccessorRegistry::from_record().computed(
            Center::OCCUPANCY_RATE,
            FieldKind::Number,
            |c: &Center| match c.occupancy_rate() {
                Some(rate) => Value::Number(Number::F64(rate)),
                None => Value::None,
            },
        )
    }
}

/// A weather bulletin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
pub struct Bulletin {
    #[field(Text)]
    pub id: String,
    #[field(Text)]
    pub title: String,
    /// Tropical cyclone wind signal; 0 for advisories with no signal.
    #[field(Number)]
    pub signal_level: u8,
    #[field(Text)]
    pub region: String,
    #[field(Date)]
    pub issued_at: String,
    #[field(Text)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Bulletin {
    pub fn accessors() -> AccessorRegistry<Bulletin> {
        AccessorRegistry::from_record()
    }
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
pub struct Event {
    #[field(Text)]
    pub id: String,
    #[field(Text)]
    pub title: String,
    #[field(Text)]
    pub category: String,
    #[field(Text)]
    pub location: String,
    #[field(Date)]
    pub starts_at: String,
    #[field(Date)]
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    /// Computed field: hours between `starts_at` and `ends_at`.
    pub const DURATION_HOURS: &'static str = "duration_hours";

    /// Length of the event in hours, when both ends parse.
    pub fn duration_hours(&self) -> Option<f64> {
        let start = Timestamp::parse(&self.starts_at)?;
        let end = Timestamp::parse(self.ends_at.as_deref()?)?;
        Some((end.as_millis() - start.as_millis()) as f64 / 3_600_000.0)
    }

    pub fn accessors() -> AccessorRegistry<Event> {
        AccessorRegistry::from_record().computed(
            Event::DURATION_HOURS,
            FieldKind::Number,
            |e: &Event| match e.duration_hours() {
                Some(hours) => Value::Number(Number::F64(hours)),
                None => Value::None,
            },
        )
    }
}
