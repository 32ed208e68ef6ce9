//! Command-line interface.
//!
//! Every screen takes the shared [`ListArgs`] plus its own filters.
//! Dropdown-style filters default to the `all` sentinel and text inputs to
//! the empty string, so an untouched control never constrains the list.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tanaw_query::{FilterClause, FilterSet, Scalar, ALL};

use crate::config::Format;
use crate::records::{Bulletin, Center, Event, Incident};

#[derive(Debug, Parser)]
#[command(
    name = "tanaw",
    version,
    about = "Browse incidents, evacuation centers, bulletins and events"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Screen,

    /// YAML config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (overrides the config file).
    #[arg(long, global = true, value_enum)]
    pub format: Option<Format>,

    /// Log query evaluation to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Screen {
    /// Reported incidents.
    Incidents(IncidentArgs),
    /// Evacuation centers and their occupancy.
    Centers(CenterArgs),
    /// Weather bulletins.
    Bulletins(BulletinArgs),
    /// Calendar events.
    Events(EventArgs),
}

/// Search, sort and page controls shared by every screen.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Case-insensitive free-text search.
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Field to sort by.
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number, starting at 1.
    #[arg(long, short, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (overrides the config file).
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct IncidentArgs {
    #[command(flatten)]
    pub list: ListArgs,

    #[arg(long, default_value = ALL)]
    pub status: String,

    #[arg(long, default_value = ALL)]
    pub severity: String,

    #[arg(long = "type", default_value = ALL)]
    pub incident_type: String,

    #[arg(long, default_value = ALL)]
    pub tag: String,

    /// Reported on or after this date.
    #[arg(long, default_value = "", value_name = "DATE")]
    pub from: String,

    /// Reported on or before this date.
    #[arg(long, default_value = "", value_name = "DATE")]
    pub to: String,
}

impl IncidentArgs {
    pub fn filters(&self) -> FilterSet {
        FilterSet::new()
            .with(FilterClause::any_of(
                [Incident::TITLE, Incident::BARANGAY, Incident::INCIDENT_TYPE],
                self.list.search.as_str(),
            ))
            .with(FilterClause::equals(Incident::STATUS, self.status.as_str()))
            .with(FilterClause::equals(Incident::SEVERITY, self.severity.as_str()))
            .with(FilterClause::equals(
                Incident::INCIDENT_TYPE,
                self.incident_type.as_str(),
            ))
            .with(FilterClause::includes_tag(Incident::TAGS, self.tag.as_str()))
            .with(date_range(Incident::REPORTED_AT, &self.from, &self.to))
    }
}

#[derive(Debug, Clone, Args)]
pub struct CenterArgs {
    #[command(flatten)]
    pub list: ListArgs,

    #[arg(long, default_value = ALL)]
    pub status: String,

    #[arg(long, default_value = ALL)]
    pub barangay: String,

    /// Require a facility, e.g. `clinic`.
    #[arg(long, default_value = ALL)]
    pub facility: String,

    /// Minimum occupancy rate, in percent.
    #[arg(long, value_name = "PCT", value_parser = parse_rate)]
    pub min_rate: Option<f64>,

    /// Maximum occupancy rate, in percent.
    #[arg(long, value_name = "PCT", value_parser = parse_rate)]
    pub max_rate: Option<f64>,
}

impl CenterArgs {
    pub fn filters(&self) -> FilterSet {
        FilterSet::new()
            .with(FilterClause::any_of(
                [Center::NAME, Center::BARANGAY, Center::ADDRESS],
                self.list.search.as_str(),
            ))
            .with(FilterClause::equals(Center::STATUS, self.status.as_str()))
            .with(FilterClause::equals(Center::BARANGAY, self.barangay.as_str()))
            .with(FilterClause::includes_tag(
                Center::FACILITIES,
                self.facility.as_str(),
            ))
            .with(FilterClause::range(
                Center::OCCUPANCY_RATE,
                self.min_rate.map(Scalar::from),
                self.max_rate.map(Scalar::from),
            ))
    }
}

#[derive(Debug, Clone, Args)]
pub struct BulletinArgs {
    #[command(flatten)]
    pub list: ListArgs,

    #[arg(long, default_value = ALL)]
    pub status: String,

    #[arg(long, value_name = "LEVEL")]
    pub min_signal: Option<u8>,

    #[arg(long, value_name = "LEVEL")]
    pub max_signal: Option<u8>,

    /// Issued on or after this date.
    #[arg(long, default_value = "", value_name = "DATE")]
    pub from: String,

    /// Issued on or before this date.
    #[arg(long, default_value = "", value_name = "DATE")]
    pub to: String,
}

impl BulletinArgs {
    pub fn filters(&self) -> FilterSet {
        FilterSet::new()
            .with(FilterClause::any_of(
                [Bulletin::TITLE, Bulletin::REGION],
                self.list.search.as_str(),
            ))
            .with(FilterClause::equals(Bulletin::STATUS, self.status.as_str()))
            .with(FilterClause::range(
                Bulletin::SIGNAL_LEVEL,
                self.min_signal.map(Scalar::from),
                self.max_signal.map(Scalar::from),
            ))
            .with(date_range(Bulletin::ISSUED_AT, &self.from, &self.to))
    }
}

#[derive(Debug, Clone, Args)]
pub struct EventArgs {
    #[command(flatten)]
    pub list: ListArgs,

    #[arg(long, default_value = ALL)]
    pub category: String,

    /// Starting on or after this date.
    #[arg(long, default_value = "", value_name = "DATE")]
    pub from: String,

    /// Starting on or before this date.
    #[arg(long, default_value = "", value_name = "DATE")]
    pub to: String,
}

impl EventArgs {
    pub fn filters(&self) -> FilterSet {
        FilterSet::new()
            .with(FilterClause::any_of(
                [Event::TITLE, Event::LOCATION],
                self.list.search.as_str(),
            ))
            .with(FilterClause::equals(Event::CATEGORY, self.category.as_str()))
            .with(date_range(Event::STARTS_AT, &self.from, &self.to))
    }
}

/// Parses a rate bound, rejecting NaN and infinities.
fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(format!("'{}' is not a finite number", s))
    }
}

/// A date-picker pair: blank inputs leave that end open.
///
/// A bare date as the upper bound covers that whole day.
fn date_range(field: &str, from: &str, to: &str) -> FilterClause {
    let to = if is_bare_date(to) {
        format!("{}T23:59:59.999", to)
    } else {
        to.to_string()
    };
    FilterClause::range(field, Some(from.into()), Some(to.into()))
}

fn is_bare_date(s: &str) -> bool {
    s.len() == 10 && s.as_bytes()[4] == b'-' && s.as_bytes()[7] == b'-'
}
