//! Tanaw Board - the dashboard's list screens on the command line.
//!
//! Each subcommand is one management screen. Its flags are the screen's
//! filter controls, mapped onto a [`tanaw_query::Query`] and run against the
//! screen's dataset.

pub mod cli;
pub mod config;
pub mod data;
pub mod output;
pub mod records;
pub mod screens;

use anyhow::{Context, Result};

use crate::cli::{Cli, Screen};
use crate::config::BoardConfig;
use crate::data::DataSource;
use crate::screens::{build_query, list, Bulletins, Centers, Events, Incidents};

/// Runs the selected screen and returns the rendered output.
pub fn execute(cli: &Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => BoardConfig::load(path).context("loading configuration")?,
        None => BoardConfig::default(),
    };
    let format = cli.format.unwrap_or(config.format);
    let source = DataSource::from_dir(config.data_dir.as_deref());

    let listing = match &cli.command {
        Screen::Incidents(args) => {
            list::<Incidents>(&source, build_query(args.filters(), &args.list, config.page_size))?
        }
        Screen::Centers(args) => {
            list::<Centers>(&source, build_query(args.filters(), &args.list, config.page_size))?
        }
        Screen::Bulletins(args) => {
            list::<Bulletins>(&source, build_query(args.filters(), &args.list, config.page_size))?
        }
        Screen::Events(args) => {
            list::<Events>(&source, build_query(args.filters(), &args.list, config.page_size))?
        }
    };

    output::render(&listing, format)
}
