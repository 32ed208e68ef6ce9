//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates field-name constants and a `tanaw_query::Record` impl from
//! `#[field(...)]` annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
