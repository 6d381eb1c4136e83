//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! Turns `#[query(...)]` field annotations into a `kiln_query::Queryable`
//! implementation and field name constants.

mod attrs;
mod derive;

pub use derive::queryable_derive_impl;
