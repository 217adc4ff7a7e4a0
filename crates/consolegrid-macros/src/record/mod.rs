//! Implementation of the `#[derive(GridRecord)]` macro.

mod attrs;
mod derive;

pub use derive::grid_record_derive_impl;
