//! Modboard – a desktop dashboard for interdependent value-set filtering.
//!
//! A CSV (or JSON records) dataset is loaded in the background, columns named
//! `mod<digits>` become filters, and the rows passing every active filter
//! are shown in a paginated table. The filtering itself lives in
//! [`data::filter::FilterEngine`] and has no UI dependencies.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;

pub use data::filter::FilterEngine;
pub use data::model::{CellValue, Dataset, FilterValue, Row};
pub use error::FilterError;
