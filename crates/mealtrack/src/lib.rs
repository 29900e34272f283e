//! `mealtrack` - a personal meal, alcohol and exercise journal
//!
//! This library provides the meal record model, the summary statistics and
//! CSV export computed over a list of records, and the `SQLite` store and
//! journal that keep that list current.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod journal;
pub mod logging;
pub mod meal;
pub mod storage;
pub mod summary;

pub use config::Config;
pub use error::{Error, Result};
pub use export::{to_csv, write_export, CsvExporter, ExportLocale};
pub use journal::Journal;
pub use logging::init_logging;
pub use meal::{parse_date, Alcohol, MealRecord, MealStore, MealType};
pub use storage::{Storage, StorageStats};
pub use summary::{summarize, MealSummary};
