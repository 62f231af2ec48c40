//! `bmi-tracker` - Body-mass index calculation with a local history
//!
//! This library validates weight/height input, computes the BMI, keeps every
//! result in a `SQLite` record store, and renders the history as a table and
//! trend chart.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod observation;
pub mod report;
pub mod storage;

pub use config::Config;
pub use engine::{compute, parse_measurement, BmiEngine};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use observation::{Measurement, Observation, PositiveFinite, Record, RecordId};
pub use storage::{Storage, StorageStats};
