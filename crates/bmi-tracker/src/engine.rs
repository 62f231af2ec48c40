//! BMI computation and the record-an-observation transaction.
//!
//! Raw form text is parsed with a single canonical rule into
//! [`PositiveFinite`] values before any arithmetic happens, so nothing is
//! written unless both inputs are valid.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::observation::{Measurement, Observation, PositiveFinite, Record};
use crate::storage::Storage;

/// Accepted shape of a measurement after trimming: optional sign, ASCII
/// digits with `.` as the decimal separator, optional exponent.
const DECIMAL_PATTERN: &str = r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$";

fn decimal_regex() -> &'static Regex {
    static DECIMAL: OnceLock<Regex> = OnceLock::new();
    DECIMAL.get_or_init(|| Regex::new(DECIMAL_PATTERN).expect("decimal pattern is valid"))
}

/// Compute the body-mass index from kilograms and centimeters.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if either value is non-finite or not
/// greater than zero, or if the result itself is not a positive finite
/// number.
pub fn compute(weight: f64, height: f64) -> Result<f64> {
    let weight = PositiveFinite::new(Measurement::Weight, weight)?;
    let height = PositiveFinite::new(Measurement::Height, height)?;
    Observation::new(weight, height).map(|observation| observation.bmi())
}

/// Compute the body-mass index from already validated measurements.
///
/// Valid inputs can still leave `f64` range: a height whose square in meters
/// underflows to zero, or a weight large enough to overflow the quotient.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the measurement that pushed the
/// result out of range.
pub fn bmi(weight: PositiveFinite, height: PositiveFinite) -> Result<f64> {
    let meters = height.get() / 100.0;
    let square = meters * meters;
    let value = weight.get() / square;

    if !value.is_finite() {
        let culprit = if square < f64::MIN_POSITIVE {
            Measurement::Height
        } else {
            Measurement::Weight
        };
        return Err(Error::invalid_input(culprit, "gives a BMI too large to represent"));
    }
    if value <= 0.0 {
        return Err(Error::invalid_input(
            Measurement::Weight,
            "gives a BMI too small to represent",
        ));
    }
    Ok(value)
}

/// Parse one form field into a validated measurement.
///
/// Surrounding whitespace is ignored. Comma decimals, `inf`, `nan` and
/// anything else outside [`DECIMAL_PATTERN`] are rejected, as are values
/// that overflow to infinity or are not greater than zero.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] describing why `raw` was rejected.
pub fn parse_measurement(measurement: Measurement, raw: &str) -> Result<PositiveFinite> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Error::invalid_input(measurement, "value is empty"));
    }
    if !decimal_regex().is_match(text) {
        return Err(Error::invalid_input(
            measurement,
            format!("'{text}' is not a decimal number"),
        ));
    }

    let value: f64 = text.parse().map_err(|_| {
        Error::invalid_input(measurement, format!("'{text}' is not a decimal number"))
    })?;
    PositiveFinite::new(measurement, value)
}

/// Parse both form fields and compute their BMI, weight first.
fn parse_observation(weight_text: &str, height_text: &str) -> Result<Observation> {
    let weight = parse_measurement(Measurement::Weight, weight_text)?;
    let height = parse_measurement(Measurement::Height, height_text)?;
    Observation::new(weight, height)
}

/// Validates form input, computes the BMI and persists the result.
#[derive(Debug, Clone, Copy)]
pub struct BmiEngine<'a> {
    storage: &'a Storage,
}

impl<'a> BmiEngine<'a> {
    /// Create an engine writing to `storage`.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse both inputs, compute the BMI and append one record.
    ///
    /// Validation completes before the store is touched, so a rejected input
    /// never leaves a row behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either input is rejected, or a
    /// storage error if the append fails.
    pub fn record_observation(&self, weight_text: &str, height_text: &str) -> Result<Record> {
        let observation = match parse_observation(weight_text, height_text) {
            Ok(observation) => observation,
            Err(err) => {
                warn!("Rejected observation: {}", err);
                return Err(err);
            }
        };

        debug!(
            "Computed bmi {:.2} for {} kg / {} cm",
            observation.bmi(),
            observation.weight().get(),
            observation.height().get()
        );
        self.storage.append(&observation)
    }

    /// Most recent records, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn recent_records(&self, limit: usize) -> Result<Vec<Record>> {
        self.storage.recent_records(limit)
    }
}
