//! Core observation types for bmi-tracker.
//!
//! This module defines the validated measurement values that flow into the
//! engine and the records that come back out of the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which of the two form inputs a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    /// Body weight in kilograms.
    Weight,
    /// Body height in centimeters.
    Height,
}

impl Measurement {
    /// Unit the measurement is expressed in.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Weight => "kg",
            Self::Height => "cm",
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weight => write!(f, "weight"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// A real number known to be finite and strictly greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PositiveFinite(f64);

impl PositiveFinite {
    /// Validate `value` as a measurement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `value` is NaN, infinite, zero or
    /// negative.
    pub fn new(measurement: Measurement, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_input(measurement, "must be a finite number"));
        }
        if value <= 0.0 {
            return Err(Error::invalid_input(measurement, "must be greater than zero"));
        }
        Ok(Self(value))
    }

    /// The wrapped value.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// A validated weight/height pair together with its computed BMI.
///
/// This is what the engine hands to the store; the store adds the id and
/// timestamp. The BMI is always derived from the two measurements and is
/// positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    weight: PositiveFinite,
    height: PositiveFinite,
    bmi: f64,
}

impl Observation {
    /// Build an observation, computing the BMI from the two measurements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the BMI is not representable as a
    /// positive finite number.
    pub fn new(weight: PositiveFinite, height: PositiveFinite) -> Result<Self> {
        let bmi = crate::engine::bmi(weight, height)?;
        Ok(Self {
            weight,
            height,
            bmi,
        })
    }

    /// Weight in kilograms.
    #[must_use]
    pub fn weight(&self) -> PositiveFinite {
        self.weight
    }

    /// Height in centimeters.
    #[must_use]
    pub fn height(&self) -> PositiveFinite {
        self.height
    }

    /// Body-mass index derived from `weight` and `height`.
    #[must_use]
    pub fn bmi(&self) -> f64 {
        self.bmi
    }
}

/// Identifier assigned to a record by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted BMI observation.
///
/// Records are created only by [`crate::Storage::append`] and never change
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique, monotonically increasing identifier.
    pub id: RecordId,
    /// Weight in kilograms.
    pub weight: f64,
    /// Height in centimeters.
    pub height: f64,
    /// Computed body-mass index.
    pub bmi: f64,
    /// When the store accepted this record.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_display() {
        assert_eq!(Measurement::Weight.to_string(), "weight");
        assert_eq!(Measurement::Height.to_string(), "height");
    }

    #[test]
    fn test_measurement_unit() {
        assert_eq!(Measurement::Weight.unit(), "kg");
        assert_eq!(Measurement::Height.unit(), "cm");
    }

    #[test]
    fn test_positive_finite_accepts_positive() {
        let value = PositiveFinite::new(Measurement::Weight, 70.5).unwrap();
        assert!((value.get() - 70.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_positive_finite_rejects_zero_and_negative() {
        assert!(PositiveFinite::new(Measurement::Height, 0.0)
            .unwrap_err()
            .is_invalid_input());
        assert!(PositiveFinite::new(Measurement::Height, -175.0)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_positive_finite_rejects_non_finite() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = PositiveFinite::new(Measurement::Weight, value).unwrap_err();
            assert!(err.to_string().contains("finite"));
        }
    }

    #[test]
    fn test_observation_new_computes_bmi() {
        let weight = PositiveFinite::new(Measurement::Weight, 70.0).unwrap();
        let height = PositiveFinite::new(Measurement::Height, 175.0).unwrap();
        let observation = Observation::new(weight, height).unwrap();

        assert!((observation.bmi() - 22.857).abs() < 0.01);
        assert_eq!(observation.weight(), weight);
        assert_eq!(observation.height(), height);
    }

    #[test]
    fn test_observation_new_rejects_infinite_bmi() {
        let weight = PositiveFinite::new(Measurement::Weight, 70.0).unwrap();
        let height = PositiveFinite::new(Measurement::Height, 1e-200).unwrap();

        let err = Observation::new(weight, height).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId(42).to_string(), "42");
    }

    #[test]
    fn test_record_serialization() {
        let record = Record {
            id: RecordId(7),
            weight: 70.0,
            height: 175.0,
            bmi: 22.86,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":7"));

        let deserialized: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
