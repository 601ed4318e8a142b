use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// The five ascending control points of the red → yellow → green → cyan → blue gradient.
///
/// Serialized as a plain `[t1, t2, t3, t4, t5]` array; deserializing goes
/// through [`Thresholds::new`] so unordered stops are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 5]", into = "[f64; 5]")]
pub struct Thresholds {
    t1: f64,
    t2: f64,
    t3: f64,
    t4: f64,
    t5: f64,
}

impl Thresholds {
    /// Build a threshold set; values must be finite and strictly ascending.
    pub fn new(t1: f64, t2: f64, t3: f64, t4: f64, t5: f64) -> Result<Self> {
        let values = [t1, t2, t3, t4, t5];

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ProcessingError::InvalidThresholds(format!(
                "threshold {} is not a finite number",
                bad
            )));
        }

        for (i, pair) in values.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(ProcessingError::InvalidThresholds(format!(
                    "t{} ({}) must be less than t{} ({})",
                    i + 1,
                    pair[0],
                    i + 2,
                    pair[1]
                )));
            }
        }

        Ok(Self { t1, t2, t3, t4, t5 })
    }

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [t1, t2, t3, t4, t5] => Self::new(*t1, *t2, *t3, *t4, *t5),
            _ => Err(ProcessingError::InvalidThresholds(format!(
                "expected 5 thresholds, got {}",
                values.len()
            ))),
        }
    }

    /// Scale anchored on a "safe" ozone level and the day's maximum reading.
    ///
    /// Red starts right above zero, yellow sits at half the safe level, green
    /// at the safe level, cyan halfway to the maximum and blue at the maximum.
    /// The maximum is raised to the safe level when the day never reaches it,
    /// which collapses the cyan and blue stops and is rejected.
    pub fn from_reference(safe_level: f64, observed_max: f64) -> Result<Self> {
        let max = observed_max.max(safe_level);
        Self::new(
            0.0,
            safe_level / 2.0,
            safe_level,
            safe_level + (max - safe_level) / 2.0,
            max,
        )
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.t1, self.t2, self.t3, self.t4, self.t5]
    }

    pub fn t1(&self) -> f64 {
        self.t1
    }

    pub fn t2(&self) -> f64 {
        self.t2
    }

    pub fn t3(&self) -> f64 {
        self.t3
    }

    pub fn t4(&self) -> f64 {
        self.t4
    }

    pub fn t5(&self) -> f64 {
        self.t5
    }
}

impl TryFrom<[f64; 5]> for Thresholds {
    type Error = ProcessingError;

    fn try_from(values: [f64; 5]) -> Result<Self> {
        let [t1, t2, t3, t4, t5] = values;
        Self::new(t1, t2, t3, t4, t5)
    }
}

impl From<Thresholds> for [f64; 5] {
    fn from(thresholds: Thresholds) -> Self {
        thresholds.as_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_thresholds() {
        let t = Thresholds::new(100.0, 225.0, 350.0, 476.0, 600.0).unwrap();
        assert_eq!(t.as_array(), [100.0, 225.0, 350.0, 476.0, 600.0]);
    }

    #[test]
    fn test_rejects_equal_or_descending() {
        assert!(matches!(
            Thresholds::new(100.0, 100.0, 350.0, 476.0, 600.0),
            Err(ProcessingError::InvalidThresholds(_))
        ));
        assert!(Thresholds::new(100.0, 225.0, 350.0, 600.0, 476.0).is_err());
        assert!(Thresholds::new(f64::NAN, 225.0, 350.0, 476.0, 600.0).is_err());
    }

    #[test]
    fn test_from_slice_length() {
        assert!(Thresholds::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
        assert!(Thresholds::from_slice(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_from_reference() {
        let t = Thresholds::from_reference(300.0, 500.0).unwrap();
        assert_eq!(t.as_array(), [0.0, 150.0, 300.0, 400.0, 500.0]);

        // A day that never exceeds the safe level collapses the upper ramp
        assert!(Thresholds::from_reference(300.0, 280.0).is_err());
    }

    #[test]
    fn test_deserialize_checks_order() {
        let t: Thresholds = serde_json::from_str("[100, 225, 350, 476, 600]").unwrap();
        assert_eq!(t.as_array(), [100.0, 225.0, 350.0, 476.0, 600.0]);
        assert_eq!(serde_json::to_string(&t).unwrap(), "[100.0,225.0,350.0,476.0,600.0]");

        let err = serde_json::from_str::<Thresholds>("[100, 100, 100, 100, 600]").unwrap_err();
        assert!(err.to_string().contains("t1 (100) must be less than t2 (100)"));

        // the old field-wise form is no longer accepted
        assert!(serde_json::from_str::<Thresholds>(
            r#"{"t1":100,"t2":100,"t3":100,"t4":100,"t5":600}"#
        )
        .is_err());
    }
}
