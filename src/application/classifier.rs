// Status classifier - Normal/Warning derivation
use crate::domain::reading::{Reading, Status};

/// Either metric strictly above this value raises a warning.
pub const WARNING_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    threshold: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            threshold: WARNING_THRESHOLD,
        }
    }
}

impl Classifier {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classify(&self, reading: &Reading) -> Status {
        if reading.temperature > self.threshold || reading.energy > self.threshold {
            Status::Warning
        } else {
            Status::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(temperature: f64, energy: f64) -> Reading {
        Reading::new(Utc::now(), temperature, energy)
    }

    fn classify(reading: &Reading) -> Status {
        Classifier::default().classify(reading)
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(classify(&reading(90.0, 90.0)), Status::Normal);
        assert_eq!(classify(&reading(90.1, 0.0)), Status::Warning);
        assert_eq!(classify(&reading(0.0, 91.0)), Status::Warning);
        assert_eq!(classify(&reading(24.7, 84.0)), Status::Normal);
    }

    #[test]
    fn test_scenario_hot_reading_warns() {
        assert_eq!(classify(&reading(95.0, 40.0)), Status::Warning);
    }

    #[test]
    fn test_threshold_override() {
        let classifier = Classifier::with_threshold(80.0);
        assert_eq!(classifier.threshold(), 80.0);
        assert_eq!(classifier.classify(&reading(85.0, 10.0)), Status::Warning);
        assert_eq!(classifier.classify(&reading(80.0, 80.0)), Status::Normal);
    }
}
