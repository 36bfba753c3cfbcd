// Reading domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One synthetic telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub energy: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, energy: f64) -> Self {
        Self {
            timestamp,
            temperature,
            energy,
        }
    }

    /// Zero-valued reading used to pad a window before it fills up.
    pub fn placeholder(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, 0.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Warning,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::Warning => "Warning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_zero() {
        let now = Utc::now();
        let reading = Reading::placeholder(now);
        assert_eq!(reading.temperature, 0.0);
        assert_eq!(reading.energy, 0.0);
        assert_eq!(reading.timestamp, now);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Warning).unwrap(), "\"warning\"");
        assert_eq!(Status::Normal.label(), "Normal");
    }
}
