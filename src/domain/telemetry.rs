// Telemetry chart and indicator domain models
use super::reading::Reading;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// One chart position: x-axis label plus both metric values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub temperature: f64,
    pub energy: f64,
}

impl ChartPoint {
    pub fn new(label: String, temperature: f64, energy: f64) -> Self {
        Self {
            label,
            temperature,
            energy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
}

impl TileData {
    pub fn new(id: &str, title: &str, unit: &str, value: f64, precision: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            value,
            precision,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

impl SeriesData {
    pub fn new(id: &str, name: &str, color: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub series: Vec<SeriesData>,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn new(id: &str, title: &str, series: Vec<SeriesData>, points: Vec<ChartPoint>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            series,
            points,
        }
    }
}

/// How x-axis labels are produced for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStyle {
    /// "T-9" for the oldest position through "T-0" for the newest.
    Relative,
    /// Reading time of day, `HH:MM` in 24-hour local time.
    Clock,
}

impl LabelStyle {
    pub fn label(&self, position: usize, capacity: usize, reading: &Reading) -> String {
        match self {
            LabelStyle::Relative => format!("T-{}", capacity.saturating_sub(position + 1)),
            LabelStyle::Clock => reading
                .timestamp
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_relative_labels_count_down_to_newest() {
        let reading = Reading::placeholder(Utc::now());
        let labels: Vec<String> = (0..10)
            .map(|i| LabelStyle::Relative.label(i, 10, &reading))
            .collect();
        assert_eq!(labels.first().map(String::as_str), Some("T-9"));
        assert_eq!(labels.last().map(String::as_str), Some("T-0"));
    }

    #[test]
    fn test_clock_label_is_local_hours_minutes() {
        let local = Local.with_ymd_and_hms(2024, 3, 5, 7, 4, 59).single().unwrap();
        let reading = Reading::placeholder(local.with_timezone(&Utc));
        assert_eq!(LabelStyle::Clock.label(0, 6, &reading), "07:04");

        let evening = Local.with_ymd_and_hms(2024, 3, 5, 21, 30, 0).single().unwrap();
        let reading = Reading::placeholder(evening.with_timezone(&Utc));
        assert_eq!(LabelStyle::Clock.label(5, 6, &reading), "21:30");
    }
}
