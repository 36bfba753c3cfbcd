// Dashboard domain model: layout skeleton and per-tick frames
use super::reading::Status;
use super::telemetry::{ChartData, SeriesData, TileData};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Static layout a viewer receives before any frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSkeleton {
    pub title: String,
    pub tick_interval_ms: u64,
    pub capacity: usize,
    pub tiles: Vec<TileSkeleton>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSkeleton {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
}

impl TileSkeleton {
    pub fn new(id: &str, title: &str, unit: &str, precision: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            precision,
        }
    }
}

/// Everything published on one tick: full window, indicators and status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardFrame {
    pub version: u64,
    pub generated_at: DateTime<Utc>,
    pub status: Status,
    pub status_label: String,
    pub tiles: Vec<TileData>,
    pub chart: ChartData,
}

#[cfg(test)]
impl DashboardFrame {
    pub fn tile(&self, id: &str) -> Option<&TileData> {
        self.tiles.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    Frame(DashboardFrame),
}
