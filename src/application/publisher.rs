// Publisher - Turns the window and latest reading into dashboard frames
use crate::application::classifier::Classifier;
use crate::application::generator::SampleGenerator;
use crate::domain::dashboard::{DashboardFrame, DashboardSkeleton, TileSkeleton};
use crate::domain::reading::Reading;
use crate::domain::telemetry::{ChartData, ChartPoint, LabelStyle, SeriesData, TileData};
use crate::domain::window::RollingWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TEMPERATURE_ID: &str = "temperature";
pub const ENERGY_ID: &str = "energy";
const CHART_ID: &str = "realtime";

/// Where the summary indicators take their values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndicatorMode {
    /// Indicators show the reading that was appended to the chart window.
    Linked,
    /// Legacy: indicators show a second, independent draw. Chart and
    /// indicators may disagree.
    Detached,
}

pub struct Publisher {
    title: String,
    labels: LabelStyle,
    classifier: Classifier,
    indicator_source: Option<SampleGenerator>,
}

impl Publisher {
    pub fn linked(title: String, labels: LabelStyle, classifier: Classifier) -> Self {
        Self {
            title,
            labels,
            classifier,
            indicator_source: None,
        }
    }

    pub fn detached(
        title: String,
        labels: LabelStyle,
        classifier: Classifier,
        indicator_source: SampleGenerator,
    ) -> Self {
        Self {
            title,
            labels,
            classifier,
            indicator_source: Some(indicator_source),
        }
    }

    pub fn mode(&self) -> IndicatorMode {
        match self.indicator_source {
            Some(_) => IndicatorMode::Detached,
            None => IndicatorMode::Linked,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Build the frame for a tick. `window` must already contain `appended`.
    pub fn compose(
        &mut self,
        window: &RollingWindow,
        appended: &Reading,
        now: DateTime<Utc>,
    ) -> DashboardFrame {
        let indicator = match self.indicator_source.as_mut() {
            Some(source) => source.generate(now),
            None => *appended,
        };
        let status = self.classifier.classify(&indicator);

        let capacity = window.capacity();
        let points: Vec<ChartPoint> = window
            .snapshot()
            .iter()
            .enumerate()
            .map(|(position, r)| {
                ChartPoint::new(
                    self.labels.label(position, capacity, r),
                    r.temperature,
                    r.energy,
                )
            })
            .collect();

        let tiles = vec![
            TileData::new(TEMPERATURE_ID, "Temperature", "°C", indicator.temperature, 1),
            TileData::new(ENERGY_ID, "Energy Draw", "%", indicator.energy, 0),
        ];

        DashboardFrame {
            version: window.version(),
            generated_at: now,
            status,
            status_label: status.label().to_string(),
            tiles,
            chart: ChartData::new(CHART_ID, "Real-time Monitoring", series(), points),
        }
    }

    pub fn skeleton(&self, tick_interval_ms: u64, capacity: usize) -> DashboardSkeleton {
        DashboardSkeleton {
            title: self.title.clone(),
            tick_interval_ms,
            capacity,
            tiles: vec![
                TileSkeleton::new(TEMPERATURE_ID, "Temperature", "°C", 1),
                TileSkeleton::new(ENERGY_ID, "Energy Draw", "%", 0),
                TileSkeleton::new("status", "System Status", "", 0),
            ],
            series: series(),
        }
    }
}

fn series() -> Vec<SeriesData> {
    vec![
        SeriesData::new(TEMPERATURE_ID, "Temperature", Some("#60A5FA")),
        SeriesData::new(ENERGY_ID, "Energy", Some("#FBBF24")),
    ]
}
