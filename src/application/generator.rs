// Sample generator - Synthetic telemetry source
use crate::domain::reading::Reading;
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const TEMPERATURE_STEP: f64 = 1.0;
const ENERGY_STEP: f64 = 2.0;

/// Hours before mount, temperature, energy.
const MOCK_HISTORY: [(i64, f64, f64); 6] = [
    (20, 24.0, 85.0),
    (16, 23.0, 82.0),
    (12, 26.0, 90.0),
    (8, 28.0, 88.0),
    (4, 27.0, 85.0),
    (0, 25.0, 83.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorMode {
    /// Fresh uniform draws in [0, 100) every tick.
    Independent,
    /// Small signed drift from the previous reading.
    RandomWalk,
}

pub struct SampleGenerator {
    mode: GeneratorMode,
    rng: StdRng,
    previous: Reading,
}

impl SampleGenerator {
    /// `origin` is the starting point of a random walk; ignored in independent mode.
    pub fn new(mode: GeneratorMode, origin: Reading, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode,
            rng,
            previous: origin,
        }
    }

    pub fn mode(&self) -> GeneratorMode {
        self.mode
    }

    pub fn generate(&mut self, now: DateTime<Utc>) -> Reading {
        let reading = match self.mode {
            GeneratorMode::Independent => Reading::new(
                now,
                self.rng.gen_range(0..100) as f64,
                self.rng.gen_range(0..100) as f64,
            ),
            GeneratorMode::RandomWalk => {
                let temperature_delta = self.rng.gen_range(-TEMPERATURE_STEP..TEMPERATURE_STEP);
                let energy_delta = self.rng.gen_range(-ENERGY_STEP..ENERGY_STEP);
                walk_step(&self.previous, temperature_delta, energy_delta, now)
            }
        };
        self.previous = reading;
        reading
    }
}

/// One random-walk step: temperature rounded to 1 decimal, energy to an integer.
pub fn walk_step(
    previous: &Reading,
    temperature_delta: f64,
    energy_delta: f64,
    now: DateTime<Utc>,
) -> Reading {
    Reading::new(
        now,
        round_to(previous.temperature + temperature_delta, 1),
        round_to(previous.energy + energy_delta, 0),
    )
}

/// Six canned readings four hours apart, the newest stamped at `now`.
pub fn mock_history(now: DateTime<Utc>) -> Vec<Reading> {
    MOCK_HISTORY
        .iter()
        .map(|&(hours_ago, temperature, energy)| {
            Reading::new(now - TimeDelta::hours(hours_ago), temperature, energy)
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
