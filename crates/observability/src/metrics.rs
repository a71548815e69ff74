//! Update metrics
//!
//! Free functions feed the global `metrics` recorder (Prometheus when
//! installed, no-op otherwise). [`UpdateMetricsAggregator`] keeps the same
//! information in memory for the end-of-run summary.

use std::collections::BTreeMap;

use metrics::{counter, gauge};
use serde::Serialize;

/// Record one dispatch outcome (`updated`, `not_due` or `failed`).
pub fn record_update(sensor: &str, outcome: &str, forced: bool) {
    counter!(
        "sensor_sim_updates_total",
        "sensor" => sensor.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    if forced {
        counter!("sensor_sim_forced_updates_total", "sensor" => sensor.to_string()).increment(1);
    }
    if outcome == "failed" {
        counter!("sensor_sim_generation_failures_total", "sensor" => sensor.to_string())
            .increment(1);
    }
}

/// Record the next scheduled time of a sensor.
pub fn record_next_update_time(sensor: &str, next: f64) {
    gauge!("sensor_sim_next_update_time", "sensor" => sensor.to_string()).set(next);
}

/// Record a packet handed to a publisher.
pub fn record_publish(publisher: &str, topic: &str, bytes: usize, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sensor_sim_packets_published_total",
        "publisher" => publisher.to_string(),
        "topic" => topic.to_string(),
        "status" => status
    )
    .increment(1);

    if success {
        counter!("sensor_sim_published_bytes_total", "publisher" => publisher.to_string())
            .increment(bytes as u64);
    }
}

#[derive(Debug, Clone, Default)]
struct SensorTrack {
    updates: u64,
    forced: u64,
    failures: u64,
    last_scheduled: Option<f64>,
    intervals: RunningStats,
}

/// In-memory tally of dispatch outcomes over a run.
#[derive(Debug, Clone, Default)]
pub struct UpdateMetricsAggregator {
    /// Manager passes observed
    pub ticks: u64,
    pub scheduled_updates: u64,
    pub forced_updates: u64,
    pub not_due: u64,
    pub failures: u64,
    /// Clock rewinds seen
    pub resets: u64,
    sensors: BTreeMap<String, SensorTrack>,
}

impl UpdateMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_tick(&mut self) {
        self.ticks += 1;
    }

    /// The clock was rewound; the next interval of every sensor starts fresh.
    pub fn observe_reset(&mut self) {
        self.resets += 1;
        for track in self.sensors.values_mut() {
            track.last_scheduled = None;
        }
    }

    /// Fold in one dispatch outcome for `sensor` at simulation time `now`.
    ///
    /// Intervals are measured between successful scheduled updates only.
    pub fn observe(&mut self, sensor: &str, now: f64, outcome: &str, forced: bool) {
        let track = self.sensors.entry(sensor.to_string()).or_default();

        match (outcome, forced) {
            ("updated", true) => {
                self.forced_updates += 1;
                track.forced += 1;
            }
            ("updated", false) => {
                self.scheduled_updates += 1;
                track.updates += 1;
                if let Some(last) = track.last_scheduled {
                    track.intervals.push(now - last);
                }
                track.last_scheduled = Some(now);
            }
            ("failed", _) => {
                self.failures += 1;
                track.failures += 1;
            }
            _ => self.not_due += 1,
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let attempts = self.scheduled_updates + self.forced_updates + self.failures;

        MetricsSummary {
            ticks: self.ticks,
            scheduled_updates: self.scheduled_updates,
            forced_updates: self.forced_updates,
            not_due: self.not_due,
            failures: self.failures,
            resets: self.resets,
            failure_rate: if attempts > 0 {
                self.failures as f64 / attempts as f64 * 100.0
            } else {
                0.0
            },
            sensors: self
                .sensors
                .iter()
                .map(|(name, track)| SensorUpdateSummary {
                    name: name.clone(),
                    updates: track.updates,
                    forced: track.forced,
                    failures: track.failures,
                    achieved_rate_hz: match track.intervals.mean() {
                        mean if mean > 0.0 => Some(1.0 / mean),
                        _ => None,
                    },
                    interval_s: StatsSummary::from(&track.intervals),
                })
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSummary {
    pub ticks: u64,
    pub scheduled_updates: u64,
    pub forced_updates: u64,
    pub not_due: u64,
    pub failures: u64,
    pub resets: u64,
    /// Failed generations as a percentage of generation attempts
    pub failure_rate: f64,
    pub sensors: Vec<SensorUpdateSummary>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SensorUpdateSummary {
    pub name: String,
    pub updates: u64,
    pub forced: u64,
    pub failures: u64,
    /// Inverse of the mean scheduled interval
    pub achieved_rate_hz: Option<f64>,
    pub interval_s: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Update Summary ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Scheduled updates: {}", self.scheduled_updates)?;
        writeln!(f, "Forced updates: {}", self.forced_updates)?;
        writeln!(f, "Not due: {}", self.not_due)?;
        writeln!(
            f,
            "Generation failures: {} ({:.2}%)",
            self.failures, self.failure_rate
        )?;
        if self.resets > 0 {
            writeln!(f, "Clock resets: {}", self.resets)?;
        }

        for sensor in &self.sensors {
            write!(
                f,
                "  {}: updates={} forced={} failures={}",
                sensor.name, sensor.updates, sensor.forced, sensor.failures
            )?;
            match sensor.achieved_rate_hz {
                Some(rate) => writeln!(f, " rate={rate:.2}Hz interval(s): {}", sensor.interval_s)?,
                None => writeln!(f)?,
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.4}, max={:.4}, mean={:.4}, std={:.4} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford).
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
