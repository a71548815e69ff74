//! Run statistics.

use observability::MetricsSummary;
use publishers::StatsSnapshot;
use serde::Serialize;

/// Statistics from one simulation run
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub world: String,
    /// Clock ticks executed, rewinds included
    pub ticks: u64,
    pub sim_start: f64,
    pub sim_end: f64,
    pub wall_secs: f64,
    pub sensors: usize,
    pub publish: StatsSnapshot,
    pub updates: MetricsSummary,
}

impl RunStats {
    /// Simulated seconds per wall-clock second
    pub fn speedup(&self) -> f64 {
        let simulated = self.sim_end - self.sim_start;
        if self.wall_secs > 0.0 {
            simulated / self.wall_secs
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!("\n=== Simulation: {} ===", self.world);
        println!("  Ticks: {}", self.ticks);
        println!("  Simulated: {:.3}s -> {:.3}s", self.sim_start, self.sim_end);
        println!("  Wall time: {:.3}s ({:.1}x)", self.wall_secs, self.speedup());
        println!("  Sensors: {}", self.sensors);
        println!(
            "  Published: {} packets, {} bytes, {} failures",
            self.publish.packets, self.publish.bytes, self.publish.failures
        );
        println!("\n{}", self.updates);
    }
}
