use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::channels::{FOOD, HOME};
use crate::scenario;
use crate::simulation::AntSimulation;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
}

/// Collects per-tick wall-clock durations.
#[derive(Debug, Clone, Default)]
pub struct TickTimings {
    samples: Vec<f64>,
}

impl TickTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, millis: f64) {
        self.samples.push(millis);
    }

    pub fn summary(&self) -> TimingSummary {
        if self.samples.is_empty() {
            return TimingSummary::default();
        }
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();
        TimingSummary {
            count: n,
            min_ms: sorted[0],
            max_ms: sorted[n - 1],
            mean_ms: sorted.iter().sum::<f64>() / n as f64,
            p50_ms: percentile_nearest_rank(&sorted, 0.50),
            p90_ms: percentile_nearest_rank(&sorted, 0.90),
            p99_ms: percentile_nearest_rank(&sorted, 0.99),
        }
    }
}

fn percentile_nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    let rank = ((p * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

/// Summary of a headless run, printed as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub ants: usize,
    pub ticks: u64,
    pub food_collected: u64,
    pub food_at_nest: u64,
    pub carrying: usize,
    pub food_cells_left: usize,
    pub home_pheromone_total: f64,
    pub food_pheromone_total: f64,
    pub tick_timing: TimingSummary,
}

impl RunReport {
    pub fn capture(sim: &AntSimulation, scenario: &str, timings: &TickTimings) -> Self {
        let config = sim.config();
        Self {
            scenario: scenario.to_string(),
            seed: config.seed,
            width: config.width,
            height: config.height,
            ants: sim.ants().len(),
            ticks: sim.tick_count(),
            food_collected: sim.food_collected(),
            food_at_nest: sim.food_at_nest(),
            carrying: sim.carrying_count(),
            food_cells_left: sim.masks().food_cell_count(),
            home_pheromone_total: sim.field().total(HOME),
            food_pheromone_total: sim.field().total(FOOD),
            tick_timing: timings.summary(),
        }
    }
}

/// Step `sim` for `ticks` ticks, applying the finite-food policy between
/// ticks, and report the outcome.
pub fn run_headless(sim: &mut AntSimulation, scenario: &str, ticks: u64, log_every: u64) -> RunReport {
    let mut timings = TickTimings::new();
    for _ in 0..ticks {
        let start = Instant::now();
        sim.step();
        timings.push(start.elapsed().as_secs_f64() * 1000.0);
        scenario::deplete_picked_food(sim);

        if log_every > 0 && sim.tick_count() % log_every == 0 {
            info!(
                tick = sim.tick_count(),
                food_collected = sim.food_collected(),
                food_at_nest = sim.food_at_nest(),
                "progress"
            );
        }
    }
    RunReport::capture(sim, scenario, &timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::scenario::{build, Scenario};

    #[test]
    fn percentile_summary_is_reasonable() {
        let mut timings = TickTimings::new();
        for i in 1..=100 {
            timings.push(i as f64);
        }
        let s = timings.summary();
        assert_eq!(s.count, 100);
        assert_eq!(s.min_ms, 1.0);
        assert_eq!(s.max_ms, 100.0);
        assert!((s.mean_ms - 50.5).abs() < 1e-6);
        assert_eq!(s.p50_ms, 50.0);
        assert_eq!(s.p90_ms, 90.0);
        assert_eq!(s.p99_ms, 99.0);
    }

    #[test]
    fn empty_timings_summarize_to_zero() {
        assert_eq!(TickTimings::new().summary(), TimingSummary::default());
    }

    #[test]
    fn headless_run_reports_counters() {
        let config = SimConfig {
            n_ants: 20,
            sense_distance: 5,
            ..SimConfig::default().with_shape(48, 48)
        };
        let mut sim = AntSimulation::new(config).unwrap();
        build(Scenario::Open, 48, 48, 0).apply(&mut sim).unwrap();
        sim.ready().unwrap();

        let report = run_headless(&mut sim, "open", 25, 0);

        assert_eq!(report.ticks, 25);
        assert_eq!(report.ants, 20);
        assert_eq!(report.tick_timing.count, 25);
        assert!(report.food_at_nest <= report.food_collected);
        assert!(report.home_pheromone_total > 0.0);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"scenario\":\"open\""));
    }
}
