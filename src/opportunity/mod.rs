//! Maintenance opportunity-window detection.
//!
//! Scans an instrument/environment time series for contiguous runs of
//! samples where the reference signal and wave height are inside a
//! policy's limits. A run counts as one opportunity once it has lasted
//! `min_consecutive` samples; longer runs are still a single opportunity.

pub mod report;
pub mod series;

use serde::Deserialize;

pub use report::{OpportunityReport, ScanResult};
pub use series::OpportunitySeries;

/// Thresholds and minimum run length for one kind of maintenance action.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowPolicy {
    /// Reference signal must satisfy `-limit < reference < limit`.
    pub reference_limit: f64,
    /// Wave height must be strictly below this (m).
    pub max_wave_height_m: f64,
    /// Consecutive acceptable samples required before the run counts.
    pub min_consecutive: usize,
}

impl WindowPolicy {
    /// Short sensor check. Each 30 min slot already exceeds the 20 min the
    /// check needs, so any acceptable sample is enough.
    pub const SENSOR_CHECK: Self = Self {
        reference_limit: 1.0,
        max_wave_height_m: 0.5,
        min_consecutive: 1,
    };

    /// Long-duration repair: 24 consecutive 30 min slots (12 h).
    pub const LONG_DURATION_REPAIR: Self = Self {
        reference_limit: 1.75,
        max_wave_height_m: 1.5,
        min_consecutive: 24,
    };

    pub fn accepts(&self, reference: f64, wave_height_m: f64) -> bool {
        reference > -self.reference_limit
            && reference < self.reference_limit
            && wave_height_m < self.max_wave_height_m
    }
}

/// A run of acceptable samples that met the policy's minimum length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpportunityWindow {
    /// Index of the run's first sample.
    pub start: usize,
    /// Run length in samples, up to the first unacceptable sample.
    pub len: usize,
    /// Time value of the run's first sample.
    pub start_time: f64,
}

/// Single forward pass over `series`, returning every qualifying window.
///
/// A window is recorded the moment its run first reaches
/// `policy.min_consecutive` samples and its length keeps growing until the
/// run ends. An unacceptable sample resets the run.
pub fn scan(series: &OpportunitySeries, policy: &WindowPolicy) -> Vec<OpportunityWindow> {
    let required = policy.min_consecutive.max(1);
    let mut windows: Vec<OpportunityWindow> = Vec::new();
    let mut consecutive = 0_usize;
    let mut counted = false;

    let samples = series.reference.iter().zip(&series.wave_height_m);
    for (i, (&reference, &wave)) in samples.enumerate() {
        if !policy.accepts(reference, wave) {
            consecutive = 0;
            counted = false;
            continue;
        }
        consecutive += 1;
        if counted {
            if let Some(w) = windows.last_mut() {
                w.len = consecutive;
            }
        } else if consecutive >= required {
            counted = true;
            let start = i + 1 - consecutive;
            windows.push(OpportunityWindow {
                start,
                len: consecutive,
                start_time: series.time[start],
            });
        }
    }
    windows
}

/// Number of opportunities `series` offers under `policy`.
pub fn count_opportunities(series: &OpportunitySeries, policy: &WindowPolicy) -> usize {
    scan(series, policy).len()
}

/// Runs counted by the sensor-check policy.
pub fn sensor_check_opportunities(series: &OpportunitySeries) -> usize {
    count_opportunities(series, &WindowPolicy::SENSOR_CHECK)
}

/// Runs of at least 24 samples counted by the long-duration-repair policy.
pub fn repair_opportunities(series: &OpportunitySeries) -> usize {
    count_opportunities(series, &WindowPolicy::LONG_DURATION_REPAIR)
}
