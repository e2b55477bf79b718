//! Opportunity scan results for both maintenance policies.

use std::fmt;

use super::{OpportunitySeries, OpportunityWindow, WindowPolicy, scan};

/// Windows found under one policy.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub policy: WindowPolicy,
    pub windows: Vec<OpportunityWindow>,
}

impl ScanResult {
    pub fn run(series: &OpportunitySeries, policy: WindowPolicy) -> Self {
        Self {
            policy,
            windows: scan(series, &policy),
        }
    }

    pub fn count(&self) -> usize {
        self.windows.len()
    }

    /// Length of the longest qualifying run, in samples.
    pub fn longest_run(&self) -> usize {
        self.windows.iter().map(|w| w.len).max().unwrap_or(0)
    }
}

/// Results of both scans over one series.
#[derive(Debug, Clone)]
pub struct OpportunityReport {
    pub samples: usize,
    pub sample_rate_hours: f64,
    pub sensor_check: ScanResult,
    pub repair: ScanResult,
}

impl OpportunityReport {
    pub fn from_series(
        series: &OpportunitySeries,
        sample_rate_hours: f64,
        sensor_check: WindowPolicy,
        repair: WindowPolicy,
    ) -> Self {
        Self {
            samples: series.len(),
            sample_rate_hours,
            sensor_check: ScanResult::run(series, sensor_check),
            repair: ScanResult::run(series, repair),
        }
    }
}

impl fmt::Display for OpportunityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = |n: usize| n as f64 * self.sample_rate_hours;
        writeln!(f, "--- Opportunity Report ---")?;
        writeln!(f, "Samples scanned:                      {}", self.samples)?;
        writeln!(
            f,
            "Sensor check opportunities:           {}",
            self.sensor_check.count()
        )?;
        writeln!(
            f,
            "Long-duration repair opportunities:   {}",
            self.repair.count()
        )?;
        write!(
            f,
            "Longest repair window:                {:.1} h (minimum {:.1} h)",
            hours(self.repair.longest_run()),
            hours(self.repair.policy.min_consecutive)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_both_policies() {
        let n = 30;
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
        // calm throughout, one rough sample in the middle
        let wave: Vec<f64> = (0..n).map(|i| if i == 10 { 2.0 } else { 0.2 }).collect();
        let series =
            OpportunitySeries::from_columns(time, vec![0.0; n], vec![0.0; n], wave).unwrap();
        let report = OpportunityReport::from_series(
            &series,
            0.5,
            WindowPolicy::SENSOR_CHECK,
            WindowPolicy::LONG_DURATION_REPAIR,
        );
        assert_eq!(report.sensor_check.count(), 2);
        assert_eq!(report.repair.count(), 0);
        assert_eq!(report.repair.longest_run(), 0);

        let text = report.to_string();
        assert!(text.contains("Sensor check opportunities:           2"));
        assert!(text.contains("minimum 12.0 h"));
    }
}
