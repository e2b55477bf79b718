//! Depth-averaged flow statistics for a speed table.

use crate::table::Table;

/// Mean flow speed across all depth cells, one value per time sample.
pub fn mean_speed_series(speed: &Table) -> Vec<f64> {
    (0..speed.rows())
        .map(|t| {
            let row = speed.row(t);
            if row.is_empty() {
                0.0
            } else {
                row.iter().sum::<f64>() / row.len() as f64
            }
        })
        .collect()
}

/// Daily maximum of a per-sample series.
///
/// Only complete days of `samples_per_day` samples are reported; a
/// trailing partial day is dropped.
pub fn daily_maxima(series: &[f64], samples_per_day: usize) -> Vec<f64> {
    if samples_per_day == 0 {
        return Vec::new();
    }
    series
        .chunks_exact(samples_per_day)
        .map(|day| day.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .collect()
}

/// Summary of a flow-speed table.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSummary {
    /// Mean of the depth-averaged speed over the whole period (m/s).
    pub mean_speed_ms: f64,
    /// Highest depth-averaged speed in any sample (m/s).
    pub peak_speed_ms: f64,
    /// Number of complete days.
    pub days: usize,
    /// Mean of the daily maxima (m/s); zero when no full day is present.
    pub mean_daily_max_ms: f64,
}

impl FlowSummary {
    pub fn from_mean_series(mean_speed: &[f64], samples_per_day: usize) -> Self {
        let maxima = daily_maxima(mean_speed, samples_per_day);
        let n = mean_speed.len();
        Self {
            mean_speed_ms: if n > 0 {
                mean_speed.iter().sum::<f64>() / n as f64
            } else {
                0.0
            },
            peak_speed_ms: mean_speed.iter().copied().fold(0.0, f64::max),
            days: maxima.len(),
            mean_daily_max_ms: if maxima.is_empty() {
                0.0
            } else {
                maxima.iter().sum::<f64>() / maxima.len() as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_over_depth_cells() {
        let speed = Table::from_rows(vec![vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 3.0]]).unwrap();
        assert_eq!(mean_speed_series(&speed), vec![2.0, 1.0]);
    }

    #[test]
    fn partial_day_is_dropped() {
        let series = [1.0, 3.0, 2.0, 5.0, 4.0, 0.0, 9.0];
        assert_eq!(daily_maxima(&series, 3), vec![3.0, 5.0]);
        assert!(daily_maxima(&series, 0).is_empty());
    }

    #[test]
    fn summary_of_two_days() {
        let series = [1.0, 2.0, 3.0, 4.0];
        let s = FlowSummary::from_mean_series(&series, 2);
        assert_eq!(s.days, 2);
        assert!((s.mean_speed_ms - 2.5).abs() < 1e-12);
        assert_eq!(s.peak_speed_ms, 4.0);
        assert!((s.mean_daily_max_ms - 3.0).abs() < 1e-12);
    }
}
