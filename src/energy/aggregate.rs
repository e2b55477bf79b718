//! Energy totals and capacity factor from a rotor power series.

use crate::error::{Result, YieldError};

/// Total energy (kWh) of a power series sampled every `sample_rate_hours`.
///
/// # Errors
///
/// Returns `EmptySeries` if `power_kw` is empty.
///
/// # Examples
///
/// ```
/// use tidal_yield::energy::aggregate::total_energy_kwh;
///
/// let e = total_energy_kwh(&[10.0, 10.0, 10.0], 1.0 / 6.0).unwrap();
/// assert!((e - 5.0).abs() < 1e-12);
/// ```
pub fn total_energy_kwh(power_kw: &[f64], sample_rate_hours: f64) -> Result<f64> {
    if power_kw.is_empty() {
        return Err(YieldError::EmptySeries("rotor power series"));
    }
    Ok(power_kw.iter().sum::<f64>() * sample_rate_hours)
}

/// Length of a measurement period in hours.
pub fn duration_hours(samples: usize, sample_rate_hours: f64) -> f64 {
    samples as f64 * sample_rate_hours
}

/// Ratio of produced energy to running at rated power for the whole period.
///
/// # Errors
///
/// Returns `EmptySeries` if the period has zero duration.
pub fn capacity_factor(
    total_energy_kwh: f64,
    rated_power_kw: f64,
    duration_hours: f64,
) -> Result<f64> {
    if duration_hours <= 0.0 {
        return Err(YieldError::EmptySeries("capacity factor period"));
    }
    Ok(total_energy_kwh / (rated_power_kw * duration_hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_of_constant_series() {
        let e = total_energy_kwh(&[10.0, 10.0, 10.0], 1.0 / 6.0).unwrap();
        assert!((e - 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_series_rejected() {
        assert!(matches!(
            total_energy_kwh(&[], 1.0 / 6.0),
            Err(YieldError::EmptySeries(_))
        ));
    }

    #[test]
    fn full_output_is_unit_capacity_factor() {
        let cf = capacity_factor(5.0, 10.0, 0.5).unwrap();
        assert!((cf - 1.0).abs() < 1e-12);
    }

    #[test]
    fn capacity_factor_from_series() {
        // half the period at rated power, half idle
        let series = [200.0, 200.0, 0.0, 0.0];
        let rate = 0.5;
        let energy = total_energy_kwh(&series, rate).unwrap();
        let cf = capacity_factor(energy, 200.0, duration_hours(series.len(), rate)).unwrap();
        assert!((cf - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_duration_rejected() {
        assert!(matches!(
            capacity_factor(5.0, 10.0, duration_hours(0, 1.0 / 6.0)),
            Err(YieldError::EmptySeries(_))
        ));
    }
}
