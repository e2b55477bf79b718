//! Logistic powercurve fitting and velocity-to-power mapping.
//!
//! Manufacturer powercurves are published as a handful of discrete
//! (velocity, power) points. They are smoothed into the four-parameter
//! logistic
//!
//! ```text
//! f(v) = a / (1 + exp(-c (v - d))) + b
//! ```
//!
//! where `b` is the power at cut-in, `a + b` the rated power, `d` the
//! midpoint velocity and `c` the steepness. `a` and `b` are read straight
//! off the samples; `c` and `d` come from a Levenberg-Marquardt fit.

use std::fmt;

use tracing::{debug, warn};

use crate::error::{Result, YieldError};
use crate::table::Table;

/// Iteration cap for the least-squares fit.
const MAX_ITERATIONS: usize = 200;
/// Relative cost reduction below which the fit is considered converged.
const COST_TOLERANCE: f64 = 1e-12;
/// Relative parameter step below which the fit is considered converged.
const STEP_TOLERANCE: f64 = 1e-10;
/// Initial LM damping.
const INITIAL_DAMPING: f64 = 1e-3;
/// Fixed initial midpoint guess (m/s).
const INITIAL_MIDPOINT_MS: f64 = 2.0;

/// One measured point of a reference powercurve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowercurveSample {
    /// Flow speed (m/s).
    pub velocity_ms: f64,
    /// Electrical output (kW).
    pub power_kw: f64,
}

impl PowercurveSample {
    pub fn new(velocity_ms: f64, power_kw: f64) -> Self {
        Self {
            velocity_ms,
            power_kw,
        }
    }
}

/// Evaluates the four-parameter logistic curve at `v`.
pub fn logistic(v: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    a / (1.0 + (-c * (v - d)).exp()) + b
}

/// Curve value plus partial derivatives with respect to `c` and `d`.
fn logistic_with_gradient(v: f64, a: f64, b: f64, c: f64, d: f64) -> (f64, f64, f64) {
    let s = 1.0 / (1.0 + (-c * (v - d)).exp());
    let ds = a * s * (1.0 - s);
    (a * s + b, ds * (v - d), -ds * c)
}

/// A logistic powercurve fitted to a rotor's reference samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPowercurve {
    /// Amplitude (kW): rated power minus cut-in power.
    pub a: f64,
    /// Baseline (kW): power at the cut-in sample.
    pub b: f64,
    /// Steepness (s/m).
    pub c: f64,
    /// Midpoint velocity (m/s).
    pub d: f64,
    /// Velocity at or below which output is zero (m/s).
    pub cut_in_velocity_ms: f64,
    /// Largest power in the reference samples (kW).
    pub rated_power_kw: f64,
    /// LM iterations used; zero when built from known parameters.
    pub iterations: usize,
}

impl FittedPowercurve {
    /// Builds a curve from known parameters. Rated power is taken as `a + b`.
    pub fn from_parameters(a: f64, b: f64, c: f64, d: f64, cut_in_velocity_ms: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            cut_in_velocity_ms,
            rated_power_kw: a + b,
            iterations: 0,
        }
    }

    /// Fits the logistic curve to reference samples.
    ///
    /// `b` and the cut-in velocity come from the second sample, `a` from the
    /// largest power minus `b`. `c` and `d` are solved by damped least
    /// squares starting from `c = 2/3 · max(velocity)` and `d = 2`.
    ///
    /// # Errors
    ///
    /// * `InvalidPowercurve` if there are fewer than three samples, a value
    ///   is not finite, or velocities are not ascending.
    /// * `FitConvergence` if the solver stalls, diverges, or hits the
    ///   iteration cap.
    pub fn fit(samples: &[PowercurveSample]) -> Result<Self> {
        validate_samples(samples)?;

        let b = samples[1].power_kw;
        let cut_in = samples[1].velocity_ms;
        let rated = samples
            .iter()
            .map(|s| s.power_kw)
            .fold(f64::NEG_INFINITY, f64::max);
        let a = rated - b;
        let v_max = samples
            .iter()
            .map(|s| s.velocity_ms)
            .fold(f64::NEG_INFINITY, f64::max);

        if samples.iter().any(|s| s.power_kw < 0.0) {
            warn!("powercurve contains negative power values");
        }

        let (c, d, iterations) =
            fit_steepness_and_midpoint(samples, a, b, v_max * 2.0 / 3.0, INITIAL_MIDPOINT_MS)?;
        if c <= 0.0 {
            warn!(c, "fitted powercurve is not increasing");
        }
        debug!(a, b, c, d, cut_in, iterations, "fitted powercurve");

        Ok(Self {
            a,
            b,
            c,
            d,
            cut_in_velocity_ms: cut_in,
            rated_power_kw: rated,
            iterations,
        })
    }

    /// Raw curve value, ignoring cut-in.
    pub fn curve(&self, velocity_ms: f64) -> f64 {
        logistic(velocity_ms, self.a, self.b, self.c, self.d)
    }

    /// Turbine output at `velocity_ms`: zero at or below cut-in, the fitted
    /// curve above it.
    pub fn power_at(&self, velocity_ms: f64) -> f64 {
        if velocity_ms > self.cut_in_velocity_ms {
            self.curve(velocity_ms)
        } else {
            0.0
        }
    }

    /// Converts a flow-speed table into a power table, cell by cell.
    pub fn map_table(&self, velocity: &Table) -> Table {
        velocity.map(|v| self.power_at(v))
    }
}

impl fmt::Display for FittedPowercurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a={:.3} b={:.3} c={:.4} d={:.4} cut-in={:.2} m/s",
            self.a, self.b, self.c, self.d, self.cut_in_velocity_ms
        )
    }
}

fn validate_samples(samples: &[PowercurveSample]) -> Result<()> {
    if samples.len() < 3 {
        return Err(YieldError::InvalidPowercurve(format!(
            "need at least 3 samples, got {}",
            samples.len()
        )));
    }
    if let Some(i) = samples
        .iter()
        .position(|s| !s.velocity_ms.is_finite() || !s.power_kw.is_finite())
    {
        return Err(YieldError::InvalidPowercurve(format!(
            "sample {i} is not finite"
        )));
    }
    if let Some(i) = samples
        .windows(2)
        .position(|w| w[1].velocity_ms < w[0].velocity_ms)
    {
        return Err(YieldError::InvalidPowercurve(format!(
            "velocities must be ascending (sample {} < sample {i})",
            i + 1
        )));
    }
    Ok(())
}

fn sum_squared_residuals(samples: &[PowercurveSample], a: f64, b: f64, c: f64, d: f64) -> f64 {
    samples
        .iter()
        .map(|s| {
            let r = s.power_kw - logistic(s.velocity_ms, a, b, c, d);
            r * r
        })
        .sum()
}

/// Levenberg-Marquardt over `(c, d)` with `a` and `b` held fixed.
///
/// Returns `(c, d, iterations)`.
fn fit_steepness_and_midpoint(
    samples: &[PowercurveSample],
    a: f64,
    b: f64,
    c0: f64,
    d0: f64,
) -> Result<(f64, f64, usize)> {
    let (mut c, mut d) = (c0, d0);
    let mut cost = sum_squared_residuals(samples, a, b, c, d);
    if !cost.is_finite() {
        return Err(YieldError::FitConvergence(
            "residuals are not finite at the initial guess".into(),
        ));
    }
    let mut damping = INITIAL_DAMPING;

    for iter in 1..=MAX_ITERATIONS {
        // Normal equations JᵀJ δ = Jᵀr
        let mut jtj = [[0.0_f64; 2]; 2];
        let mut jtr = [0.0_f64; 2];
        for s in samples {
            let (value, dc, dd) = logistic_with_gradient(s.velocity_ms, a, b, c, d);
            let r = s.power_kw - value;
            jtj[0][0] += dc * dc;
            jtj[0][1] += dc * dd;
            jtj[1][1] += dd * dd;
            jtr[0] += dc * r;
            jtr[1] += dd * r;
        }
        jtj[1][0] = jtj[0][1];

        if cost == 0.0 {
            return Ok((c, d, iter));
        }
        if jtj[0][0] <= 0.0 || jtj[1][1] <= 0.0 {
            return Err(YieldError::FitConvergence(
                "normal matrix is singular; powercurve has no usable slope".into(),
            ));
        }
        if jtr[0] == 0.0 && jtr[1] == 0.0 {
            return Ok((c, d, iter));
        }

        // Raise damping until a step lowers the cost.
        loop {
            let m00 = jtj[0][0] * (1.0 + damping);
            let m11 = jtj[1][1] * (1.0 + damping);
            let det = m00 * m11 - jtj[0][1] * jtj[1][0];
            if !det.is_finite() || det.abs() < f64::MIN_POSITIVE {
                return Err(YieldError::FitConvergence(format!(
                    "singular damped system at iteration {iter}"
                )));
            }
            let delta_c = (m11 * jtr[0] - jtj[0][1] * jtr[1]) / det;
            let delta_d = (m00 * jtr[1] - jtj[1][0] * jtr[0]) / det;

            let step = delta_c.hypot(delta_d);
            let scale = c.hypot(d) + STEP_TOLERANCE;
            let (trial_c, trial_d) = (c + delta_c, d + delta_d);
            let trial_cost = sum_squared_residuals(samples, a, b, trial_c, trial_d);

            if trial_cost.is_finite() && trial_cost < cost {
                let reduction = cost - trial_cost;
                c = trial_c;
                d = trial_d;
                cost = trial_cost;
                damping = (damping / 10.0).max(1e-12);
                if reduction <= COST_TOLERANCE * cost || step <= STEP_TOLERANCE * scale {
                    return Ok((c, d, iter));
                }
                break;
            }

            // No improving step left at machine precision: already at the minimum.
            if step <= STEP_TOLERANCE * scale {
                return Ok((c, d, iter));
            }
            damping *= 10.0;
        }
    }

    Err(YieldError::FitConvergence(format!(
        "no convergence after {MAX_ITERATIONS} iterations (c={c:.4}, d={d:.4})"
    )))
}
