//! Shared survey fixtures for integration tests.

#![allow(dead_code)]

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use tidal_yield::energy::PowercurveSample;
use tidal_yield::energy::powercurve::logistic;
use tidal_yield::table::Table;

/// Depth cells in the synthetic survey (1 m each).
pub const CELLS: usize = 30;
/// Two days of 10-minute samples.
pub const SAMPLES: usize = 288;
/// Semi-diurnal tidal period in 10-minute samples (12.42 h).
const TIDAL_PERIOD: f64 = 74.52;

/// Surface peak current (m/s).
const PEAK_SPEED_MS: f64 = 3.2;

/// East and north component tables for a semi-diurnal tide with a 1/7
/// power-law shear profile.
pub fn survey_tables() -> (Table, Table) {
    let speed = |t: usize, c: usize| {
        let shear = ((c as f64 + 0.5) / CELLS as f64).powf(1.0 / 7.0);
        PEAK_SPEED_MS * shear * (2.0 * PI * t as f64 / TIDAL_PERIOD).sin()
    };
    // flow along a 37° bearing
    let (s, c) = (37.0_f64.to_radians().sin(), 37.0_f64.to_radians().cos());
    let east = Table::from_fn(SAMPLES, CELLS, |t, cell| speed(t, cell) * s);
    let north = Table::from_fn(SAMPLES, CELLS, |t, cell| speed(t, cell) * c);
    (east, north)
}

/// Reference powercurve drawn from a known logistic, with a zero-power
/// first point below cut-in.
pub fn powercurve(
    rated_kw: f64,
    cut_in_ms: f64,
    steepness: f64,
    midpoint_ms: f64,
) -> Vec<PowercurveSample> {
    let b = 0.01 * rated_kw;
    let a = rated_kw - b;
    let mut samples = vec![PowercurveSample::new(0.0, 0.0)];
    let mut v = cut_in_ms;
    while v <= 4.0 + 1e-9 {
        samples.push(PowercurveSample::new(v, logistic(v, a, b, steepness, midpoint_ms)));
        v += 0.25;
    }
    samples
}

pub fn powercurve_20m() -> Vec<PowercurveSample> {
    powercurve(1000.0, 0.5, 4.0, 2.3)
}

pub fn powercurve_16m() -> Vec<PowercurveSample> {
    powercurve(640.0, 0.5, 4.0, 2.3)
}

pub fn write_table(path: &Path, table: &Table) {
    let body: String = table
        .iter_rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
            cells.join(",") + "\n"
        })
        .collect();
    fs::write(path, body).expect("write table fixture");
}

pub fn write_powercurve(path: &Path, samples: &[PowercurveSample]) {
    let mut body = String::from("Velocity (m/s),Power (kW)\n");
    for s in samples {
        body.push_str(&format!("{},{}\n", s.velocity_ms, s.power_kw));
    }
    fs::write(path, body).expect("write powercurve fixture");
}

/// `(reference, wave_height)` samples written as a 30-minute opportunity CSV.
pub fn write_opportunity(path: &Path, samples: &[(f64, f64)]) {
    let body: String = samples
        .iter()
        .enumerate()
        .map(|(i, (reference, wave))| format!("{},{reference},150.0,{wave}\n", i as f64 * 0.5))
        .collect();
    fs::write(path, body).expect("write opportunity fixture");
}

/// 30 calm, 1 rough, 5 calm, 1 rough, 12 moderate, 14 calm.
///
/// Sensor checks find three runs (moderate samples exceed their limits);
/// repairs find two (30 calm, then 12 moderate + 14 calm).
pub fn opportunity_samples() -> Vec<(f64, f64)> {
    let calm = (0.2, 0.3);
    let moderate = (1.2, 1.0);
    let rough = (0.0, 2.5);
    let mut s = vec![calm; 30];
    s.push(rough);
    s.extend(vec![calm; 5]);
    s.push(rough);
    s.extend(vec![moderate; 12]);
    s.extend(vec![calm; 14]);
    s
}

pub const EXPECTED_SENSOR_CHECKS: usize = 3;
pub const EXPECTED_REPAIRS: usize = 2;

/// Writes the full survey into `dir` using the baseline file names.
pub fn write_survey(dir: &Path) {
    let (east, north) = survey_tables();
    write_table(&dir.join("EastDataCleaned.csv"), &east);
    write_table(&dir.join("NorthDataCleaned.csv"), &north);
    write_powercurve(&dir.join("20M_Powercurve.csv"), &powercurve_20m());
    write_powercurve(&dir.join("16M_Powercurve.csv"), &powercurve_16m());
    write_opportunity(&dir.join("Threasholding.csv"), &opportunity_samples());
}
