//! CSV export of rotor power, flow statistics and powercurve fits.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::energy::{FittedPowercurve, PowercurveSample, RotorYield};

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

/// Writes one row per sample with a PWRA power column per rotor.
///
/// Header: `sample,time_hr,<rotor>_kw...`. All rotors must come from the
/// same velocity tables and so share a sample count.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_power_csv(
    rotors: &[RotorYield],
    sample_rate_hours: f64,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec!["sample".to_string(), "time_hr".to_string()];
    header.extend(rotors.iter().map(|r| format!("{}_kw", r.name)));
    wtr.write_record(&header)?;

    let samples = rotors.first().map_or(0, |r| r.power_kw.len());
    for t in 0..samples {
        let mut row = vec![t.to_string(), format!("{:.4}", t as f64 * sample_rate_hours)];
        row.extend(rotors.iter().map(|r| format!("{:.4}", r.power_kw[t])));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes rotor power series to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_power_csv(
    rotors: &[RotorYield],
    sample_rate_hours: f64,
    path: &Path,
) -> io::Result<()> {
    write_power_csv(rotors, sample_rate_hours, create(path)?)
}

/// Writes the depth-averaged flow speed per sample.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_flow_csv(
    mean_speed_ms: &[f64],
    sample_rate_hours: f64,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(["sample", "time_hr", "mean_speed_ms"])?;
    for (t, v) in mean_speed_ms.iter().enumerate() {
        wtr.write_record(&[
            t.to_string(),
            format!("{:.4}", t as f64 * sample_rate_hours),
            format!("{v:.4}"),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the depth-averaged flow speed to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_flow_csv(
    mean_speed_ms: &[f64],
    sample_rate_hours: f64,
    path: &Path,
) -> io::Result<()> {
    write_flow_csv(mean_speed_ms, sample_rate_hours, create(path)?)
}

/// Writes measured powercurve samples next to the fitted curve and the
/// cut-in-gated output, one block per rotor.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_curve_csv(
    curves: &[(&str, &[PowercurveSample], &FittedPowercurve)],
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(["rotor", "velocity_ms", "measured_kw", "fitted_kw", "output_kw"])?;
    for (name, samples, curve) in curves {
        for s in *samples {
            wtr.write_record(&[
                (*name).to_string(),
                format!("{:.4}", s.velocity_ms),
                format!("{:.4}", s.power_kw),
                format!("{:.4}", curve.curve(s.velocity_ms)),
                format!("{:.4}", curve.power_at(s.velocity_ms)),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Writes powercurve comparisons to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_curve_csv(
    curves: &[(&str, &[PowercurveSample], &FittedPowercurve)],
    path: &Path,
) -> io::Result<()> {
    write_curve_csv(curves, create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::RotorGeometry;

    fn make_rotor(name: &str, power_kw: Vec<f64>) -> RotorYield {
        RotorYield {
            name: name.to_string(),
            geometry: RotorGeometry::new(15.0, 20),
            curve: FittedPowercurve::from_parameters(100.0, 0.0, 2.0, 2.0, 0.5),
            power_kw,
            total_energy_kwh: 0.0,
            capacity_factor: 0.0,
        }
    }

    fn utf8(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn power_header_has_one_column_per_rotor() {
        let rotors = vec![make_rotor("r20", vec![1.0, 2.0]), make_rotor("r16", vec![0.5, 0.25])];
        let mut buf = Vec::new();
        write_power_csv(&rotors, 1.0 / 6.0, &mut buf).ok();
        let output = utf8(buf);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "sample,time_hr,r20_kw,r16_kw");
        assert_eq!(lines[2], "1,0.1667,2.0000,0.2500");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn flow_rows_match_samples() {
        let mut buf = Vec::new();
        write_flow_csv(&[1.0, 1.5, 2.0], 0.5, &mut buf).ok();
        let output = utf8(buf);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "2,1.0000,2.0000");
    }

    #[test]
    fn curve_output_zero_below_cut_in() {
        let samples = vec![PowercurveSample::new(0.0, 0.0), PowercurveSample::new(2.0, 50.0)];
        let curve = FittedPowercurve::from_parameters(100.0, 0.0, 2.0, 2.0, 0.5);
        let mut buf = Vec::new();
        write_curve_csv(&[("r", samples.as_slice(), &curve)], &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(|r| r.ok()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][4], "0.0000");
        assert_eq!(&rows[1][3], "50.0000");
        assert_eq!(&rows[1][4], "50.0000");
    }

    #[test]
    fn deterministic_output() {
        let rotors = vec![make_rotor("a", vec![3.0; 10])];
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_power_csv(&rotors, 0.5, &mut buf1).ok();
        write_power_csv(&rotors, 0.5, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }
}
