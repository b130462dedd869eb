//! Tolerance sweep command
//!
//! Runs the cross-axis multiscale entropy sweep on every recording and prints
//! one summary table per file. The full reports can be saved as JSON and the
//! four summary curves as one CSV per recording.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sway_entropy::{
    cancel::CancelToken,
    sweep::{SweepConfig, SweepReport, run_sweep},
};
use sway_recording::recording::SpatialAxis;

use super::args::{EntropyArgs, InputArgs, SignalKind, ToleranceArgs};
use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SweepArg {
    /// Recording files or directories of recordings
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    #[clap(flatten)]
    input: InputArgs,
    #[clap(flatten)]
    entropy: EntropyArgs,
    #[clap(flatten)]
    tolerance: ToleranceArgs,
    /// Save the reports of all recordings as JSON
    #[arg(long)]
    output: Option<PathBuf>,
    /// Directory for per-recording summary CSV files
    #[arg(long)]
    csv_dir: Option<PathBuf>,
}

/// Sweep report of one recording with its provenance.
#[derive(Debug, Clone, Serialize)]
struct FileReport {
    source: PathBuf,
    generated_at: DateTime<Utc>,
    num_samples: usize,
    sampling_interval: f64,
    signal: SignalKind,
    report: SweepReport,
}

pub(crate) fn run(arg: &SweepArg) -> anyhow::Result<()> {
    let mut config = arg.entropy.base_config()?;
    arg.tolerance.apply(&mut config);
    config.validate().context("Invalid sweep parameters")?;

    let interval = arg.input.sampling_interval()?;
    let paths = util::expand_recording_paths(&arg.paths)?;

    let mut reports = Vec::with_capacity(paths.len());
    for path in &paths {
        let recording = arg.input.read(path)?;
        let signal = arg.entropy.signal;
        let x = signal.extract(&recording, SpatialAxis::X, interval);
        let y = signal.extract(&recording, SpatialAxis::Y, interval);

        let report = run_sweep(&x, &y, &config, &CancelToken::default())
            .with_context(|| format!("Sweep failed for {}", path.display()))?;
        print_report(path, recording.num_samples(), &report);

        if let Some(dir) = &arg.csv_dir {
            save_summary_csv(dir, path, &report)?;
        }
        reports.push(FileReport {
            source: path.clone(),
            generated_at: Utc::now(),
            num_samples: recording.num_samples(),
            sampling_interval: interval.seconds(),
            signal,
            report,
        });
    }

    if let Some(output) = &arg.output {
        Output::save_json(&reports, Some(output.clone()))?;
        println!("Reports saved to: {}", output.display());
    }
    Ok(())
}

fn print_report(path: &Path, num_samples: usize, report: &SweepReport) {
    let SweepConfig {
        max_scale,
        embedding_dim,
        ..
    } = report.config;
    println!("{} ({num_samples} samples)", path.display());
    println!("  scales 1..={max_scale}, m = {embedding_dim}");
    println!(
        "  {:>8} {:>10} {:>10} {:>10} {:>10} {:>7}",
        "r", "Median", "StdErr", "Variance", "NormErr", "Scales"
    );
    println!("  {}", "-".repeat(60));
    for point in &report.points {
        match &point.summary {
            Ok(s) => println!(
                "  {:>8.3} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>7}",
                point.tolerance_fraction,
                s.median,
                s.standard_error,
                s.variance,
                s.normalized_error,
                s.scales_used
            ),
            Err(err) => println!("  {:>8.3}  undefined: {err}", point.tolerance_fraction),
        }
    }
    println!();
}

fn summary_csv(report: &SweepReport) -> anyhow::Result<String> {
    let mut csv =
        String::from("r,median,standard_error,variance,normalized_error,scales_used,error\n");
    for point in &report.points {
        let r = point.tolerance_fraction;
        let row = match &point.summary {
            Ok(s) => writeln!(
                &mut csv,
                "{r},{},{},{},{},{},",
                s.median, s.standard_error, s.variance, s.normalized_error, s.scales_used
            ),
            Err(err) => writeln!(&mut csv, "{r},,,,,,\"{err}\""),
        };
        row.with_context(|| format!("Failed to write CSV row for r = {r}"))?;
    }
    Ok(csv)
}

fn save_summary_csv(dir: &Path, source: &Path, report: &SweepReport) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let csv_path = dir.join(format!("{}_sweep.csv", util::output_stem(source)));
    fs::write(&csv_path, summary_csv(report)?)
        .with_context(|| format!("Failed to write CSV file: {}", csv_path.display()))?;
    println!("  Summary curves saved to: {}", csv_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use sway_entropy::{
        cross_axis::{CrossAxisError, CrossAxisSummary},
        multiscale::EntropyProfile,
        sweep::SweepPoint,
    };

    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn test_summary_csv_rows() {
        let profile = EntropyProfile::from(vec![1.0, 1.0]);
        let report = SweepReport {
            config: SweepConfig::default(),
            points: vec![
                SweepPoint {
                    tolerance_fraction: 0.5,
                    x: profile.clone(),
                    y: profile.clone(),
                    summary: Ok(CrossAxisSummary {
                        median: 2.0,
                        standard_error: 0.0,
                        variance: 0.0,
                        normalized_error: 0.0,
                        scales_used: 2,
                    }),
                },
                SweepPoint {
                    tolerance_fraction: 1.0,
                    x: profile.clone(),
                    y: profile,
                    summary: Err(CrossAxisError::ZeroMedian),
                },
            ],
        };

        let csv = summary_csv(&report).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0.5,2,0,0,0,2,");
        assert_eq!(lines[2], "1,,,,,,\"median of summed entropy is zero\"");
    }

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[command(flatten)]
        arg: SweepArg,
    }

    #[test]
    fn test_sweep_writes_one_csv_per_recording() {
        let dir = tempfile::tempdir().unwrap();
        let mut text = String::from("t\tx\ty\tz\n");
        for i in 0..300 {
            let t = f64::from(i);
            writeln!(
                &mut text,
                "{}\t{}\t{}\t9,8",
                t * 0.01,
                (t * 0.37).sin(),
                (t * 0.23).cos()
            )
            .unwrap();
        }
        let text = text.replace('.', ",");
        std::fs::write(dir.path().join("a.txt"), &text).unwrap();
        std::fs::write(dir.path().join("b.txt"), &text).unwrap();
        let csv_dir = dir.path().join("csv");

        let input_dir = dir.path().to_str().unwrap();
        let csv_dir_arg = csv_dir.to_str().unwrap();
        let cli = Cli::try_parse_from([
            "sway",
            input_dir,
            "--skip-rows",
            "0",
            "--signal",
            "acceleration",
            "--max-scale",
            "3",
            "--tolerance",
            "0.2,0.5",
            "--csv-dir",
            csv_dir_arg,
        ])
        .unwrap();
        run(&cli.arg).unwrap();

        for stem in ["a", "b"] {
            let csv = std::fs::read_to_string(csv_dir.join(format!("{stem}_sweep.csv"))).unwrap();
            let rows: Vec<&str> = csv.lines().skip(1).collect();
            assert_eq!(rows.len(), 2, "{csv}");
            assert!(rows[0].starts_with("0.2,"), "{csv}");
            assert!(rows[1].starts_with("0.5,"), "{csv}");
        }
    }
}
