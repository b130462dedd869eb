use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sway_entropy::{
    cancel::CancelToken,
    cross_axis::{CrossAxisError, CrossAxisSummary, cross_axis_summary},
    multiscale::{EntropyProfile, multiscale_entropy},
    sweep::{Axis, SweepConfig},
};
use sway_recording::recording::SpatialAxis;

use super::args::{EntropyArgs, InputArgs, SignalKind};
use crate::util::Output;

const DEFAULT_TOLERANCE_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MseArg {
    /// Recording file
    path: PathBuf,
    #[clap(flatten)]
    input: InputArgs,
    #[clap(flatten)]
    entropy: EntropyArgs,
    /// Tolerance as a fraction of the per-scale standard deviation
    #[arg(long, short = 'r', default_value_t = DEFAULT_TOLERANCE_FRACTION)]
    tolerance: f64,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct MseReport {
    source: PathBuf,
    generated_at: DateTime<Utc>,
    signal: SignalKind,
    max_scale: usize,
    embedding_dim: usize,
    tolerance_fraction: f64,
    x: EntropyProfile,
    y: EntropyProfile,
    summary: Result<CrossAxisSummary, CrossAxisError>,
}

pub(crate) fn run(arg: &MseArg) -> anyhow::Result<()> {
    let config = SweepConfig {
        tolerance_fractions: vec![arg.tolerance],
        ..arg.entropy.base_config()?
    };
    config.validate().context("Invalid entropy parameters")?;

    let recording = arg.input.read(&arg.path)?;
    let interval = arg.input.sampling_interval()?;
    let signal = arg.entropy.signal;
    let x = signal.extract(&recording, SpatialAxis::X, interval);
    let y = signal.extract(&recording, SpatialAxis::Y, interval);

    let profile = |axis: Axis, samples: &[f64]| {
        multiscale_entropy(
            samples,
            config.max_scale,
            config.embedding_dim,
            arg.tolerance,
            &CancelToken::default(),
        )
        .with_context(|| format!("Multiscale entropy failed for axis {axis}"))
    };
    let (x, y) = (profile(Axis::X, &x)?, profile(Axis::Y, &y)?);
    let summary = cross_axis_summary(&x, &y, config.missing_scale_policy);
    if x.num_undefined() + y.num_undefined() > 0 {
        tracing::warn!(
            x_undefined = x.num_undefined(),
            y_undefined = y.num_undefined(),
            "some scales have undefined entropy"
        );
    }

    let report = MseReport {
        source: arg.path.clone(),
        generated_at: Utc::now(),
        signal,
        max_scale: config.max_scale,
        embedding_dim: config.embedding_dim,
        tolerance_fraction: arg.tolerance,
        x,
        y,
        summary,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}
