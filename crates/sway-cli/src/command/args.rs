use std::path::PathBuf;

use anyhow::Context as _;
use sway_entropy::{
    cross_axis::MissingScalePolicy,
    sweep::{DEFAULT_TOLERANCE_COUNT, DEFAULT_TOLERANCE_RANGE, SweepConfig},
};
use sway_recording::{
    kinematics::{DEFAULT_SAMPLING_INTERVAL, SamplingInterval, Trajectory},
    recording::{Recording, RecordingFormat, SpatialAxis},
};
use sway_stats::spacing::linspace;

use crate::util;

/// How recording files are read.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InputArgs {
    /// Metadata lines before the column-name line
    #[arg(long, default_value_t = 15)]
    skip_rows: usize,
    /// Field delimiter (a single character, or `tab`)
    #[arg(long, default_value = "tab", value_parser = parse_delimiter)]
    delimiter: char,
    /// Decimal separator used in numeric cells
    #[arg(long, default_value_t = ',')]
    decimal_separator: char,
    /// Seconds between consecutive samples
    #[arg(long, default_value_t = DEFAULT_SAMPLING_INTERVAL)]
    sampling_interval: f64,
}

impl Default for InputArgs {
    fn default() -> Self {
        let format = RecordingFormat::default();
        Self {
            skip_rows: format.skip_rows,
            delimiter: format.delimiter,
            decimal_separator: format.decimal_separator,
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
        }
    }
}

impl InputArgs {
    pub(crate) fn format(&self) -> RecordingFormat {
        RecordingFormat {
            skip_rows: self.skip_rows,
            delimiter: self.delimiter,
            decimal_separator: self.decimal_separator,
        }
    }

    pub(crate) fn sampling_interval(&self) -> anyhow::Result<SamplingInterval> {
        SamplingInterval::new(self.sampling_interval).context("Invalid --sampling-interval")
    }

    pub(crate) fn read(&self, path: &std::path::Path) -> anyhow::Result<Recording> {
        util::read_recording_file(path, &self.format())
    }
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    if s.eq_ignore_ascii_case("tab") {
        return Ok('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character or `tab`, got {s:?}")),
    }
}

/// Which kinematic trace of an axis is analysed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SignalKind {
    Acceleration,
    Velocity,
    #[default]
    Position,
}

impl SignalKind {
    pub(crate) fn extract(
        self,
        recording: &Recording,
        axis: SpatialAxis,
        interval: SamplingInterval,
    ) -> Vec<f64> {
        let acceleration = recording.acceleration(axis);
        match self {
            Self::Acceleration => acceleration.to_vec(),
            Self::Velocity => Trajectory::from_acceleration(acceleration, interval).velocity,
            Self::Position => Trajectory::from_acceleration(acceleration, interval).position,
        }
    }
}

/// Entropy parameters shared by `sweep` and `mse`.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EntropyArgs {
    /// JSON file with a sweep configuration; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Largest coarse-graining scale
    #[arg(long)]
    max_scale: Option<usize>,
    /// Embedding dimension
    #[arg(long)]
    embedding_dim: Option<usize>,
    /// How scales with undefined entropy enter the cross-axis summary
    #[arg(long, value_parser = parse_policy)]
    missing_scales: Option<MissingScalePolicy>,
    /// Trace analysed on each axis
    #[arg(long, value_enum, default_value_t)]
    pub(crate) signal: SignalKind,
}

fn parse_policy(s: &str) -> Result<MissingScalePolicy, String> {
    s.parse()
        .map_err(|_| format!("expected `exclude` or `reject`, got {s:?}"))
}

impl EntropyArgs {
    /// Loads the configuration file, if any, and applies flag overrides.
    pub(crate) fn base_config(&self) -> anyhow::Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<SweepConfig, _>("sweep config", path)?,
            None => SweepConfig::default(),
        };
        if let Some(max_scale) = self.max_scale {
            config.max_scale = max_scale;
        }
        if let Some(embedding_dim) = self.embedding_dim {
            config.embedding_dim = embedding_dim;
        }
        if let Some(policy) = self.missing_scales {
            config.missing_scale_policy = policy;
        }
        Ok(config)
    }
}

/// Tolerance fractions of a sweep.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ToleranceArgs {
    /// Explicit tolerance fractions, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["r_min", "r_max", "r_count"])]
    tolerance: Vec<f64>,
    /// Smallest tolerance fraction of an evenly spaced range
    #[arg(long)]
    r_min: Option<f64>,
    /// Largest tolerance fraction of an evenly spaced range
    #[arg(long)]
    r_max: Option<f64>,
    /// Number of tolerance fractions in the range
    #[arg(long)]
    r_count: Option<usize>,
}

impl ToleranceArgs {
    /// Replaces the tolerance fractions of `config` if any flag was given.
    pub(crate) fn apply(&self, config: &mut SweepConfig) {
        if !self.tolerance.is_empty() {
            config.tolerance_fractions.clone_from(&self.tolerance);
            return;
        }
        if self.r_min.is_none() && self.r_max.is_none() && self.r_count.is_none() {
            return;
        }
        let (default_min, default_max) = DEFAULT_TOLERANCE_RANGE;
        config.tolerance_fractions = linspace(
            self.r_min.unwrap_or(default_min),
            self.r_max.unwrap_or(default_max),
            self.r_count.unwrap_or(DEFAULT_TOLERANCE_COUNT),
        );
    }
}
