use std::{fmt::Write as _, fs, path::PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use rand::SeedableRng as _;
use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg64Mcg;
use sway_recording::{kinematics::DEFAULT_SAMPLING_INTERVAL, recording::RecordingFormat};

/// Mean vertical acceleration of a sensor at rest.
const GRAVITY: f64 = 9.81;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SynthArg {
    /// Output recording path
    #[arg(long)]
    output: PathBuf,
    /// Number of samples
    #[arg(long, default_value_t = 3000)]
    num_samples: usize,
    /// Standard deviation of the acceleration noise (m/s²)
    #[arg(long, default_value_t = 0.05)]
    noise: f64,
    /// Seconds between consecutive samples
    #[arg(long, default_value_t = DEFAULT_SAMPLING_INTERVAL)]
    sampling_interval: f64,
    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

pub(crate) fn run(arg: &SynthArg) -> anyhow::Result<()> {
    let text = synth_recording(arg)?;
    if let Some(parent) = arg.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&arg.output, text)
        .with_context(|| format!("Failed to write recording: {}", arg.output.display()))?;
    tracing::info!(
        path = %arg.output.display(),
        samples = arg.num_samples,
        seed = arg.seed,
        "synthetic recording written"
    );
    Ok(())
}

fn synth_recording(arg: &SynthArg) -> anyhow::Result<String> {
    if !(arg.sampling_interval.is_finite() && arg.sampling_interval > 0.0) {
        anyhow::bail!(
            "Sampling interval must be positive, got {}",
            arg.sampling_interval
        );
    }
    if !(arg.noise.is_finite() && arg.noise >= 0.0) {
        anyhow::bail!(
            "Noise standard deviation must be non-negative and finite, got {}",
            arg.noise
        );
    }
    let normal = Normal::new(0.0, arg.noise).context("Invalid noise standard deviation")?;
    let mut rng = Pcg64Mcg::seed_from_u64(arg.seed);
    let format = RecordingFormat::default();
    let delimiter = format.delimiter;

    let metadata = [
        "Synthetic recording".to_owned(),
        format!("Generated: {}", Utc::now().to_rfc3339()),
        format!("Seed: {}", arg.seed),
        format!("Samples: {}", arg.num_samples),
        format!("Sampling interval (s): {}", arg.sampling_interval),
        format!("Noise std dev (m/s2): {}", arg.noise),
    ];
    let mut text = String::new();
    for i in 0..format.skip_rows {
        text.push_str(metadata.get(i).map_or("", String::as_str));
        text.push('\n');
    }
    writeln!(
        &mut text,
        "Time(s){delimiter}AccX(m/s2){delimiter}AccY(m/s2){delimiter}AccZ(m/s2)"
    )
    .context("Failed to write column names")?;

    let separator = format.decimal_separator.to_string();
    let decimal = |value: f64| format!("{value:.6}").replace('.', &separator);
    for i in 0..arg.num_samples {
        #[expect(clippy::cast_precision_loss)]
        let time = i as f64 * arg.sampling_interval;
        let [x, y, z] = [0.0, 0.0, GRAVITY].map(|mean| mean + normal.sample(&mut rng));
        writeln!(
            &mut text,
            "{}{delimiter}{}{delimiter}{}{delimiter}{}",
            decimal(time),
            decimal(x),
            decimal(y),
            decimal(z)
        )
        .with_context(|| format!("Failed to write sample {i}"))?;
    }
    Ok(text)
}
