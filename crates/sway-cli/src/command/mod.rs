use clap::{Parser, Subcommand};

use crate::logging::{self, LogFormat};

use self::{mse::MseArg, sweep::SweepArg, synth::SynthArg, trajectory::TrajectoryArg};

mod args;
mod mse;
mod sweep;
mod synth;
mod trajectory;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Diagnostic log format on stderr (`text` or `json`)
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Sweep tolerance fractions and summarize multiscale entropy across X and Y
    Sweep(#[clap(flatten)] SweepArg),
    /// Compute the multiscale entropy profile of X and Y at one tolerance
    Mse(#[clap(flatten)] MseArg),
    /// Export acceleration, velocity and position traces as CSV
    Trajectory(#[clap(flatten)] TrajectoryArg),
    /// Write a synthetic white-noise recording
    Synth(#[clap(flatten)] SynthArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init(args.log_format);
    match args.mode {
        Mode::Sweep(arg) => sweep::run(&arg)?,
        Mode::Mse(arg) => mse::run(&arg)?,
        Mode::Trajectory(arg) => trajectory::run(&arg)?,
        Mode::Synth(arg) => synth::run(&arg)?,
    }
    Ok(())
}
