use std::{fmt::Write as _, path::PathBuf};

use anyhow::Context as _;
use sway_recording::{
    kinematics::{SamplingInterval, Trajectory},
    recording::{Recording, SpatialAxis},
};

use super::args::InputArgs;
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrajectoryArg {
    /// Recording file
    path: PathBuf,
    #[clap(flatten)]
    input: InputArgs,
    /// Output CSV file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrajectoryArg) -> anyhow::Result<()> {
    let recording = arg.input.read(&arg.path)?;
    let interval = arg.input.sampling_interval()?;
    let csv = trajectory_csv(&recording, interval)?;

    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_text(&csv)?;
    if let Some(path) = &arg.output {
        eprintln!("Trajectory saved to: {}", path.display());
    }
    Ok(())
}

fn trajectory_csv(recording: &Recording, interval: SamplingInterval) -> anyhow::Result<String> {
    let traces = SpatialAxis::ALL.map(|axis| {
        let acceleration = recording.acceleration(axis);
        (
            acceleration,
            Trajectory::from_acceleration(acceleration, interval),
        )
    });

    let mut csv = String::from("time");
    for axis in SpatialAxis::ALL {
        let axis = axis.to_string().to_lowercase();
        write!(&mut csv, ",acc_{axis},vel_{axis},pos_{axis}")
            .context("Failed to write CSV header")?;
    }
    csv.push('\n');

    for (i, time) in recording.time().iter().enumerate() {
        write!(&mut csv, "{time}").with_context(|| format!("Failed to write CSV row {i}"))?;
        for (acceleration, trajectory) in &traces {
            write!(
                &mut csv,
                ",{},{},{}",
                acceleration[i], trajectory.velocity[i], trajectory.position[i]
            )
            .with_context(|| format!("Failed to write CSV row {i}"))?;
        }
        csv.push('\n');
    }
    Ok(csv)
}

#[cfg(test)]
mod tests {
    use sway_recording::recording::RecordingFormat;

    use super::*;

    #[test]
    fn test_trajectory_csv() {
        let text = "t\tx\ty\tz\n0\t0\t1\t2\n0,1\t10\t1\t4\n";
        let format = RecordingFormat {
            skip_rows: 0,
            ..RecordingFormat::default()
        };
        let recording = Recording::parse(text, &format).unwrap();
        let csv = trajectory_csv(&recording, SamplingInterval::new(0.1).unwrap()).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "time,acc_x,vel_x,pos_x,acc_y,vel_y,pos_y,acc_z,vel_z,pos_z"
        );
        assert_eq!(lines[1], "0,0,0,0,1,0,0,2,0,0");
        assert_eq!(lines[2], "0.1,10,1,0.1,1,0,0,4,0.2,0.020000000000000004");
        assert_eq!(lines.len(), 3);
    }
}
