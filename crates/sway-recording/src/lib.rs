//! Recording ingestion and kinematic traces for sway analysis
//!
//! This crate turns accelerometer recording files into the numeric signals the
//! entropy pipeline consumes.
//!
//! # Overview
//!
//! 1. **Parse** ([`recording::Recording`]): read the delimited text export into
//!    named columns
//! 2. **Derive traces** ([`kinematics::Trajectory`]): velocity and position per
//!    axis from the acceleration columns
//!
//! # Examples
//!
//! ```
//! use sway_recording::{
//!     kinematics::{SamplingInterval, Trajectory},
//!     recording::{Recording, RecordingFormat, SpatialAxis},
//! };
//!
//! let text = "Time\tX\tY\tZ\n0,00\t0,1\t0,2\t9,8\n0,01\t0,3\t0,1\t9,8\n0,02\t0,2\t0,0\t9,8\n";
//! let format = RecordingFormat {
//!     skip_rows: 0,
//!     ..RecordingFormat::default()
//! };
//! let recording = Recording::parse(text, &format)?;
//! let x = Trajectory::from_acceleration(
//!     recording.acceleration(SpatialAxis::X),
//!     SamplingInterval::default(),
//! );
//! assert_eq!(x.position.len(), 3);
//! # Ok::<(), sway_recording::recording::RecordingError>(())
//! ```

pub mod kinematics;
pub mod recording;
