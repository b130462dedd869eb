//! Accelerometer recording files
//!
//! Recordings are exported by the inertial sensor as delimited text:
//!
//! ```text
//! <skip_rows lines of device metadata>
//! Time(s)	X(m/s²)	Y(m/s²)	Z(m/s²)	...
//! 0,00	0,0123	-0,0045	9,8061	...
//! 0,01	0,0119	-0,0051	9,8057	...
//! ```
//!
//! The first non-skipped line names the columns. Column 0 is time and columns
//! 1 to 3 are linear acceleration on the X, Y and Z axes. Any further columns
//! (angular velocity, roll/pitch/yaw) are kept and can be looked up by index or
//! name.
//!
//! Cells use a configurable field delimiter and decimal separator; the device
//! default is tab-separated with decimal commas.
//!
//! # Examples
//!
//! ```
//! use sway_recording::recording::{Recording, RecordingFormat, SpatialAxis};
//!
//! let text = "device: IMU-01\nTime\tX\tY\tZ\n0,00\t0,5\t1,5\t9,8\n0,01\t0,6\t1,4\t9,7\n";
//! let format = RecordingFormat {
//!     skip_rows: 1,
//!     ..RecordingFormat::default()
//! };
//! let recording = Recording::parse(text, &format).unwrap();
//!
//! assert_eq!(recording.num_samples(), 2);
//! assert_eq!(recording.acceleration(SpatialAxis::Y), &[1.5, 1.4]);
//! ```

use serde::{Deserialize, Serialize};

/// Index of the time column.
pub const TIME_COLUMN: usize = 0;
/// Columns a recording must have: time plus three acceleration axes.
pub const MIN_COLUMNS: usize = 4;

/// Layout of a recording text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingFormat {
    /// Metadata lines before the column-name line.
    pub skip_rows: usize,
    /// Field delimiter.
    pub delimiter: char,
    /// Decimal separator used in numeric cells.
    pub decimal_separator: char,
}

impl Default for RecordingFormat {
    fn default() -> Self {
        Self {
            skip_rows: 15,
            delimiter: '\t',
            decimal_separator: ',',
        }
    }
}

/// Spatial axis of a three-axis sensor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum SpatialAxis {
    X,
    Y,
    Z,
}

impl SpatialAxis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Column holding linear acceleration along this axis.
    #[must_use]
    pub const fn acceleration_column(self) -> usize {
        match self {
            Self::X => 1,
            Self::Y => 2,
            Self::Z => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordingError {
    #[display("missing column-name line after {skip_rows} skipped lines")]
    MissingHeader { skip_rows: usize },
    #[display("found {found} columns, at least {required} required (time, X, Y, Z)")]
    TooFewColumns { found: usize, required: usize },
    #[display("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[display("line {line}, column {column}: cannot parse {text:?} as a number")]
    InvalidNumber {
        line: usize,
        column: usize,
        text: String,
    },
    #[display("recording has no samples")]
    NoSamples,
}

/// A parsed recording, stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    column_names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Recording {
    /// Parses the text of a recording file.
    ///
    /// Blank lines are ignored. Empty trailing cells, which some exporters emit
    /// as a dangling delimiter, are dropped before the row is checked against
    /// the header. Line numbers in errors are 1-based.
    pub fn parse(text: &str, format: &RecordingFormat) -> Result<Self, RecordingError> {
        let mut lines = text
            .lines()
            .enumerate()
            .skip(format.skip_rows)
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(RecordingError::MissingHeader {
            skip_rows: format.skip_rows,
        })?;
        let column_names = split_cells(header, format.delimiter)
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        if column_names.len() < MIN_COLUMNS {
            return Err(RecordingError::TooFewColumns {
                found: column_names.len(),
                required: MIN_COLUMNS,
            });
        }

        let mut columns = vec![Vec::new(); column_names.len()];
        for (line_no, line) in lines {
            let cells = split_cells(line, format.delimiter);
            if cells.len() != column_names.len() {
                return Err(RecordingError::RaggedRow {
                    line: line_no,
                    expected: column_names.len(),
                    found: cells.len(),
                });
            }
            for (column, (cell, values)) in cells.iter().zip(&mut columns).enumerate() {
                let value = parse_number(cell, format.decimal_separator).ok_or_else(|| {
                    RecordingError::InvalidNumber {
                        line: line_no,
                        column,
                        text: (*cell).to_owned(),
                    }
                })?;
                values.push(value);
            }
        }

        if columns[TIME_COLUMN].is_empty() {
            return Err(RecordingError::NoSamples);
        }
        tracing::debug!(
            columns = column_names.len(),
            samples = columns[TIME_COLUMN].len(),
            "recording parsed"
        );

        Ok(Self {
            column_names,
            columns,
        })
    }

    #[must_use]
    pub fn num_samples(&self) -> usize {
        self.columns[TIME_COLUMN].len()
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Looks a column up by its header name (exact match after trimming).
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        let index = self.column_names.iter().position(|n| n == name)?;
        self.column(index)
    }

    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.columns[TIME_COLUMN]
    }

    #[must_use]
    pub fn acceleration(&self, axis: SpatialAxis) -> &[f64] {
        &self.columns[axis.acceleration_column()]
    }
}

fn split_cells(line: &str, delimiter: char) -> Vec<&str> {
    let mut cells = line.split(delimiter).map(str::trim).collect::<Vec<_>>();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

fn parse_number(cell: &str, decimal_separator: char) -> Option<f64> {
    if decimal_separator == '.' {
        cell.parse().ok()
    } else {
        cell.replace(decimal_separator, ".").parse().ok()
    }
}
