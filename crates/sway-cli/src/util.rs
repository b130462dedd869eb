use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use sway_recording::recording::{Recording, RecordingFormat};

/// File extension of device recordings.
const RECORDING_EXTENSION: &str = "txt";

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes `text` verbatim and flushes.
    pub fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read and parse a device recording
///
/// # Errors
///
/// Returns error if the file cannot be read or is not a valid recording
pub fn read_recording_file<P>(path: P, format: &RecordingFormat) -> anyhow::Result<Recording>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recording file: {}", path.display()))?;
    let recording = Recording::parse(&text, format)
        .with_context(|| format!("Failed to parse recording file: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        samples = recording.num_samples(),
        "recording loaded"
    );
    Ok(recording)
}

/// Expand recording paths
///
/// Files are kept as given. Directories are replaced by the recordings they
/// directly contain, sorted by file name.
///
/// # Errors
///
/// Returns error if a path does not exist, a directory cannot be listed, or
/// the expansion yields no recordings
pub fn expand_recording_paths(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut recordings = vec![];
    for path in paths {
        if path.is_dir() {
            let mut found = fs::read_dir(path)
                .with_context(|| format!("Failed to list directory: {}", path.display()))?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Failed to list directory: {}", path.display()))?;
            found.retain(|p| {
                p.is_file() && p.extension().is_some_and(|ext| ext == RECORDING_EXTENSION)
            });
            found.sort();
            tracing::debug!(dir = %path.display(), count = found.len(), "expanded directory");
            recordings.extend(found);
        } else if path.is_file() {
            recordings.push(path.clone());
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }
    if recordings.is_empty() {
        bail!("No recordings found");
    }
    Ok(recordings)
}

/// File stem used to name per-recording outputs
pub fn output_stem(path: &Path) -> String {
    path.file_stem().map_or_else(
        || "recording".to_owned(),
        |stem| stem.to_string_lossy().into_owned(),
    )
}
