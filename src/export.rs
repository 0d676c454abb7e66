use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{error::Result, frame::Frame};

/// Serialize `frame` as a JSON array with one object per row, indented by `indent` spaces.
pub fn write_records_to<W: Write>(writer: W, frame: &Frame, indent: usize) -> Result<()> {
    let indent = vec![b' '; indent];
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(&indent));
    frame.records().serialize(&mut serializer)?;
    Ok(())
}

pub fn to_records_json(frame: &Frame, indent: usize) -> Result<String> {
    let mut buf = Vec::new();
    write_records_to(&mut buf, frame, indent)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Write `frame` to `path`, replacing any existing file.
pub fn write_records(path: impl AsRef<Path>, frame: &Frame, indent: usize) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_records_to(&mut writer, frame, indent)?;
    writer.flush()?;
    tracing::debug!("wrote {} rows to {}", frame.nrows(), path.display());
    Ok(())
}

/// Locations of the four partition files.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub features_train: PathBuf,
    pub targets_train: PathBuf,
    pub features_test: PathBuf,
    pub targets_test: PathBuf,
}

impl OutputPaths {
    /// `{dir}/{prefix}_features_train.json` and so on.
    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> Self {
        let dir = dir.as_ref();
        let path = |table: &str, partition: &str| {
            dir.join(format!("{}_{}_{}.json", prefix, table, partition))
        };
        Self {
            features_train: path("features", "train"),
            targets_train: path("targets", "train"),
            features_test: path("features", "test"),
            targets_test: path("targets", "test"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [
            &self.features_train,
            &self.targets_train,
            &self.features_test,
            &self.targets_test,
        ]
        .into_iter()
    }
}
