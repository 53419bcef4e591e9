use super::{LandmarkSource, SourceEvent, WireRecord};
use crate::models::pose::{PoseError, PoseResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Stdin, StdinLock};
use std::path::Path;
use tracing::info;

/// Reads newline-delimited JSON records from a pose estimator.
///
/// ```text
/// {"type":"pose","keypoints":[{"x":0.5,"y":0.2,"z":-0.3,"visibility":0.9}, ...]}
/// {"type":"pose","keypoints":null}
/// {"type":"ui","event":"toggle_mode"}
/// ```
pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    label: String,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R, label: impl Into<String>) -> Self {
        Self {
            reader,
            label: label.into(),
            line_number: 0,
            buffer: String::new(),
        }
    }
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: &Path) -> PoseResult<Self> {
        let file = File::open(path).map_err(|e| {
            PoseError::SourceUnavailable(format!("Cannot open {}: {}", path.display(), e))
        })?;
        info!("Reading landmarks from {}", path.display());
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl JsonLinesSource<StdinLock<'static>> {
    pub fn stdin() -> Self {
        let stdin: Stdin = std::io::stdin();
        info!("Reading landmarks from stdin");
        Self::new(stdin.lock(), "stdin")
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn poll(&mut self) -> PoseResult<Option<SourceEvent>> {
        loop {
            self.buffer.clear();
            let read = self.reader.read_line(&mut self.buffer)?;
            if read == 0 {
                info!("Landmark stream {} ended after {} lines", self.label, self.line_number);
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            let record: WireRecord = serde_json::from_str(line).map_err(|e| PoseError::Parse {
                line: self.line_number,
                message: e.to_string(),
            })?;

            return Ok(Some(record.into_event()));
        }
    }

    fn describe(&self) -> String {
        format!("json-lines ({})", self.label)
    }
}
