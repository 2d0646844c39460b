//! Frame log reading.
//!
//! A frame log is the materialized form of the frame source the decoders
//! consume: JSON Lines, one object per captured WebSocket text frame with
//! its direction and capture timestamp.

use belote_protocol::record::Direction;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FrameRow {
    pub direction: Direction,
    /// Capture time, milliseconds since the Unix epoch.
    pub ts: i64,
    pub payload: String,
}

#[derive(Debug, Error)]
pub enum FrameLogError {
    #[error("failed to read frame log {path}")]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("frame log line {line} is not a valid frame row")]
    Parse {
        source: serde_json::Error,
        line: usize,
    },
}

/// Reads all frames of a log, preserving capture order.
pub fn read_frame_log(path: impl AsRef<Path>) -> Result<Vec<FrameRow>, FrameLogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FrameLogError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| FrameLogError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line).map_err(|source| FrameLogError::Parse {
            source,
            line: index + 1,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::{FrameLogError, read_frame_log};
    use belote_protocol::record::Direction;
    use std::io::Write;

    #[test]
    fn reads_rows_in_capture_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"direction":"sent","ts":1,"payload":"2"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"direction":"received","ts":2,"payload":"3"}}"#).unwrap();

        let rows = read_frame_log(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].direction, Direction::Sent);
        assert_eq!(rows[0].ts, 1);
        assert_eq!(rows[1].payload, "3");
    }

    #[test]
    fn reports_the_offending_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"direction":"sent","ts":1,"payload":"2"}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let err = read_frame_log(file.path()).unwrap_err();
        assert!(matches!(err, FrameLogError::Parse { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_frame_log("/nonexistent/frames.jsonl").unwrap_err();
        assert!(matches!(err, FrameLogError::Read { .. }));
    }
}
