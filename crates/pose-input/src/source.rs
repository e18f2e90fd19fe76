//! Pose sources

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::info;

use crate::{PoseError, PoseSnapshot};

/// Anything that yields per-frame estimator output.
///
/// `Ok(None)` means the source is exhausted; `Ok(Some(None))` is a frame in
/// which the estimator found no pose.
pub trait PoseSource {
    fn next_snapshot(&mut self) -> Result<Option<Option<PoseSnapshot>>, PoseError>;
}

/// Recorded pose stream, one JSON value per line (`null` = no pose)
pub struct ReplaySource<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PoseError> {
        let path = path.as_ref();
        info!("Opening pose replay {}", path.display());
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    /// Create a source over any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> PoseSource for ReplaySource<R> {
    fn next_snapshot(&mut self) -> Result<Option<Option<PoseSnapshot>>, PoseError> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf).map_err(|e| {
                if e.kind() == ErrorKind::InvalidData {
                    PoseError::Parse(format!("line {}: {}", self.line_no + 1, e))
                } else {
                    PoseError::Io(e)
                }
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            let frame: Option<PoseSnapshot> = serde_json::from_str(line)
                .map_err(|e| PoseError::Parse(format!("line {}: {}", self.line_no, e)))?;
            return Ok(Some(frame));
        }
    }
}

impl<R: BufRead> Iterator for ReplaySource<R> {
    type Item = Result<Option<PoseSnapshot>, PoseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_snapshot().transpose()
    }
}
