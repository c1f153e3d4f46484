use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::ReplayError;

/// One line of the rollover log, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub number: usize,
    pub text: String,
}

/// Streams a log line by line without loading it into memory.
///
/// Single pass: once `next_line` returns `None` the reader is exhausted.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// ending the scan.
pub struct LogReader<R = BufReader<File>> {
    reader: R,
    buf: Vec<u8>,
    read: usize,
}

impl LogReader<BufReader<File>> {
    pub async fn open(path: &Path) -> Result<Self, ReplayError> {
        let file = File::open(path).await?;
        tracing::debug!(path = %path.display(), "Opened rollover log");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> LogReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            read: 0,
        }
    }

    pub async fn next_line(&mut self) -> Result<Option<LogLine>, ReplayError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }
        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest.strip_suffix(b"\r").unwrap_or(rest);
        }
        self.read += 1;
        Ok(Some(LogLine {
            number: self.read,
            text: String::from_utf8_lossy(line).into_owned(),
        }))
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> usize {
        self.read
    }
}
