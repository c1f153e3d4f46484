//! Filtering failure lines and pulling the PO line JSON out of them.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::record::OrderLine;
use crate::error::ExtractError;

/// Substring identifying a failed PO line update in the rollover log.
pub const FAILURE_MARKER: &str = "Exception calling PUT /orders-storage/po-lines";

/// Upstream log serialization sometimes doubles every quote in the payload.
/// Only blobs containing this token get repaired.
const DOUBLED_ID_KEY: &str = r#"""id"""#;

static DOUBLED_PAIR: OnceLock<Regex> = OnceLock::new();

/// Locates the candidate JSON substring inside a log line.
pub trait BlobExtractor: Send + Sync {
    fn extract<'a>(&self, line: &'a str) -> Option<&'a str>;
}

/// First `{` through last `}` on the line.
///
/// No brace balancing: several objects on one line, or text between two
/// objects, produce a blob that fails to parse and is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct OuterBraces;

impl BlobExtractor for OuterBraces {
    fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        let start = line.find('{')?;
        let end = line.rfind('}')?;
        if end < start {
            return None;
        }
        Some(&line[start..=end])
    }
}

/// Collapse `""…""` pairs to `"…"` when the blob shows the doubled `""id""` key.
/// Well-formed blobs are returned untouched.
pub fn repair_doubled_quotes(blob: &str) -> Cow<'_, str> {
    if !blob.contains(DOUBLED_ID_KEY) {
        return Cow::Borrowed(blob);
    }
    DOUBLED_PAIR
        .get_or_init(|| Regex::new(r#"""(.*?)"""#).expect("doubled-quote pattern is valid"))
        .replace_all(blob, "\"$1\"")
}

/// Parse an extracted blob into an order line.
pub fn parse_blob(blob: &str) -> Result<OrderLine, ExtractError> {
    let repaired = repair_doubled_quotes(blob);
    let fields: Map<String, Value> =
        serde_json::from_str(&repaired).map_err(|source| ExtractError::InvalidJson {
            blob: blob.to_string(),
            source,
        })?;
    OrderLine::from_object(fields).ok_or_else(|| ExtractError::MissingId {
        blob: blob.to_string(),
    })
}

/// What a single log line turned into.
#[derive(Debug)]
pub enum LineOutcome {
    /// Not a failure line.
    Skipped,
    Record(OrderLine),
    /// A failure line whose payload could not be recovered.
    Dropped(ExtractError),
}

/// Filters failure lines and extracts their payload.
#[derive(Debug, Clone, Default)]
pub struct LineParser<E = OuterBraces> {
    extractor: E,
}

impl LineParser<OuterBraces> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: BlobExtractor> LineParser<E> {
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    pub fn is_failure_line(line: &str) -> bool {
        !line.is_empty() && line.contains(FAILURE_MARKER)
    }

    pub fn parse(&self, line: &str) -> LineOutcome {
        if !Self::is_failure_line(line) {
            return LineOutcome::Skipped;
        }
        let Some(blob) = self.extractor.extract(line) else {
            return LineOutcome::Dropped(ExtractError::NoObject);
        };
        match parse_blob(blob) {
            Ok(record) => LineOutcome::Record(record),
            Err(err) => LineOutcome::Dropped(err),
        }
    }
}
