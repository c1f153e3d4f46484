//! Reading the rollover log and recovering failed PO line payloads.

pub mod extract;
pub mod reader;
pub mod record;

pub use extract::{
    repair_doubled_quotes, BlobExtractor, LineOutcome, LineParser, OuterBraces, FAILURE_MARKER,
};
pub use reader::{LogLine, LogReader};
pub use record::OrderLine;
