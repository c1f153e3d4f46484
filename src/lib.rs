pub mod config;
pub mod error;
pub mod logging;
pub mod okapi;
pub mod replay;
pub mod source;

pub use config::{Cli, Config};
pub use error::{ExtractError, ReplayError};
pub use okapi::{Credentials, OkapiApi, OkapiClient, Session};
pub use replay::{run, run_from_config, ReplaySummary, ReplayTally, Sequencer};
pub use source::{BlobExtractor, LineOutcome, LineParser, LogReader, OrderLine, OuterBraces};
