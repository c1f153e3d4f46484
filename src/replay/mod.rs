//! Wiring the log reader to the sequencer.

mod sequencer;

pub use sequencer::{ReplayTally, Sequencer};

use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::ReplayError;
use crate::okapi::{OkapiApi, OkapiClient};
use crate::source::{BlobExtractor, LineOutcome, LineParser, LogReader, OrderLine};

/// Records buffered between the reader and the replay worker.
const QUEUE_CAPACITY: usize = 64;

/// What a complete run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Lines read from the log
    pub lines: usize,
    /// Failure lines turned into PO line records
    pub parsed: usize,
    /// Failure lines whose payload could not be recovered
    pub dropped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
struct ScanStats {
    lines: usize,
    parsed: usize,
    dropped: usize,
}

/// Read the log and queue every recovered record in file order.
///
/// Stops early once the worker has hung up.
async fn scan<R, E>(
    mut reader: LogReader<R>,
    parser: &LineParser<E>,
    queue: mpsc::Sender<OrderLine>,
) -> Result<ScanStats, ReplayError>
where
    R: AsyncBufRead + Unpin,
    E: BlobExtractor,
{
    let mut stats = ScanStats::default();
    while let Some(line) = reader.next_line().await? {
        match parser.parse(&line.text) {
            LineOutcome::Skipped => {}
            LineOutcome::Record(order_line) => {
                stats.parsed += 1;
                if queue.send(order_line).await.is_err() {
                    tracing::debug!(line = line.number, "Replay worker stopped, ending scan");
                    break;
                }
            }
            LineOutcome::Dropped(err) => {
                stats.dropped += 1;
                tracing::warn!(line = line.number, error = %err, "Dropping failure line");
            }
        }
    }
    stats.lines = reader.lines_read();
    Ok(stats)
}

/// Replay every failed PO line found by `reader` through `sequencer`.
///
/// Reading and replaying interleave on the current task. The call returns
/// only after the last PUT has settled. Login errors win over read errors.
pub async fn run<R, E, A>(
    reader: LogReader<R>,
    parser: &LineParser<E>,
    sequencer: &Sequencer<A>,
) -> Result<ReplaySummary, ReplayError>
where
    R: AsyncBufRead + Unpin,
    E: BlobExtractor,
    A: OkapiApi,
{
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let (scanned, drained) = tokio::join!(scan(reader, parser, tx), sequencer.drain(rx));

    let tally = drained?;
    let stats = scanned?;
    let summary = ReplaySummary {
        lines: stats.lines,
        parsed: stats.parsed,
        dropped: stats.dropped,
        succeeded: tally.succeeded,
        failed: tally.failed,
    };
    tracing::info!(
        lines = summary.lines,
        parsed = summary.parsed,
        dropped = summary.dropped,
        attempted = tally.attempted(),
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Rollover replay finished"
    );
    Ok(summary)
}

/// Open the configured log and replay it against the configured Okapi.
pub async fn run_from_config(config: &Config) -> Result<ReplaySummary, ReplayError> {
    let reader = LogReader::open(&config.log_path).await?;
    let client = OkapiClient::from_config(config)?;
    tracing::info!(
        log = %config.log_path.display(),
        okapi = %client.base_url(),
        tenant = %config.tenant,
        "Starting rollover replay"
    );
    let sequencer = Sequencer::new(client, config.credentials.clone());
    run(reader, &LineParser::new(), &sequencer).await
}
