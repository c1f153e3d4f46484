mod cli;
mod settings;

pub use cli::Cli;
pub use settings::{base_url_for_host, Config, DEFAULT_TIMEOUT_SECS};
