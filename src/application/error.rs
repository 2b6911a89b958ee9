// Errors surfaced to console callers
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("channel {0} has no entity mapped")]
    ChannelDisabled(String),

    #[error("channel {0} does not keep history")]
    NoHistory(String),

    #[error("console service has shut down")]
    Stopped,
}
