use serenity::model::id::GuildId;
use thiserror::Error;

/// Errors that can occur during queue operations
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Volume {0} is outside the 0-100 range")]
    VolumeOutOfRange(u8),

    #[error("No queue for guild {0}")]
    NoQueue(GuildId),

    #[error("Track index {index} is out of range for a queue of {len} tracks")]
    TrackIndexOutOfRange { index: usize, len: usize },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
