//! Per-guild music queue management for serenity + songbird bots.
//!
//! The crate keeps one [`GuildQueue`] per guild: the track list, volume,
//! pause/stop/repeat flags, filter toggles, and handles to the voice session
//! and audio stream the bot already owns through songbird. Queues are passive
//! state; the bot's playback code mutates them and announces transitions over
//! each queue's event channel. A [`QueueManager`] keeps the per-guild
//! registry and provides the common transitions (enqueue, advance, stop).
//!
//! ```no_run
//! use quaver::{QueueManager, Track, filters::BASSBOOST};
//! use serenity::model::id::{GuildId, MessageId};
//!
//! # async fn demo() -> Result<(), quaver::QueueError> {
//! let manager = QueueManager::new();
//! let guild = GuildId::new(1);
//!
//! let queue = manager.get_or_create(guild, MessageId::new(1), [BASSBOOST]);
//! manager.enqueue(guild, Track::new("Resonance")).await?;
//!
//! queue.lock().await.set_filter(BASSBOOST, true)?;
//! assert_eq!(queue.lock().await.calculated_volume(), 150);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod filters;
pub mod manager;
pub mod queue;
pub mod track;

pub use error::{QueueError, QueueResult};
pub use events::{EventDispatcher, QueueEvent, QueueEventHandler};
pub use filters::FilterSet;
pub use manager::{QueueManager, SharedQueue};
pub use queue::{GuildQueue, MAX_VOLUME};
pub use track::Track;
