//! Per-guild queue registry and the orchestration helpers that drive it.
//!
//! [`QueueManager`] owns one [`GuildQueue`] per active guild. Each queue sits
//! behind its own `tokio::sync::Mutex`, so queue state always has a single
//! logical owner at a time; the registry itself is a `DashMap` and needs no
//! outer lock.

use dashmap::DashMap;
use serenity::model::id::{GuildId, MessageId};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{QueueError, QueueResult};
use crate::events::{QueueEvent, QueueEventHandler};
use crate::queue::{GuildQueue, VoiceHandle};
use crate::track::Track;
use songbird::tracks::TrackHandle;

/// Shared handle to one guild's queue.
pub type SharedQueue = Arc<Mutex<GuildQueue>>;

/// Manages the queues of every active guild.
#[derive(Default)]
pub struct QueueManager {
    queues: DashMap<GuildId, SharedQueue>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the guild's queue, creating it from the given message and
    /// filter names if this is the guild's first playback request.
    pub fn get_or_create<I, S>(
        &self,
        guild_id: GuildId,
        first_message: MessageId,
        filter_names: I,
    ) -> SharedQueue
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queues
            .entry(guild_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(GuildQueue::new(
                    guild_id,
                    first_message,
                    filter_names,
                )))
            })
            .value()
            .clone()
    }

    /// Returns the guild's queue, if one exists.
    pub fn get(&self, guild_id: GuildId) -> Option<SharedQueue> {
        self.queues.get(&guild_id).map(|entry| entry.value().clone())
    }

    /// Discards the guild's queue, returning it. Holders of a [`SharedQueue`]
    /// keep theirs alive; the registry just forgets it.
    pub fn remove(&self, guild_id: GuildId) -> Option<SharedQueue> {
        let removed = self.queues.remove(&guild_id).map(|(_, queue)| queue);
        if removed.is_some() {
            info!("Discarded queue for guild {}", guild_id);
        }
        removed
    }

    /// Whether a queue exists for the guild.
    pub fn exists(&self, guild_id: GuildId) -> bool {
        self.queues.contains_key(&guild_id)
    }

    /// Number of guilds with an active queue.
    pub fn guild_count(&self) -> usize {
        self.queues.len()
    }

    /// Registers an event handler on the guild's queue.
    pub async fn subscribe(
        &self,
        guild_id: GuildId,
        handler: Arc<dyn QueueEventHandler>,
    ) -> QueueResult<()> {
        let queue = self.get(guild_id).ok_or(QueueError::NoQueue(guild_id))?;
        queue.lock().await.subscribe(handler);
        Ok(())
    }

    /// Appends a track to the guild's queue. If nothing was playing, the new
    /// track becomes current immediately and a `TrackChanged` event with no
    /// old track is dispatched. Returns whether playback started.
    pub async fn enqueue(&self, guild_id: GuildId, track: Track) -> QueueResult<bool> {
        let queue = self.get(guild_id).ok_or(QueueError::NoQueue(guild_id))?;
        let mut queue = queue.lock().await;

        let starts_playback = queue.is_empty();
        queue.add_track(track.clone());

        if starts_playback {
            info!("Starting playback of '{}' for guild {}", track.title, guild_id);
            queue.paused = false;
            queue.stopped = false;
            queue.last_skipped = false;
            queue
                .events()
                .dispatch(QueueEvent::TrackChanged {
                    old_track: None,
                    new_track: track,
                    skipped: false,
                })
                .await;
        } else {
            debug!(
                "Track queued behind {} others for guild {}",
                queue.len() - 1,
                guild_id
            );
        }

        Ok(starts_playback)
    }

    /// Moves the guild's queue past the current track.
    ///
    /// With repeat mode on and no explicit skip, the current track stays put
    /// and is announced again as a replay. Otherwise the head is popped: the
    /// next track (if any) is announced via `TrackChanged` carrying the old
    /// track and the `skipped` flag, and a fully consumed list dispatches
    /// `End`. Returns the track now playing, if any.
    pub async fn advance_track(&self, guild_id: GuildId, skipped: bool) -> QueueResult<Option<Track>> {
        let queue = self.get(guild_id).ok_or(QueueError::NoQueue(guild_id))?;
        let mut queue = queue.lock().await;

        queue.last_skipped = skipped;

        if queue.repeat_mode && !skipped {
            let Some(current) = queue.current_track().cloned() else {
                return Ok(None);
            };
            debug!("Replaying '{}' for guild {}", current.title, guild_id);
            queue.reset_stream_time();
            queue
                .events()
                .dispatch(QueueEvent::TrackChanged {
                    old_track: Some(current.clone()),
                    new_track: current.clone(),
                    skipped: false,
                })
                .await;
            return Ok(Some(current));
        }

        let old_track = queue.advance();
        queue.reset_stream_time();
        match queue.current_track().cloned() {
            Some(new_track) => {
                info!("Now playing '{}' for guild {}", new_track.title, guild_id);
                queue
                    .events()
                    .dispatch(QueueEvent::TrackChanged {
                        old_track,
                        new_track: new_track.clone(),
                        skipped,
                    })
                    .await;
                Ok(Some(new_track))
            }
            None => {
                info!("Queue for guild {} is out of tracks", guild_id);
                queue.events().dispatch(QueueEvent::End).await;
                Ok(None)
            }
        }
    }

    /// Halts playback for the guild: flags the queue as stopped, drops every
    /// track, and detaches the voice and stream handles. The handles are
    /// returned to the caller, which owns their teardown.
    pub async fn stop(
        &self,
        guild_id: GuildId,
    ) -> QueueResult<(Option<VoiceHandle>, Option<TrackHandle>)> {
        let queue = self.get(guild_id).ok_or(QueueError::NoQueue(guild_id))?;
        let mut queue = queue.lock().await;

        info!("Stopping playback for guild {}", guild_id);
        queue.stopped = true;
        queue.paused = true;
        queue.clear_tracks();
        queue.reset_stream_time();

        Ok((queue.detach_voice(), queue.detach_stream()))
    }

    /// Announces that every listener left the guild's voice channel.
    pub async fn notify_channel_empty(&self, guild_id: GuildId) -> QueueResult<()> {
        let queue = self.get(guild_id).ok_or(QueueError::NoQueue(guild_id))?;
        let queue = queue.lock().await;
        debug!("Voice channel empty for guild {}", guild_id);
        queue.events().dispatch(QueueEvent::ChannelEmpty).await;
        Ok(())
    }
}
