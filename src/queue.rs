//! The per-guild queue entity.
//!
//! A [`GuildQueue`] is a passive record of one guild's playback state. It
//! performs no I/O and owns no background tasks: the orchestration code that
//! holds it (usually through a [`QueueManager`](crate::manager::QueueManager))
//! adds and removes tracks, flips the playback flags, and dispatches events.
//! The voice connection and audio stream handles stored here are created and
//! torn down by songbird, never by this entity.

use serenity::model::id::{GuildId, MessageId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::Call;
use songbird::tracks::TrackHandle;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{QueueError, QueueResult};
use crate::events::{EventDispatcher, QueueEventHandler};
use crate::filters::{BASSBOOST, FilterSet};
use crate::track::Track;

/// Handle to a live voice session, owned and managed by songbird.
pub type VoiceHandle = Arc<SerenityMutex<Call>>;

/// Highest accepted base volume.
pub const MAX_VOLUME: u8 = 100;

/// Gain added to the calculated volume while bass boost is enabled.
const BASSBOOST_GAIN: u8 = 50;

/// Playback state for a single guild.
pub struct GuildQueue {
    guild_id: GuildId,
    voice_connection: Option<VoiceHandle>,
    stream: Option<TrackHandle>,
    // Front of the deque is the currently playing track.
    tracks: VecDeque<Track>,
    /// Whether playback has been explicitly halted.
    pub stopped: bool,
    /// Whether the most recent track transition was an explicit skip.
    pub last_skipped: bool,
    volume: u8,
    /// Whether playback is paused. Queues start out paused until the
    /// orchestrator begins playback.
    pub paused: bool,
    /// Whether the current track is replayed instead of advancing.
    pub repeat_mode: bool,
    filters: FilterSet,
    additional_stream_time: Duration,
    first_message: MessageId,
    events: EventDispatcher,
}

impl GuildQueue {
    /// Creates the queue for a guild.
    ///
    /// `filter_names` fixes the filter key domain for the lifetime of the
    /// queue; every filter starts out disabled. The queue starts empty,
    /// paused, at full volume, with no voice connection or stream attached.
    pub fn new<I, S>(guild_id: GuildId, first_message: MessageId, filter_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        info!("Created queue for guild {}", guild_id);
        Self {
            guild_id,
            voice_connection: None,
            stream: None,
            tracks: VecDeque::new(),
            stopped: false,
            last_skipped: false,
            volume: MAX_VOLUME,
            paused: true,
            repeat_mode: false,
            filters: FilterSet::new(filter_names),
            additional_stream_time: Duration::ZERO,
            first_message,
            events: EventDispatcher::new(),
        }
    }

    /// The guild this queue belongs to.
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// The message that initialized this queue.
    pub fn first_message(&self) -> MessageId {
        self.first_message
    }

    /// The currently playing track, if any.
    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// The full track list in play order, the currently playing track first.
    pub fn tracks(&self) -> &VecDeque<Track> {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Appends a track to the end of the queue.
    pub fn add_track(&mut self, track: Track) {
        debug!("Queued '{}' for guild {}", track.title, self.guild_id);
        self.tracks.push_back(track);
    }

    /// Removes the track at the given position (0 is the currently playing
    /// track), returning it.
    pub fn remove_track(&mut self, index: usize) -> QueueResult<Track> {
        self.tracks
            .remove(index)
            .ok_or(QueueError::TrackIndexOutOfRange {
                index,
                len: self.tracks.len(),
            })
    }

    /// Pops the currently playing track, promoting the next queued track.
    /// Returns the popped track, or `None` if the queue was already empty.
    pub fn advance(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Drops every track, played and queued alike.
    pub fn clear_tracks(&mut self) {
        self.tracks.clear();
    }

    /// Base output volume, always within 0-100.
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Sets the base volume. Values above [`MAX_VOLUME`] are rejected and
    /// leave the current volume unchanged.
    pub fn set_volume(&mut self, volume: u8) -> QueueResult<()> {
        if volume > MAX_VOLUME {
            return Err(QueueError::VolumeOutOfRange(volume));
        }
        self.volume = volume;
        Ok(())
    }

    /// The effective output volume: the base volume, raised by a fixed gain
    /// while the bass boost filter is enabled.
    pub fn calculated_volume(&self) -> u8 {
        if self.filters.is_enabled(BASSBOOST) {
            self.volume + BASSBOOST_GAIN
        } else {
            self.volume
        }
    }

    /// The filter toggles for this queue.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Switches a filter on or off. Names outside the set fixed at
    /// construction are rejected.
    pub fn set_filter(&mut self, name: &str, enabled: bool) -> QueueResult<()> {
        self.filters.set(name, enabled)
    }

    /// Flips a filter, returning its new state.
    pub fn toggle_filter(&mut self, name: &str) -> QueueResult<bool> {
        self.filters.toggle(name)
    }

    /// Attaches the live voice session handle. The handle stays owned by
    /// songbird; dropping the queue does not disconnect the call.
    pub fn attach_voice(&mut self, call: VoiceHandle) {
        self.voice_connection = Some(call);
    }

    /// Detaches and returns the voice session handle, if one was attached.
    pub fn detach_voice(&mut self) -> Option<VoiceHandle> {
        self.voice_connection.take()
    }

    /// The attached voice session handle, if any.
    pub fn voice_connection(&self) -> Option<&VoiceHandle> {
        self.voice_connection.as_ref()
    }

    /// Attaches the handle of the active audio stream.
    pub fn attach_stream(&mut self, handle: TrackHandle) {
        self.stream = Some(handle);
    }

    /// Detaches and returns the active stream handle, if one was attached.
    pub fn detach_stream(&mut self) -> Option<TrackHandle> {
        self.stream.take()
    }

    /// The attached stream handle, if any.
    pub fn stream(&self) -> Option<&TrackHandle> {
        self.stream.as_ref()
    }

    /// Accumulated offset to add to elapsed-time calculations, e.g. after a
    /// seek or a filter change restarted the stream.
    pub fn additional_stream_time(&self) -> Duration {
        self.additional_stream_time
    }

    /// Adds to the elapsed-time offset.
    pub fn add_stream_time(&mut self, time: Duration) {
        self.additional_stream_time += time;
    }

    /// Resets the elapsed-time offset, e.g. when a new track starts.
    pub fn reset_stream_time(&mut self) {
        self.additional_stream_time = Duration::ZERO;
    }

    /// Registers an event handler on this queue's notification channel.
    pub fn subscribe(&mut self, handler: Arc<dyn QueueEventHandler>) {
        self.events.subscribe(handler);
    }

    /// The notification channel of this queue. The orchestrator dispatches
    /// events through it; the queue itself never does.
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    fn queue() -> GuildQueue {
        GuildQueue::new(GuildId::new(1), MessageId::new(1), [BASSBOOST])
    }

    #[test]
    fn construction_defaults() {
        let queue = queue();

        assert!(queue.is_empty());
        assert!(queue.paused);
        assert!(!queue.stopped);
        assert!(!queue.last_skipped);
        assert!(!queue.repeat_mode);
        assert_eq!(queue.volume(), 100);
        assert_eq!(queue.additional_stream_time(), Duration::ZERO);
        assert!(queue.voice_connection().is_none());
        assert!(queue.stream().is_none());
        assert_eq!(queue.events().handler_count(), 0);
    }

    #[test]
    fn current_track_follows_the_head() {
        let mut queue = queue();
        assert_eq!(queue.current_track(), None);

        queue.add_track(Track::new("first"));
        queue.add_track(Track::new("second"));
        assert_eq!(queue.current_track().unwrap().title, "first");

        let popped = queue.advance().unwrap();
        assert_eq!(popped.title, "first");
        assert_eq!(queue.current_track().unwrap().title, "second");

        queue.advance();
        assert_eq!(queue.current_track(), None);
    }

    #[test_case(100, false => 100 ; "default volume without boost")]
    #[test_case(40, true => 90 ; "boost adds a fixed gain")]
    #[test_case(0, true => 50 ; "boost applies at zero volume")]
    #[test_case(100, true => 150 ; "boost can exceed the base maximum")]
    fn calculated_volume_cases(volume: u8, boost: bool) -> u8 {
        let mut queue = queue();
        queue.set_volume(volume).unwrap();
        queue.set_filter(BASSBOOST, boost).unwrap();
        queue.calculated_volume()
    }

    #[test]
    fn bassboost_changes_only_the_derived_volume() {
        let mut queue = queue();
        queue.set_volume(40).unwrap();

        queue.toggle_filter(BASSBOOST).unwrap();
        assert_eq!(queue.calculated_volume(), 90);
        assert_eq!(queue.volume(), 40);

        queue.toggle_filter(BASSBOOST).unwrap();
        assert_eq!(queue.calculated_volume(), 40);
    }

    #[test]
    fn missing_bassboost_key_reads_as_disabled() {
        let queue = GuildQueue::new(GuildId::new(1), MessageId::new(1), ["nightcore"]);
        assert_eq!(queue.calculated_volume(), 100);
    }

    #[test]
    fn out_of_range_volume_is_rejected_unchanged() {
        let mut queue = queue();
        assert_matches!(queue.set_volume(101), Err(QueueError::VolumeOutOfRange(101)));
        assert_eq!(queue.volume(), 100);

        queue.set_volume(0).unwrap();
        assert_eq!(queue.volume(), 0);
    }

    #[test]
    fn remove_track_rejects_bad_index() {
        let mut queue = queue();
        queue.add_track(Track::new("only"));

        assert_matches!(
            queue.remove_track(3),
            Err(QueueError::TrackIndexOutOfRange { index: 3, len: 1 })
        );
        let removed = queue.remove_track(0).unwrap();
        assert_eq!(removed.title, "only");
        assert!(queue.is_empty());
    }
}
