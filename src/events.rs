//! Queue event notifications.
//!
//! A [`GuildQueue`](crate::queue::GuildQueue) carries an [`EventDispatcher`]
//! as its notification channel. The queue never raises events on its own: the
//! orchestration code driving playback decides when a transition happened and
//! dispatches the matching event through the queue it owns.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::track::Track;

/// State transitions announced over a guild queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    /// The track list has been fully consumed. No `TrackChanged` will follow
    /// unless new tracks are added.
    End,
    /// Every listener has left the voice channel associated with the queue.
    ChannelEmpty,
    /// The currently playing track changed.
    TrackChanged {
        /// The track playing before the transition. Absent only on the very
        /// first track assignment.
        old_track: Option<Track>,
        /// The newly current track.
        new_track: Track,
        /// True iff the transition was caused by an explicit skip rather than
        /// natural completion or a repeat-mode replay.
        skipped: bool,
    },
}

/// Receives queue events. All methods default to no-ops so implementors only
/// override the transitions they care about.
#[async_trait]
pub trait QueueEventHandler: Send + Sync + 'static {
    /// Called when the queue runs out of tracks.
    async fn on_end(&self) {}

    /// Called when the voice channel empties out.
    async fn on_channel_empty(&self) {}

    /// Called when the current track changes.
    async fn on_track_changed(
        &self,
        _old_track: Option<Track>,
        _new_track: Track,
        _skipped: bool,
    ) {
    }
}

/// Fans queue events out to registered handlers.
///
/// Handlers are awaited one at a time in registration order, so a handler
/// observing shared state sees every event exactly once and in order.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn QueueEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for all subsequent dispatches.
    pub fn subscribe(&mut self, handler: Arc<dyn QueueEventHandler>) {
        self.handlers.push(handler);
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Delivers the event to every registered handler, in registration order.
    pub async fn dispatch(&self, event: QueueEvent) {
        for handler in &self.handlers {
            match &event {
                QueueEvent::End => handler.on_end().await,
                QueueEvent::ChannelEmpty => handler.on_channel_empty().await,
                QueueEvent::TrackChanged {
                    old_track,
                    new_track,
                    skipped,
                } => {
                    handler
                        .on_track_changed(old_track.clone(), new_track.clone(), *skipped)
                        .await
                }
            }
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Appends a tagged line to a shared log for every event it sees.
    struct Tagger {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl QueueEventHandler for Tagger {
        async fn on_end(&self) {
            self.log.lock().unwrap().push(format!("{}:end", self.tag));
        }

        async fn on_track_changed(&self, _old: Option<Track>, new_track: Track, _skipped: bool) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.tag, new_track.title));
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(Arc::new(Tagger {
            tag: "a",
            log: log.clone(),
        }));
        dispatcher.subscribe(Arc::new(Tagger {
            tag: "b",
            log: log.clone(),
        }));
        assert_eq!(dispatcher.handler_count(), 2);

        tokio_test::block_on(dispatcher.dispatch(QueueEvent::End));
        tokio_test::block_on(dispatcher.dispatch(QueueEvent::TrackChanged {
            old_track: None,
            new_track: Track::new("next"),
            skipped: false,
        }));

        assert_eq!(log.lock().unwrap().join(" "), "a:end b:end a:next b:next");
    }

    #[test]
    fn unhandled_events_fall_through_to_no_ops() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(Arc::new(Tagger {
            tag: "a",
            log: log.clone(),
        }));

        // Tagger does not override on_channel_empty.
        tokio_test::block_on(dispatcher.dispatch(QueueEvent::ChannelEmpty));

        assert!(log.lock().unwrap().is_empty());
    }
}
