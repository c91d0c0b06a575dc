//! Presence synchronization: one call per session snapshot

use chrono::{DateTime, Utc};

use crate::detector::detect;
use crate::formatter::{format, playback_indicator};
use crate::i18n::Localize;
use crate::presence::{PresenceConnector, PresenceManager};
use crate::session::SessionSnapshot;
use crate::settings::TimeMode;
use crate::state::PresenceState;
use crate::thumbnail::{ImageHost, ImageSource, ThumbnailResolver};

/// What a sync call did with the presence service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing changed since the last published snapshot
    Unchanged,
    Published,
    /// The payload could not be delivered; retried on a later poll
    PublishFailed,
    /// Nothing playable (or unsupported media), connection closed
    Disconnected,
}

pub struct PresenceEngine<C: PresenceConnector, S, H, L> {
    manager: PresenceManager<C>,
    resolver: ThumbnailResolver<S, H>,
    l10n: L,
    time_mode: TimeMode,
}

impl<C, S, H, L> PresenceEngine<C, S, H, L>
where
    C: PresenceConnector,
    S: ImageSource,
    H: ImageHost,
    L: Localize,
{
    pub fn new(connector: C, resolver: ThumbnailResolver<S, H>, l10n: L, time_mode: TimeMode) -> Self {
        Self {
            manager: PresenceManager::new(connector),
            resolver,
            l10n,
            time_mode,
        }
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    pub fn set_time_mode(&mut self, mode: TimeMode) {
        self.time_mode = mode;
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    pub fn sync(&mut self, state: &mut PresenceState, snapshot: &SessionSnapshot) -> SyncOutcome {
        self.sync_at(state, snapshot, Utc::now())
    }

    /// Sync against an explicit clock. Never fails: every error is logged
    /// and absorbed by the component that hit it.
    pub fn sync_at(
        &mut self,
        state: &mut PresenceState,
        snapshot: &SessionSnapshot,
        now: DateTime<Utc>,
    ) -> SyncOutcome {
        let detection = detect(snapshot, state, self.time_mode, now);

        if playback_indicator(snapshot, &self.l10n).is_none() {
            tracing::info!(
                "Nothing is playing ({}), closing connection to presence service",
                snapshot.state().as_str()
            );
            self.manager.disconnect();
            return SyncOutcome::Disconnected;
        }

        if !detection.alterations.any() {
            return SyncOutcome::Unchanged;
        }

        tracing::debug!(
            "Presence altered for {} (item: {}, time: {})",
            snapshot.media.guid,
            detection.alterations.item,
            detection.alterations.time
        );

        let thumbnail = snapshot
            .media
            .artwork()
            .map(|reference| self.resolver.resolve(&mut state.thumbnail, reference, &snapshot.server));

        let Some(payload) = format(snapshot, thumbnail, detection.anchor.as_ref(), &self.l10n) else {
            self.manager.disconnect();
            return SyncOutcome::Disconnected;
        };

        if self.manager.publish(&payload) {
            SyncOutcome::Published
        } else {
            state.forget_published();
            SyncOutcome::PublishFailed
        }
    }

    /// Close the presence connection, e.g. when the poll loop shuts down
    pub fn shutdown(&mut self) {
        self.manager.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translations;
    use crate::presence::fakes::FakeConnector;
    use crate::session::{MediaType, PlayState};
    use crate::thumbnail::fakes::{FakeHost, FakeSource};
    use crate::thumbnail::FALLBACK_IMAGE;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn episode(guid: &str, state: PlayState, offset: i64) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        s.media.media_type = MediaType::Episode;
        s.media.guid = guid.to_string();
        s.media.title = "Pilot".to_string();
        s.media.grandparent_title = "Show".to_string();
        s.media.parent_index = 1;
        s.media.index = 1;
        s.media.grandparent_thumb = Some(format!("/thumb/{}", guid));
        s.media.duration = 1_800_000;
        s.session.state = state;
        s.session.view_offset = offset;
        s
    }

    struct Harness {
        fake: FakeConnector,
        source: FakeSource,
        host: FakeHost,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                fake: FakeConnector::default(),
                source: FakeSource::default(),
                host: FakeHost::default(),
            }
        }

        fn engine(
            &self,
            mode: TimeMode,
        ) -> PresenceEngine<FakeConnector, &FakeSource, &FakeHost, Translations> {
            PresenceEngine::new(
                self.fake.clone(),
                ThumbnailResolver::new(&self.source, &self.host),
                Translations::default(),
                mode,
            )
        }
    }

    #[test]
    fn test_same_snapshot_publishes_once() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();
        let s = episode("a", PlayState::Playing, 60_000);

        assert_eq!(engine.sync_at(&mut state, &s, at(0)), SyncOutcome::Published);
        assert_eq!(engine.sync_at(&mut state, &s, at(0)), SyncOutcome::Unchanged);
        assert_eq!(h.fake.publishes(), 1);
        assert_eq!(h.fake.connects(), 1);

        let payload = h.fake.last_payload().unwrap();
        assert_eq!(payload.large_image, "https://img.example/thumb/a");
        assert_eq!(payload.timestamps.unwrap().start, Some(at(-60)));
    }

    #[test]
    fn test_continuous_playback_and_seek() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();

        engine.sync_at(&mut state, &episode("a", PlayState::Playing, 60_000), at(0));
        let outcome = engine.sync_at(&mut state, &episode("a", PlayState::Playing, 62_000), at(2));
        assert_eq!(outcome, SyncOutcome::Unchanged);

        let outcome = engine.sync_at(&mut state, &episode("a", PlayState::Playing, 92_000), at(2));
        assert_eq!(outcome, SyncOutcome::Published);
        assert_eq!(h.fake.publishes(), 2);
        // the thumbnail slot was reused
        assert_eq!(h.source.fetches.get(), 1);
    }

    #[test]
    fn test_stopped_disconnects_without_publishing() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();

        engine.sync_at(&mut state, &episode("a", PlayState::Playing, 0), at(0));
        let outcome = engine.sync_at(&mut state, &episode("a", PlayState::Stopped, 0), at(1));
        assert_eq!(outcome, SyncOutcome::Disconnected);
        assert_eq!(h.fake.publishes(), 1);
        assert_eq!(h.fake.disconnects(), 1);
        assert!(!engine.is_connected());

        // resuming republishes on a fresh connection
        let outcome = engine.sync_at(&mut state, &episode("a", PlayState::Playing, 0), at(2));
        assert_eq!(outcome, SyncOutcome::Published);
        assert_eq!(h.fake.connects(), 2);
    }

    #[test]
    fn test_idle_from_start_never_connects() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();

        let outcome = engine.sync_at(&mut state, &episode("a", PlayState::Unknown, 0), at(0));
        assert_eq!(outcome, SyncOutcome::Disconnected);
        assert_eq!(h.fake.connects(), 0);
        assert_eq!(h.fake.publishes(), 0);
    }

    #[test]
    fn test_unsupported_media_disconnects() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();

        engine.sync_at(&mut state, &episode("a", PlayState::Playing, 0), at(0));
        let mut other = episode("b", PlayState::Playing, 0);
        other.media.media_type = MediaType::Other;

        assert_eq!(engine.sync_at(&mut state, &other, at(1)), SyncOutcome::Disconnected);
        assert_eq!(h.fake.publishes(), 1);
        assert_eq!(h.fake.disconnects(), 1);
    }

    #[test]
    fn test_thumbnail_failure_is_contained() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();

        h.source.fail.set(true);
        let outcome = engine.sync_at(&mut state, &episode("a", PlayState::Playing, 0), at(0));
        assert_eq!(outcome, SyncOutcome::Published);
        assert_eq!(h.fake.last_payload().unwrap().large_image, FALLBACK_IMAGE);

        h.source.fail.set(false);
        engine.sync_at(&mut state, &episode("b", PlayState::Playing, 0), at(1));
        assert_eq!(
            h.fake.last_payload().unwrap().large_image,
            "https://img.example/thumb/b"
        );
        assert_eq!(h.source.fetches.get(), 2);
    }

    #[test]
    fn test_publish_failure_retries_next_poll() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();
        let s = episode("a", PlayState::Playing, 0);

        *h.fake.fail_publish.borrow_mut() = true;
        assert_eq!(engine.sync_at(&mut state, &s, at(0)), SyncOutcome::PublishFailed);
        assert!(!engine.is_connected());
        assert_eq!(h.fake.disconnects(), 1);

        *h.fake.fail_publish.borrow_mut() = false;
        assert_eq!(engine.sync_at(&mut state, &s, at(0)), SyncOutcome::Published);
        assert_eq!(h.fake.connects(), 2);
    }

    #[test]
    fn test_paused_republishes_each_poll() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Elapsed);
        let mut state = PresenceState::new();
        let s = episode("a", PlayState::Paused, 10_000);

        engine.sync_at(&mut state, &s, at(0));
        engine.sync_at(&mut state, &s, at(5));
        assert_eq!(h.fake.publishes(), 2);
        let payload = h.fake.last_payload().unwrap();
        assert_eq!(payload.small_image.as_deref(), Some("pause"));
        assert_eq!(payload.timestamps, None);
    }

    #[test]
    fn test_remaining_mode() {
        let h = Harness::new();
        let mut engine = h.engine(TimeMode::Remaining);
        let mut state = PresenceState::new();

        engine.sync_at(&mut state, &episode("a", PlayState::Playing, 800_000), at(0));
        let timestamps = h.fake.last_payload().unwrap().timestamps.unwrap();
        assert_eq!(timestamps.start, Some(at(1_000)));
        assert_eq!(timestamps.end, Some(at(1_000)));

        engine.set_time_mode(TimeMode::Hidden);
        assert_eq!(engine.time_mode(), TimeMode::Hidden);
    }
}
