//! Decides whether a snapshot changes what is displayed

use chrono::{DateTime, Utc};

use crate::session::{MediaType, PlayState, SessionSnapshot};
use crate::settings::TimeMode;
use crate::state::PresenceState;
use crate::timestamp::{compute_anchor, Anchor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alterations {
    pub item: bool,
    pub time: bool,
}

impl Alterations {
    pub fn any(self) -> bool {
        self.item || self.time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub alterations: Alterations,
    /// Present only for playing, non-photo media with a visible time mode
    pub anchor: Option<Anchor>,
}

pub fn detect(
    snapshot: &SessionSnapshot,
    state: &mut PresenceState,
    mode: TimeMode,
    now: DateTime<Utc>,
) -> Detection {
    let mut alterations = Alterations::default();
    let mut anchor = None;

    if state.playing_item.as_deref() != Some(snapshot.media.guid.as_str()) {
        state.playing_item = Some(snapshot.media.guid.clone());
        alterations.item = true;
    }

    if state.play_state != Some(snapshot.state()) {
        state.play_state = Some(snapshot.state());
        alterations.time = true;
    }

    let is_photo = snapshot.media_type() == MediaType::Photo;
    match snapshot.state() {
        PlayState::Playing if !is_photo => {
            anchor = compute_anchor(
                snapshot.session.view_offset,
                snapshot.media.duration,
                mode,
                now,
                &mut state.last_anchor,
            );
            if anchor.is_some_and(|a| a.drift) {
                alterations.time = true;
            }
        }
        PlayState::Paused => alterations.time = true,
        PlayState::Buffering if !is_photo => alterations.time = true,
        _ => {}
    }

    Detection {
        alterations,
        anchor,
    }
}
