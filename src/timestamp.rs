//! Drift-tolerant wall-clock anchors for the progress bar.
//!
//! Every poll recomputes the anchor from `now` and the reported offset, so
//! consecutive anchors jitter by however late the poll ran. Anchors that land
//! within [`DRIFT_THRESHOLD_SECS`] of the stored one count as continuous
//! playback; anything further away is a seek or a new item.

use chrono::{DateTime, TimeDelta, Utc};

use crate::settings::TimeMode;

pub const DRIFT_THRESHOLD_SECS: i64 = 4;

/// Timestamp range to display along with whether it moved past the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub drift: bool,
}

/// Compute the anchor for a playing session and update `last` on drift.
///
/// Returns `None` for [`TimeMode::Hidden`], in which case no timestamp is
/// shown and `last` is left untouched.
pub fn compute_anchor(
    offset_ms: i64,
    duration_ms: i64,
    mode: TimeMode,
    now: DateTime<Utc>,
    last: &mut Option<DateTime<Utc>>,
) -> Option<Anchor> {
    match mode {
        TimeMode::Elapsed => {
            let start = now
                .checked_sub_signed(millis(offset_ms))
                .unwrap_or(now);
            let drift = check_drift(start, last);
            Some(Anchor {
                start,
                end: None,
                drift,
            })
        }
        TimeMode::Remaining => {
            let remaining = duration_ms.saturating_sub(offset_ms);
            let end = now
                .checked_add_signed(millis(remaining))
                .unwrap_or(now);
            let drift = check_drift(end, last);
            Some(Anchor {
                start: end,
                end: Some(end),
                drift,
            })
        }
        TimeMode::Hidden => None,
    }
}

fn millis(ms: i64) -> TimeDelta {
    TimeDelta::try_milliseconds(ms).unwrap_or(TimeDelta::zero())
}

fn check_drift(candidate: DateTime<Utc>, last: &mut Option<DateTime<Utc>>) -> bool {
    let threshold = TimeDelta::seconds(DRIFT_THRESHOLD_SECS);
    let continuous = last
        .map(|previous| candidate.signed_duration_since(previous).abs() < threshold)
        .unwrap_or(false);

    if !continuous {
        tracing::info!("A seek or a media change was detected, updating state...");
        *last = Some(candidate);
    }
    !continuous
}
