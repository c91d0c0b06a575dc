//! Builds the presence payload for each kind of media

use url::Url;

use crate::i18n::{Localize, MessageId};
use crate::presence::{PresenceButton, PresencePayload, Timestamps};
use crate::session::{MediaType, PlayState, SessionSnapshot};
use crate::thumbnail::FALLBACK_IMAGE;
use crate::timestamp::Anchor;

const LARGE_TEXT: &str = "Plex";
const NO_DIRECTOR: &str = "(⌐■_■)";
const PREROLL: &str = "Preroll";
const LISTEN_URL: &str = "https://listen.plex.tv/track";

/// Small image and text reflecting playback state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub image: &'static str,
    pub text: Option<String>,
}

/// `None` means nothing playable: the presence should be torn down.
pub fn playback_indicator(snapshot: &SessionSnapshot, l10n: &dyn Localize) -> Option<Indicator> {
    let is_photo = snapshot.media_type() == MediaType::Photo;
    match snapshot.state() {
        PlayState::Paused => Some(Indicator {
            image: "pause",
            text: Some(l10n.localize(MessageId::Paused)),
        }),
        PlayState::Playing | PlayState::Buffering if !is_photo => Some(Indicator {
            image: "play",
            text: Some(l10n.localize(MessageId::NowPlaying)),
        }),
        _ if is_photo => Some(Indicator {
            image: "camera",
            text: None,
        }),
        _ => None,
    }
}

/// Last path segment of a GUID such as `plex://track/5d07cdb8`
fn guid_tail(guid: &str) -> String {
    Url::parse(guid)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|tail| !tail.is_empty())
        .unwrap_or_else(|| guid.rsplit('/').next().unwrap_or(guid).to_string())
}

pub fn track_details_url(track: &str, parent: &str, grandparent: &str) -> String {
    format!(
        "{}/{}?parentGuid={}&grandparentGuid={}",
        LISTEN_URL,
        guid_tail(track),
        guid_tail(parent),
        guid_tail(grandparent)
    )
}

/// Build the payload for `snapshot`. Returns `None` for unsupported media
/// types and for snapshots with nothing playable.
pub fn format(
    snapshot: &SessionSnapshot,
    thumbnail: Option<String>,
    anchor: Option<&Anchor>,
    l10n: &dyn Localize,
) -> Option<PresencePayload> {
    let indicator = playback_indicator(snapshot, l10n)?;
    let media = &snapshot.media;

    let mut payload = PresencePayload {
        details: None,
        state: None,
        large_image: thumbnail.unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
        large_text: LARGE_TEXT.to_string(),
        small_image: Some(indicator.image.to_string()),
        small_text: indicator.text,
        timestamps: anchor.map(|a| Timestamps {
            start: Some(a.start),
            end: a.end,
        }),
        buttons: Vec::new(),
    };

    match media.media_type {
        MediaType::Episode => {
            payload.state = Some(format!(
                "{:02}x{:02} - {}",
                media.parent_index, media.index, media.title
            ));
            payload.details = Some(media.grandparent_title.clone());
        }
        MediaType::Movie => {
            let name = if media.year > 0 {
                format!("{} ({})", media.title, media.year)
            } else {
                media.title.clone()
            };
            let director = media
                .director
                .first()
                .map_or_else(|| NO_DIRECTOR.to_string(), |d| d.tag.clone());
            payload.state = Some(director);
            payload.details = Some(name);
        }
        MediaType::Track => {
            let artist = if media.original_title.is_empty() {
                media.grandparent_title.clone()
            } else {
                media.original_title.clone()
            };
            payload.state = Some(artist);
            payload.details = Some(format!("{} ({})", media.title, media.parent_title));
            payload.buttons.push(PresenceButton {
                label: l10n.localize(MessageId::TrackDetails),
                url: track_details_url(&media.guid, &media.parent_guid, &media.grandparent_guid),
            });
        }
        MediaType::Photo => {
            let text = l10n.localize(MessageId::WatchingPhotos);
            payload.state = Some(text.clone());
            payload.small_text = Some(text);
            payload.details = Some(media.title.clone());
        }
        MediaType::Clip => {
            payload.state = Some(media.title.clone());
            payload.details = Some(PREROLL.to_string());
            payload.small_text = Some(PREROLL.to_string());
        }
        MediaType::Other => {
            tracing::debug!("Unsupported media type for {}, nothing to show", media.guid);
            return None;
        }
    }

    Some(payload)
}
