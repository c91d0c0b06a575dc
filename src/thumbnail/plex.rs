use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use super::ImageSource;
use crate::error::ThumbnailError;
use crate::session::ServerConnection;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const THUMB_WIDTH: u32 = 450;
const THUMB_HEIGHT: u32 = 253;

/// Pulls thumbnails through the media server's photo transcoder
pub struct PlexTranscoder {
    client: Client,
}

impl PlexTranscoder {
    pub fn new() -> Result<Self, ThumbnailError> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

/// Build the transcode URL for a thumbnail reference. The endpoint is
/// appended to the server URL's path so reverse-proxy prefixes survive.
pub fn transcode_url(server: &ServerConnection, reference: &str) -> Result<Url, ThumbnailError> {
    let mut url = Url::parse(&server.url)?;
    url.path_segments_mut()
        .map_err(|()| ThumbnailError::NotABaseUrl(server.url.clone()))?
        .pop_if_empty()
        .extend(["photo", ":", "transcode"]);
    url.query_pairs_mut()
        .clear()
        .append_pair("width", &THUMB_WIDTH.to_string())
        .append_pair("height", &THUMB_HEIGHT.to_string())
        .append_pair("minSize", "1")
        .append_pair("upscale", "1")
        .append_pair("X-Plex-Token", &server.token)
        .append_pair("url", reference);
    Ok(url)
}

impl ImageSource for PlexTranscoder {
    fn fetch(&self, reference: &str, server: &ServerConnection) -> Result<Vec<u8>, ThumbnailError> {
        let url = transcode_url(server, reference)?;
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(ThumbnailError::Status(response.status()));
        }

        Ok(response.bytes()?.to_vec())
    }
}
