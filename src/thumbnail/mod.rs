//! Turns media server thumbnail references into publicly linkable image URLs

mod litterbox;
mod plex;

pub use litterbox::Litterbox;
pub use plex::PlexTranscoder;

use crate::error::ThumbnailError;
use crate::session::ServerConnection;

/// Image key shown when no thumbnail could be resolved
pub const FALLBACK_IMAGE: &str = "plex";

/// Fetches raw thumbnail bytes from the media server
pub trait ImageSource {
    fn fetch(&self, reference: &str, server: &ServerConnection) -> Result<Vec<u8>, ThumbnailError>;
}

/// Re-hosts image bytes somewhere the presence service can link to
pub trait ImageHost {
    fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String, ThumbnailError>;
}

/// Single-slot cache: the last reference and what it resolved to.
///
/// A failed resolution stores [`FALLBACK_IMAGE`], which never counts as a hit.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailCache {
    reference: Option<String>,
    url: String,
}

impl ThumbnailCache {
    fn hit(&self, reference: &str) -> Option<&str> {
        match &self.reference {
            Some(cached) if cached == reference && self.url != FALLBACK_IMAGE => {
                Some(self.url.as_str())
            }
            _ => None,
        }
    }

    fn store(&mut self, reference: &str, url: String) {
        self.reference = Some(reference.to_string());
        self.url = url;
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct ThumbnailResolver<S, H> {
    source: S,
    host: H,
}

impl<S: ImageSource, H: ImageHost> ThumbnailResolver<S, H> {
    pub fn new(source: S, host: H) -> Self {
        Self { source, host }
    }

    /// Resolve `reference`, reusing the cached URL when it is a real success.
    /// Any failure is logged and yields [`FALLBACK_IMAGE`].
    pub fn resolve(
        &self,
        cache: &mut ThumbnailCache,
        reference: &str,
        server: &ServerConnection,
    ) -> String {
        if let Some(url) = cache.hit(reference) {
            return url.to_string();
        }

        let url = match self.fetch_and_upload(reference, server) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Couldn't resolve thumbnail {}: {}", reference, e);
                FALLBACK_IMAGE.to_string()
            }
        };
        cache.store(reference, url.clone());
        url
    }

    fn fetch_and_upload(
        &self,
        reference: &str,
        server: &ServerConnection,
    ) -> Result<String, ThumbnailError> {
        let bytes = self.source.fetch(reference, server)?;
        tracing::debug!("Fetched thumbnail {} ({} bytes)", reference, bytes.len());
        self.host.upload(bytes, reference)
    }
}
