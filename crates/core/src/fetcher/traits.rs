//! Trait seams of the fetcher framework.

use async_trait::async_trait;
use librqbit_core::torrent_metainfo::{torrent_from_bytes, TorrentMetaV1Owned};

use super::{FetcherError, Torrent};

/// One tracker integration.
///
/// `is_matched_for` is a pure predicate; the change-detection and fetch
/// operations require a prior match and perform live reads, so they fail
/// with [`FetcherError::Logic`] when invoked on a non-matching torrent.
/// Login and captcha behavior is optional: the defaults are no-ops for
/// fetchers that do not compose those capabilities.
#[async_trait]
pub trait Fetcher: Send {
    fn name(&self) -> &str;

    fn version(&self) -> u32;

    /// Whether this fetcher handles the torrent's tracker.
    fn is_matched_for(&self, torrent: &Torrent) -> bool;

    /// Whether the remote content fingerprint differs from the stored one.
    async fn is_torrent_changed(&mut self, torrent: &Torrent) -> Result<bool, FetcherError>;

    /// Fetch the tracker's current torrent payload.
    async fn fetch_new_data(&mut self, torrent: &Torrent) -> Result<Vec<u8>, FetcherError>;

    /// Sanity probe asserting the site is reachable and looks as expected.
    async fn test_site(&mut self) -> Result<(), FetcherError> {
        Ok(())
    }

    async fn login(&mut self) -> Result<(), FetcherError> {
        Ok(())
    }

    /// Coarse signal: a session exists. Not a verified-authenticated check.
    fn is_logged_in(&self) -> bool {
        false
    }
}

/// Captcha image-to-text collaborator.
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    async fn solve(&self, image_url: &str) -> Result<String, FetcherError>;
}

/// Structural validity predicate for fetched torrent payloads.
pub trait TorrentDataValidator: Send + Sync {
    fn is_valid(&self, data: &[u8]) -> bool;
}

/// Default validator: the payload must parse as bencoded torrent metainfo.
#[derive(Debug, Clone, Copy, Default)]
pub struct BencodeValidator;

impl TorrentDataValidator for BencodeValidator {
    fn is_valid(&self, data: &[u8]) -> bool {
        let parsed: Result<TorrentMetaV1Owned, _> = torrent_from_bytes(data);
        parsed.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bencode_validator_rejects_garbage() {
        let validator = BencodeValidator;
        assert!(!validator.is_valid(b""));
        assert!(!validator.is_valid(b"not a torrent"));
        assert!(!validator.is_valid(b"<html>error page</html>"));
    }

    #[test]
    fn test_bencode_validator_rejects_truncated_dict() {
        let validator = BencodeValidator;
        assert!(!validator.is_valid(b"d8:announce20:http://tr"));
    }
}
