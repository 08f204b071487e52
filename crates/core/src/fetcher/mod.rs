//! Fetcher plugin framework.
//!
//! A fetcher is one tracker integration composed from independent
//! capabilities: the base match/detect/fetch contract, an optional login
//! capability, an optional captcha-solving collaborator and a lazily
//! constructed HTTP session. Dispatch over an ordered list of fetchers is
//! first-match-wins.

mod login;
mod options;
mod session;
mod traits;
mod types;

pub use login::LoginCapability;
pub use options::{base_options, merge_option_sets, OptionSet, OptionSpec, OptionValue, OptionsError};
pub use session::Session;
pub use traits::{BencodeValidator, CaptchaSolver, Fetcher, TorrentDataValidator};
pub use types::{FetcherError, Torrent};

/// Return the first fetcher claiming to match the torrent, or `None` when no
/// known tracker handles it. Ordering is caller-significant: when two
/// fetchers could both match, the earlier one wins. Never errors.
pub fn select_fetcher<'a>(
    torrent: &Torrent,
    fetchers: &'a mut [Box<dyn Fetcher>],
) -> Option<&'a mut dyn Fetcher> {
    for fetcher in fetchers {
        if fetcher.is_matched_for(torrent) {
            return Some(&mut **fetcher);
        }
    }
    None
}
