pub mod config;
pub mod fetcher;
pub mod fetchers;
pub mod testing;
pub mod transport;

pub use config::{load_config, load_config_from_str, Config, ConfigError, FetchConfig};
pub use fetcher::{
    select_fetcher, BencodeValidator, CaptchaSolver, Fetcher, FetcherError, LoginCapability,
    OptionSet, OptionSpec, OptionValue, OptionsError, Session, Torrent, TorrentDataValidator,
};
pub use transport::{
    build_client, HttpTransport, Method, RetryPolicy, Transport, TransportError, TransportRequest,
};
