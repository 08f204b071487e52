//! Concrete tracker integrations.

mod rutracker;

pub use rutracker::RutrackerFetcher;
