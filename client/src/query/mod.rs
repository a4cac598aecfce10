//! Client-side query cache: keyed reads with staleness and retry, prefix
//! invalidation, optimistic single-record updates, and submission dedupe.

pub mod client;
pub mod inflight;
pub mod keys;
mod optimistic;

pub use client::{QueryClient, QueryOptions};
pub use inflight::{InFlight, InFlightGuard};
pub use keys::QueryKey;
