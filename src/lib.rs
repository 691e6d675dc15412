//! burl - a fluent HTTP request builder
//!
//! A [`Request`] accumulates method, URL, parameters, headers, cookies and
//! body, performs the exchange with retries on server errors, and exposes
//! the settled response through typed accessors (raw body, JSON, XML,
//! headers, cookies, status). Any request can also be rendered as an
//! equivalent `curl` command for debugging.

pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod multimap;
pub mod runner;
pub mod utils;

pub use codec::Codec;
pub use config::{HttpMethod, Policy};
pub use error::{BurlError, Result};
pub use http::{ExchangeObserver, Request, ResponseCookie};
pub use multimap::MultiMap;
pub use runner::{Pending, Runner};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
