//! Utility functions and helpers

use crate::error::{BurlError, Result};
use encoding_rs::{Encoding, UTF_8};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};
use url::Url;

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Parse an absolute http(s) URL
    pub fn validate_url(input: &str) -> Result<Url> {
        let url = Url::parse(input.trim())
            .map_err(|e| BurlError::MalformedUrl(format!("Invalid URL '{}': {}", input, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BurlError::MalformedUrl(format!(
                "Invalid URL '{}': unsupported scheme '{}'",
                input, other
            ))),
        }
    }

    /// Append an already-encoded query string to a URL without one.
    ///
    /// A URL that already carries a query component is returned unchanged.
    pub fn append_query(url: &Url, query: &str) -> Result<Url> {
        if query.is_empty() || url.query().is_some() {
            return Ok(url.clone());
        }
        let joined = format!("{}?{}", url, query);
        Url::parse(&joined)
            .map_err(|e| BurlError::MalformedUrl(format!("Invalid URL '{}': {}", joined, e)))
    }
}

/// Extract the `charset` parameter from a Content-Type value
pub fn extract_charset(content_type: Option<&str>) -> Option<String> {
    content_type?.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Decode a response body using the declared charset, UTF-8 otherwise
pub fn decode_body_with_charset(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = extract_charset(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (decoded, _, had_errors) = encoding.decode(body);
    if had_errors {
        log::debug!("Response body contained invalid {} sequences", encoding.name());
    }
    decoded.into_owned()
}

/// Cloneable handle used to interrupt a blocking wait between attempts.
///
/// Once interrupted, the token stays interrupted; every later wait fails
/// immediately.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake every thread blocked in [`Interrupt::sleep`]
    pub fn interrupt(&self) {
        let (flag, signal) = &*self.state;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        signal.notify_all();
    }

    pub fn is_interrupted(&self) -> bool {
        *self.state.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block the calling thread for `duration` unless interrupted first.
    ///
    /// A duration too large to represent as a deadline waits until interrupted.
    pub fn sleep(&self, duration: Duration) -> Result<()> {
        let (flag, signal) = &*self.state;
        let mut interrupted = flag.lock().unwrap_or_else(PoisonError::into_inner);
        if *interrupted {
            return Err(BurlError::InterruptedWait);
        }
        let deadline = Instant::now().checked_add(duration);
        loop {
            if *interrupted {
                return Err(BurlError::InterruptedWait);
            }
            interrupted = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    signal
                        .wait_timeout(interrupted, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => signal
                    .wait(interrupted)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

#[cfg(test)]
mod tests;
