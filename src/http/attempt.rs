//! Retry loop driving the transport
//!
//! A request is attempted up to `max_attempts` times, strictly one after the
//! other. Only 5xx responses are retried; a transport failure is swallowed
//! on every attempt but the last. The last captured response becomes the
//! settled state.

use crate::error::{BurlError, Result};
use crate::http::request::Request;
use crate::http::response::ResponseState;
use crate::http::transport::{default_transport, Exchange};

/// Callbacks fired at the transitions of the retry loop.
///
/// Every method has an empty default, implement only what you need.
pub trait ExchangeObserver: Send + Sync {
    /// Once, before the first attempt
    fn before_exchange(&self, _request: &Request) {}

    fn before_attempt(&self, _request: &Request, _attempt: u32) {}

    /// After an attempt that produced a response
    fn after_attempt(&self, _request: &Request, _attempt: u32, _response: &ResponseState) {}

    /// Once, after the response settled
    fn after_exchange(&self, _request: &Request) {}
}

impl Request {
    /// Perform the exchange, retrying on 5xx, and return the settled request.
    ///
    /// Fails with `StatusCode` carrying the settled request when
    /// `throw_on_non_success` is set and the final status is not 2xx.
    pub fn execute(mut self) -> Result<Self> {
        if self.response.is_some() {
            return Err(BurlError::AlreadyExecuted);
        }

        let transport = self.transport.clone().unwrap_or_else(default_transport);
        let observers = self.observers.clone();
        let exchange = self.prepare_exchange()?;
        let max_attempts = self.policy.max_attempts.max(1);
        let delay = self.policy.attempt_delay;

        for observer in &observers {
            observer.before_exchange(&self);
        }

        let mut settled = None;
        for attempt in 1..=max_attempts {
            for observer in &observers {
                observer.before_attempt(&self, attempt);
            }
            log::debug!(
                "{} {} (attempt {}/{})",
                exchange.method,
                exchange.url,
                attempt,
                max_attempts
            );

            match transport.exchange(&exchange) {
                Ok(raw) => {
                    let state = ResponseState::from_raw(raw);
                    log::debug!("{} {} -> {}", exchange.method, exchange.url, state.status());
                    for observer in &observers {
                        observer.after_attempt(&self, attempt, &state);
                    }
                    let retryable = state.is_retryable();
                    settled = Some(state);
                    if !retryable {
                        break;
                    }
                    if attempt == max_attempts {
                        log::info!(
                            "Giving up on {} {} after {} attempts",
                            exchange.method,
                            exchange.url,
                            max_attempts
                        );
                    }
                }
                Err(err) if attempt < max_attempts => {
                    log::warn!(
                        "Attempt {}/{} for {} {} failed: {}",
                        attempt,
                        max_attempts,
                        exchange.method,
                        exchange.url,
                        err
                    );
                }
                Err(err) => return Err(err),
            }

            if attempt < max_attempts && !delay.is_zero() {
                self.interrupt.sleep(delay)?;
            }
        }

        // Every path out of the loop without a response returned early.
        let state = settled.ok_or(BurlError::NotYetExecuted)?;
        let success = state.is_success();
        self.response = Some(state);

        for observer in &observers {
            observer.after_exchange(&self);
        }

        if self.policy.throw_on_non_success && !success {
            return Err(BurlError::StatusCode(Box::new(self)));
        }
        Ok(self)
    }

    /// Method, target URL, merged headers, cookie header and body of every attempt
    pub fn prepare_exchange(&self) -> Result<Exchange> {
        let url = self.url_with_params()?;
        let mut headers = self.headers.clone();

        let body = if self.may_carry_body() {
            let body = self.effective_body().into_bytes();
            if headers.get_ignore_case("Content-Length").is_empty() {
                headers.add("Content-Length", body.len().to_string());
            }
            if headers.get_ignore_case("Connection").is_empty() {
                headers.add("Connection", "keep-alive");
            }
            Some(body)
        } else {
            None
        };

        let cookie_header = if self.cookies.is_empty() {
            None
        } else {
            Some(self.cookie_string())
        };

        Ok(Exchange {
            method: self.method,
            url,
            headers,
            cookie_header,
            body,
            timeout: self.policy.timeout,
            follow_redirects: self.policy.follow_redirects,
        })
    }
}
