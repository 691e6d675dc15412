//! Fluent request builder and the values derived from it

use crate::codec::Codec;
use crate::config::{HttpMethod, Policy};
use crate::error::{BurlError, Result};
use crate::http::attempt::ExchangeObserver;
use crate::http::auth::Auth;
use crate::http::response::ResponseState;
use crate::http::transport::Transport;
use crate::multimap::MultiMap;
use crate::runner::Runner;
use crate::utils::{Interrupt, UrlUtils};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::form_urlencoded;
use url::Url;

/// HTTP request builder and, once executed, its settled response.
///
/// Configuration methods consume and return the builder so calls chain:
///
/// ```no_run
/// use burl::Request;
///
/// # fn main() -> burl::Result<()> {
/// let html = Request::new()
///     .url("https://www.example.com/")?
///     .param("hl", "es")
///     .execute()?
///     .response_body()?
///     .to_string();
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Request {
    pub(crate) method: HttpMethod,
    pub(crate) url: Option<Url>,
    pub(crate) params: MultiMap,
    pub(crate) headers: MultiMap,
    pub(crate) cookies: MultiMap,
    pub(crate) body: Option<String>,
    pub(crate) policy: Policy,
    pub(crate) codec: Codec,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) runner: Option<Runner>,
    pub(crate) observers: Vec<Arc<dyn ExchangeObserver>>,
    pub(crate) interrupt: Interrupt,
    pub(crate) response: Option<ResponseState>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the target URL; fails immediately when it does not parse
    pub fn url(self, url: &str) -> Result<Self> {
        Ok(self.parsed_url(UrlUtils::validate_url(url)?))
    }

    pub fn parsed_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.add(key, value.to_string());
        self
    }

    pub fn params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in params {
            self.params.add(key, value.to_string());
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.add(name, value);
        self
    }

    /// Add an `Authorization: Basic ...` header
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        self.header("Authorization", Auth::basic_auth(username, password))
    }

    /// Add an `Authorization: Bearer ...` header
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", Auth::bearer_token(token))
    }

    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header("Content-Type", content_type)
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Encode `value` as the JSON body and mark the content type as JSON
    pub fn body_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body = self.codec.encode_json(value)?;
        Ok(self.body(body).content_type("application/json"))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.policy.timeout = timeout;
        self
    }

    /// Attempts made while the server answers 5xx, at least one
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts.max(1);
        self
    }

    pub fn attempt_delay(mut self, delay: Duration) -> Self {
        self.policy.attempt_delay = delay;
        self
    }

    pub fn throw_on_non_success(mut self, throw: bool) -> Self {
        self.policy.throw_on_non_success = throw;
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.policy.follow_redirects = follow;
        self
    }

    pub fn policy(mut self, mut policy: Policy) -> Self {
        policy.max_attempts = policy.max_attempts.max(1);
        self.policy = policy;
        self
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn runner(mut self, runner: Runner) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ExchangeObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Share an interrupt token; interrupting it aborts a pending retry delay
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Token that interrupts this request's retry delay
    pub fn interrupt_handle(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Fresh request carrying only the cookies of this one: the cookies it
    /// sent followed by the cookies it received.
    pub fn with_cookies(&self) -> Request {
        let mut next = Request::new();
        for (name, value) in self.cookies.pairs() {
            next.cookies.add(name, value);
        }
        if let Some(response) = &self.response {
            for cookie in response.cookies() {
                next.cookies.add(cookie.name(), cookie.value());
            }
        }
        next
    }

    pub fn method_ref(&self) -> &HttpMethod {
        &self.method
    }

    pub fn may_carry_body(&self) -> bool {
        self.method.may_carry_body()
    }

    pub fn get_url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn get_policy(&self) -> &Policy {
        &self.policy
    }

    pub fn request_params(&self) -> &MultiMap {
        &self.params
    }

    pub fn request_headers(&self) -> &MultiMap {
        &self.headers
    }

    pub fn request_headers_named(&self, name: &str) -> &[String] {
        self.headers.get(name)
    }

    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.headers.get_first(name)
    }

    pub fn request_cookies(&self) -> &MultiMap {
        &self.cookies
    }

    pub fn request_cookies_named(&self, name: &str) -> &[String] {
        self.cookies.get(name)
    }

    pub fn request_cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get_first(name)
    }

    pub fn request_body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn get_content_type(&self) -> Option<&str> {
        self.request_header("Content-Type")
    }

    /// Parameters as `application/x-www-form-urlencoded`, in insertion order
    pub fn encoded_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.pairs())
            .finish()
    }

    pub(crate) fn has_explicit_body(&self) -> bool {
        self.body.as_deref().is_some_and(|body| !body.is_empty())
    }

    /// The explicit body when non-empty, the encoded parameters otherwise
    pub fn effective_body(&self) -> String {
        match &self.body {
            Some(body) if !body.is_empty() => body.clone(),
            _ => self.encoded_query_string(),
        }
    }

    /// URL with the encoded parameters as its query.
    ///
    /// Parameters go to the URL when the method cannot carry a body. They are
    /// also added when an explicit body is set, so a POST with both a body
    /// and parameters sends the parameters in the query string. A POST, PUT
    /// or PATCH without an explicit body sends them as the body instead.
    ///
    /// A URL that already carries a query is used as given.
    pub fn url_with_params(&self) -> Result<Url> {
        let url = self
            .url
            .as_ref()
            .ok_or_else(|| BurlError::MalformedUrl("no URL configured".to_string()))?;
        if !self.may_carry_body() || self.has_explicit_body() {
            UrlUtils::append_query(url, &self.encoded_query_string())
        } else {
            Ok(url.clone())
        }
    }

    /// `name=value` pairs of every request cookie joined with `;`
    pub fn cookie_string(&self) -> String {
        self.cookies
            .pairs()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("cookies", &self.cookies)
            .field("body", &self.body)
            .field("policy", &self.policy)
            .field("codec", &self.codec)
            .field("observers", &self.observers.len())
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}
