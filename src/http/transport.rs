//! Single HTTP exchange over the network

use crate::config::HttpMethod;
use crate::error::{BurlError, Result};
use crate::multimap::MultiMap;
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use url::Url;

/// Everything needed to perform one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: MultiMap,
    pub cookie_header: Option<String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

/// Status, headers and undecoded body of one exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: MultiMap,
    pub body: Vec<u8>,
}

/// Performs one HTTP exchange.
///
/// Implementations must send a body on PUT and PATCH exactly as on POST and
/// must expose every raw `Set-Cookie` header value. Any error returned is
/// treated as a transport-level failure by the retry loop.
pub trait Transport: Send + Sync {
    fn exchange(&self, exchange: &Exchange) -> Result<RawResponse>;
}

/// Blocking transport backed by `reqwest`
///
/// One client is kept per (timeout, redirect policy) combination.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    clients: Mutex<HashMap<(Duration, bool), Client>>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self, timeout: Duration, follow_redirects: bool) -> Result<Client> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(&(timeout, follow_redirects)) {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .redirect(if follow_redirects {
                reqwest::redirect::Policy::default()
            } else {
                reqwest::redirect::Policy::none()
            })
            .user_agent(format!("burl/{}", crate::VERSION))
            .build()
            .map_err(BurlError::transport)?;
        clients.insert((timeout, follow_redirects), client.clone());
        Ok(client)
    }
}

impl Transport for ReqwestTransport {
    fn exchange(&self, exchange: &Exchange) -> Result<RawResponse> {
        let client = self.client(exchange.timeout, exchange.follow_redirects)?;

        let mut request = client.request(to_reqwest_method(exchange.method), exchange.url.clone());
        for (name, value) in exchange.headers.pairs() {
            request = request.header(name, value);
        }
        if let Some(cookie_header) = &exchange.cookie_header {
            request = request.header(COOKIE, cookie_header.as_str());
        }
        if let Some(body) = &exchange.body {
            request = request.body(body.clone());
        }

        let response = request.send().map_err(BurlError::transport)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().map_err(BurlError::transport)?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Trace => Method::TRACE,
    }
}

/// Process-wide transport used by requests that do not configure one
pub fn default_transport() -> Arc<dyn Transport> {
    static DEFAULT: OnceLock<Arc<ReqwestTransport>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| Arc::new(ReqwestTransport::new()))
        .clone()
}
