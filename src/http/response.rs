//! Settled response state and typed accessors

use crate::error::{BurlError, Result};
use crate::http::cookie::{parse_set_cookie, ResponseCookie};
use crate::http::request::Request;
use crate::http::transport::RawResponse;
use crate::multimap::MultiMap;
use crate::utils::decode_body_with_charset;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Status, headers, cookies and decoded body captured from one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseState {
    status: u16,
    headers: MultiMap,
    cookies: Vec<ResponseCookie>,
    body: String,
}

impl ResponseState {
    /// Decode the body and parse every `Set-Cookie` header of a raw response
    pub fn from_raw(raw: RawResponse) -> Self {
        let body = decode_body_with_charset(
            &raw.body,
            raw.headers.get_ignore_case("Content-Type").first().copied(),
        );
        let cookies = raw
            .headers
            .get_ignore_case("Set-Cookie")
            .into_iter()
            .filter(|value| !value.trim().is_empty())
            .filter_map(parse_set_cookie)
            .collect();

        Self {
            status: raw.status,
            headers: raw.headers,
            cookies,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only 5xx responses are retried
    pub fn is_retryable(&self) -> bool {
        (500..600).contains(&self.status)
    }

    pub fn headers(&self) -> &MultiMap {
        &self.headers
    }

    /// Values of the header `name`, matched case-insensitively
    pub fn headers_named(&self, name: &str) -> Vec<&str> {
        self.headers.get_ignore_case(name)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers_named(name).first().copied()
    }

    pub fn cookies(&self) -> &[ResponseCookie] {
        &self.cookies
    }

    pub fn cookies_named(&self, name: &str) -> Vec<&ResponseCookie> {
        self.cookies.iter().filter(|c| c.name() == name).collect()
    }

    pub fn cookie(&self, name: &str) -> Option<&ResponseCookie> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Request {
    /// Settled response, or `NotYetExecuted` while the request is pending
    pub fn response(&self) -> Result<&ResponseState> {
        self.response.as_ref().ok_or(BurlError::NotYetExecuted)
    }

    pub fn is_settled(&self) -> bool {
        self.response.is_some()
    }

    pub fn response_code(&self) -> Result<u16> {
        Ok(self.response()?.status())
    }

    pub fn response_body(&self) -> Result<&str> {
        Ok(self.response()?.body())
    }

    pub fn response_headers(&self) -> Result<&MultiMap> {
        Ok(self.response()?.headers())
    }

    pub fn response_headers_named(&self, name: &str) -> Result<Vec<&str>> {
        Ok(self.response()?.headers_named(name))
    }

    pub fn response_header(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.response()?.header(name))
    }

    pub fn response_cookies(&self) -> Result<&[ResponseCookie]> {
        Ok(self.response()?.cookies())
    }

    pub fn response_cookies_named(&self, name: &str) -> Result<Vec<&ResponseCookie>> {
        Ok(self.response()?.cookies_named(name))
    }

    pub fn response_cookie(&self, name: &str) -> Result<Option<&ResponseCookie>> {
        Ok(self.response()?.cookie(name))
    }

    /// Decode the body as JSON into `T`
    pub fn response_json<T: DeserializeOwned>(&self) -> Result<T> {
        self.codec.decode_json(self.response_body()?)
    }

    pub fn response_json_map(&self) -> Result<Map<String, Value>> {
        self.codec.decode_json_map(self.response_body()?)
    }

    pub fn response_json_list<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.codec.decode_json_list(self.response_body()?)
    }

    pub fn response_xml<T: DeserializeOwned>(&self) -> Result<T> {
        self.codec.decode_xml(self.response_body()?)
    }
}
