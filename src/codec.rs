//! Body encoding and decoding
//!
//! JSON goes through `serde_json`. In lenient mode a body that strict JSON
//! rejects is re-read with `json5`, which accepts single quotes, comments,
//! unquoted field names and trailing commas. Numbers written with leading
//! zeros are normalised before that second read. XML goes through `quick-xml`.

use crate::error::{BurlError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::type_name;
use std::borrow::Cow;

/// JSON grammar accepted when decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonGrammar {
    Strict,
    #[default]
    Lenient,
}

/// Codec used to encode request bodies and decode response bodies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    grammar: JsonGrammar,
}

impl Codec {
    pub fn new(grammar: JsonGrammar) -> Self {
        Self { grammar }
    }

    pub fn strict() -> Self {
        Self::new(JsonGrammar::Strict)
    }

    pub fn lenient() -> Self {
        Self::new(JsonGrammar::Lenient)
    }

    pub fn grammar(&self) -> JsonGrammar {
        self.grammar
    }

    /// Decode a JSON document into `T`
    pub fn decode_json<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        match serde_json::from_str(body) {
            Ok(value) => Ok(value),
            Err(strict_err) => match self.grammar {
                JsonGrammar::Strict => Err(decode_error::<T>(strict_err)),
                JsonGrammar::Lenient => {
                    json5::from_str(&strip_leading_zeros(body)).map_err(|lenient_err| {
                        log::debug!("Strict JSON parse failed: {}", strict_err);
                        decode_error::<T>(lenient_err)
                    })
                }
            },
        }
    }

    /// Decode a JSON object into a map of arbitrary values
    pub fn decode_json_map(&self, body: &str) -> Result<Map<String, Value>> {
        self.decode_json(body)
    }

    pub fn decode_json_list<T: DeserializeOwned>(&self, body: &str) -> Result<Vec<T>> {
        self.decode_json(body)
    }

    pub fn decode_xml<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        quick_xml::de::from_str(body).map_err(decode_error::<T>)
    }

    pub fn encode_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| BurlError::Encode(e.to_string()))
    }
}

/// Drop redundant leading zeros from numbers outside string literals,
/// so `007` reads as `7` and `00.5` as `0.5`
fn strip_leading_zeros(body: &str) -> Cow<'_, str> {
    let bytes = body.as_bytes();
    let mut out: Option<String> = None;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if b == b'"' || b == b'\'' {
            quote = Some(b);
            i += 1;
            continue;
        }
        if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            i = body[i..].find('\n').map_or(bytes.len(), |n| i + n);
            continue;
        }
        if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = body[i + 2..].find("*/").map_or(bytes.len(), |n| i + n + 4);
            continue;
        }

        let starts_token = i == 0 || {
            let prev = bytes[i - 1];
            !(prev.is_ascii_alphanumeric() || prev == b'_' || prev == b'.' || prev == b'$')
        };
        if b == b'0' && starts_token {
            let mut end = i;
            while end + 1 < bytes.len() && bytes[end] == b'0' && bytes[end + 1].is_ascii_digit()
            {
                end += 1;
            }
            if end > i {
                let buf = out.get_or_insert_with(|| String::with_capacity(body.len()));
                buf.push_str(&body[copied..i]);
                copied = end;
                i = end;
                continue;
            }
        }
        i += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&body[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(body),
    }
}

fn decode_error<T>(err: impl std::fmt::Display) -> BurlError {
    BurlError::Decode {
        target: type_name::<T>(),
        message: err.to_string(),
    }
}
