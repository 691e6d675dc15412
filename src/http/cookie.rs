//! Parsing of `Set-Cookie` response headers

use std::fmt;

/// Cookie received in a `Set-Cookie` response header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookie {
    name: String,
    value: String,
    attributes: Vec<(String, Option<String>)>,
}

impl ResponseCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Attributes in the order they appeared, flags carry no value
    pub fn attributes(&self) -> &[(String, Option<String>)] {
        &self.attributes
    }

    /// Value of the first attribute named `name` (case-insensitive)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    pub fn domain(&self) -> Option<&str> {
        self.attribute("Domain")
    }

    pub fn path(&self) -> Option<&str> {
        self.attribute("Path")
    }

    pub fn expires(&self) -> Option<&str> {
        self.attribute("Expires")
    }

    pub fn max_age(&self) -> Option<i64> {
        self.attribute("Max-Age")?.parse().ok()
    }

    pub fn secure(&self) -> bool {
        self.has_attribute("Secure")
    }

    pub fn http_only(&self) -> bool {
        self.has_attribute("HttpOnly")
    }
}

impl fmt::Display for ResponseCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

const FLAG_ATTRIBUTES: [&str; 2] = ["Secure", "HttpOnly"];

#[derive(Debug)]
struct Malformed(&'static str);

/// Parse one `Set-Cookie` header value.
///
/// A header that does not parse is retried once with every segment lacking
/// an `=` removed. Returns `None` when even that fails.
pub fn parse_set_cookie(header: &str) -> Option<ResponseCookie> {
    match parse_strict(header) {
        Ok(cookie) => Some(cookie),
        Err(Malformed(reason)) => {
            let cleaned = strip_bare_segments(header);
            match parse_strict(&cleaned) {
                Ok(cookie) => {
                    log::debug!("Recovered malformed Set-Cookie ({}): {}", reason, header);
                    Some(cookie)
                }
                Err(Malformed(reason)) => {
                    log::warn!("Ignoring unparseable Set-Cookie ({}): {}", reason, header);
                    None
                }
            }
        }
    }
}

fn parse_strict(header: &str) -> Result<ResponseCookie, Malformed> {
    let mut segments = header
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty());

    let pair = segments.next().ok_or(Malformed("empty header"))?;
    let (name, value) = pair
        .split_once('=')
        .ok_or(Malformed("missing name-value pair"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Malformed("empty cookie name"));
    }

    let mut cookie = ResponseCookie::new(name, value.trim());
    for segment in segments {
        match segment.split_once('=') {
            Some((key, value)) => cookie
                .attributes
                .push((key.trim().to_string(), Some(value.trim().to_string()))),
            None if FLAG_ATTRIBUTES
                .iter()
                .any(|flag| flag.eq_ignore_ascii_case(segment)) =>
            {
                cookie.attributes.push((segment.to_string(), None))
            }
            None => return Err(Malformed("unknown attribute without value")),
        }
    }
    Ok(cookie)
}

fn strip_bare_segments(header: &str) -> String {
    header
        .split(';')
        .filter(|segment| segment.contains('='))
        .collect::<Vec<_>>()
        .join(";")
}
