//! Configuration management for burl

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::BurlError;

/// HTTP method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Whether requests with this method are expected to send an entity body.
    /// Namely POST, PUT and PATCH.
    pub fn may_carry_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = BurlError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "PATCH" => Ok(HttpMethod::Patch),
            "TRACE" => Ok(HttpMethod::Trace),
            _ => Err(BurlError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Execution policy applied to every exchange of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Applied separately to connection establishment and to the response read.
    pub timeout: Duration,
    pub max_attempts: u32,
    pub attempt_delay: Duration,
    pub follow_redirects: bool,
    pub throw_on_non_success: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            timeout: Duration::from_secs(60),
            max_attempts: 1,
            attempt_delay: Duration::ZERO,
            follow_redirects: true,
            throw_on_non_success: false,
        }
    }
}

/// Background worker pool configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Upper bound on requests executing at the same time.
    pub workers: usize,
    pub thread_name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            workers: 100,
            thread_name: "burl-worker".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpMethod, Policy};
    use crate::error::BurlError;
    use std::time::Duration;

    #[test]
    fn parse_method_is_case_insensitive() {
        assert_eq!("patch".parse::<HttpMethod>().expect("method"), HttpMethod::Patch);
        assert_eq!("Get".parse::<HttpMethod>().expect("method"), HttpMethod::Get);

        let err = "BREW".parse::<HttpMethod>().expect_err("unknown method");
        assert!(matches!(err, BurlError::UnsupportedMethod(m) if m == "BREW"));
    }

    #[test]
    fn only_post_put_patch_carry_a_body() {
        let carrying: Vec<_> = [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Head,
            HttpMethod::Options,
            HttpMethod::Patch,
            HttpMethod::Trace,
        ]
        .into_iter()
        .filter(|m| m.may_carry_body())
        .collect();
        assert_eq!(
            carrying,
            vec![HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch]
        );
    }

    #[test]
    fn default_policy_matches_documented_values() {
        let policy = Policy::default();
        assert_eq!(policy.timeout, Duration::from_secs(60));
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.attempt_delay, Duration::ZERO);
        assert!(policy.follow_redirects);
        assert!(!policy.throw_on_non_success);
    }
}
