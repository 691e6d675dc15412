//! Rendering a request as an equivalent `curl` command line

use crate::http::request::Request;

impl Request {
    /// Shell command reproducing this request with `curl`.
    ///
    /// Only meant for logs and debugging, nothing here is executed. A request
    /// without a URL renders an empty `''` target instead of failing;
    /// executing it reports [`BurlError::MalformedUrl`].
    ///
    /// [`BurlError::MalformedUrl`]: crate::error::BurlError::MalformedUrl
    pub fn to_curl(&self) -> String {
        let mut command = format!("curl -X {}", self.method_ref());

        if self.get_policy().follow_redirects {
            command.push_str(" -L");
        }

        if !self.request_cookies().is_empty() {
            command.push_str(&format!(" --cookie \"{}\"", self.cookie_string()));
        }

        for (name, value) in self.request_headers().pairs() {
            command.push_str(&format!(" -H \"{}: {}\"", name, value));
        }

        let url = if self.may_carry_body() {
            let body = self.effective_body();
            if !body.is_empty() {
                command.push_str(&format!(" --data {}", shell_quote(&body)));
            }
            if self.has_explicit_body() {
                self.get_url().map(|url| url.to_string())
            } else {
                self.url_with_params().ok().map(|url| url.to_string())
            }
        } else {
            self.url_with_params().ok().map(|url| url.to_string())
        };
        command.push(' ');
        command.push_str(&shell_quote(url.as_deref().unwrap_or_default()));

        command
    }
}

/// Wrap in single quotes, escaping embedded single quotes as `'\''`
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::shell_quote;
    use crate::config::HttpMethod;
    use crate::http::request::Request;

    fn request(url: &str) -> Request {
        Request::new().url(url).expect("valid url")
    }

    #[test]
    fn get_with_cookies_and_redirects() {
        let curl = request("http://x/")
            .follow_redirects(true)
            .cookie("a", "1")
            .cookie("b", "2")
            .to_curl();
        assert_eq!(curl, r#"curl -X GET -L --cookie "a=1;b=2" 'http://x/'"#);
    }

    #[test]
    fn get_renders_headers_and_params_in_url() {
        let curl = request("http://x/search")
            .follow_redirects(false)
            .header("Accept", "text/html")
            .header("X-Trace", "1")
            .param("q", "rust lang")
            .to_curl();
        assert_eq!(
            curl,
            r#"curl -X GET -H "Accept: text/html" -H "X-Trace: 1" 'http://x/search?q=rust+lang'"#
        );
    }

    #[test]
    fn post_params_render_as_data_against_bare_url() {
        let curl = request("http://x/form")
            .method(HttpMethod::Post)
            .follow_redirects(false)
            .param("x", "y")
            .to_curl();
        assert_eq!(curl, "curl -X POST --data 'x=y' 'http://x/form'");
    }

    #[test]
    fn post_with_explicit_body_uses_url_without_params() {
        let curl = request("http://x/api")
            .method(HttpMethod::Put)
            .follow_redirects(false)
            .param("v", "2")
            .body("it's json")
            .to_curl();
        assert_eq!(
            curl,
            r#"curl -X PUT --data 'it'\''s json' 'http://x/api'"#
        );
    }

    #[test]
    fn delete_omits_data_even_with_body() {
        let curl = request("http://x/item")
            .method(HttpMethod::Delete)
            .follow_redirects(false)
            .body("ignored")
            .to_curl();
        assert!(!curl.contains("--data"));
        assert!(curl.ends_with("'http://x/item'"));
    }

    #[test]
    fn quote_escapes_single_quotes() {
        assert_eq!(shell_quote("a'b"), r"'a'\''b'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn missing_url_renders_empty_target() {
        assert_eq!(Request::new().to_curl(), "curl -X GET -L ''");
    }
}
