use burl::{BurlError, Request};
use httpmock::Method::GET;
use httpmock::MockServer;
use std::time::{Duration, Instant};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[test]
fn test_retries_on_http_500() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/retry");
        then.status(500).body("try again");
    });

    let start = Instant::now();
    let request = Request::new()
        .url(&server.url("/retry"))
        .expect("valid url")
        .max_attempts(3)
        .attempt_delay(Duration::from_millis(25))
        .execute()
        .expect("request should settle");
    assert_eq!(request.response_code().expect("settled"), 500);
    assert_eq!(request.response_body().expect("settled"), "try again");
    assert!(start.elapsed() >= Duration::from_millis(50));

    mock.assert_hits(3);
}

#[test]
fn test_no_retry_on_http_404() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404).body("{\"error\": true}");
    });

    let request = Request::new()
        .url(&server.url("/missing"))
        .expect("valid url")
        .max_attempts(3)
        .execute()
        .expect("request should settle");
    assert_eq!(request.response_code().expect("settled"), 404);

    mock.assert_hits(1);
}

#[test]
fn test_throw_on_non_success_attaches_response() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404).body("{\"error\": true, \"errorDetails\": \"nope\"}");
    });

    let err = Request::new()
        .url(&server.url("/missing"))
        .expect("valid url")
        .throw_on_non_success(true)
        .execute()
        .expect_err("404 should raise");

    let failed = err.request().expect("settled request attached");
    assert_eq!(failed.response_code().expect("settled"), 404);
    let details = failed.response_json_map().expect("json body");
    assert_eq!(details["errorDetails"], "nope");
    assert!(matches!(err, BurlError::StatusCode(_)));
}

#[test]
fn test_connection_refused_is_fatal_after_last_attempt() {
    let port = match std::net::TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener.local_addr().expect("addr").port(),
        Err(_) => return,
    };

    let err = Request::new()
        .url(&format!("http://127.0.0.1:{}/", port))
        .expect("valid url")
        .max_attempts(2)
        .timeout(Duration::from_secs(2))
        .execute()
        .expect_err("nothing listens");
    assert!(matches!(err, BurlError::Transport(_)));
}
