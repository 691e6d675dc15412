use super::{decode_body_with_charset, extract_charset, Interrupt, UrlUtils};
use crate::error::BurlError;
use encoding_rs::WINDOWS_1252;
use std::thread;
use std::time::{Duration, Instant};
use url::Url;

#[test]
fn validate_url_accepts_https() {
    let url = UrlUtils::validate_url("https://example.com/path").expect("valid url");
    assert_eq!(url.scheme(), "https");
    assert_eq!(url.path(), "/path");
}

#[test]
fn validate_url_rejects_relative_and_foreign_schemes() {
    let err = UrlUtils::validate_url("example.com").expect_err("relative url");
    assert!(matches!(err, BurlError::MalformedUrl(_)));

    let err = UrlUtils::validate_url("ftp://example.com/file").expect_err("ftp url");
    assert!(matches!(err, BurlError::MalformedUrl(m) if m.contains("ftp")));
}

#[test]
fn append_query_only_fills_a_missing_query() {
    let bare = Url::parse("http://x/path").expect("valid url");
    assert_eq!(
        UrlUtils::append_query(&bare, "a=1").expect("joined").as_str(),
        "http://x/path?a=1"
    );

    let queried = Url::parse("http://x/path?z=0").expect("valid url");
    assert_eq!(
        UrlUtils::append_query(&queried, "a=1").expect("unchanged").as_str(),
        "http://x/path?z=0"
    );

    let empty_query = Url::parse("http://x/path?").expect("valid url");
    assert_eq!(
        UrlUtils::append_query(&empty_query, "a=1").expect("unchanged"),
        empty_query
    );

    assert_eq!(UrlUtils::append_query(&bare, "").expect("unchanged"), bare);
}

#[test]
fn extract_charset_parses_case_insensitive() {
    assert_eq!(
        extract_charset(Some("text/plain; charset=utf-8")),
        Some("utf-8".to_string())
    );
    assert_eq!(
        extract_charset(Some("text/plain; CHARSET=\"iso-8859-1\"")),
        Some("iso-8859-1".to_string())
    );
    assert_eq!(extract_charset(Some("text/plain")), None);
    assert_eq!(extract_charset(None), None);
}

#[test]
fn decode_body_with_charset_uses_declared_encoding() {
    let (encoded, _, _) = WINDOWS_1252.encode("\u{00A3}");
    let decoded = decode_body_with_charset(&encoded, Some("text/plain; charset=windows-1252"));
    assert_eq!(decoded, "\u{00A3}");
}

#[test]
fn decode_body_with_charset_falls_back_to_utf8() {
    let body = [0xE3, 0x81, 0x82]; // "あ" in UTF-8
    assert_eq!(
        decode_body_with_charset(&body, Some("text/plain; charset=unknown")),
        "あ"
    );
    assert_eq!(decode_body_with_charset(&body, None), "あ");
}

#[test]
fn sleep_waits_for_the_full_duration() {
    let interrupt = Interrupt::new();
    let start = Instant::now();
    interrupt
        .sleep(Duration::from_millis(30))
        .expect("uninterrupted sleep");
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn interrupt_wakes_a_sleeping_thread() {
    let interrupt = Interrupt::new();
    let remote = interrupt.clone();
    let waker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        remote.interrupt();
    });

    let start = Instant::now();
    let err = interrupt
        .sleep(Duration::from_secs(30))
        .expect_err("interrupted sleep");
    assert!(matches!(err, BurlError::InterruptedWait));
    assert!(start.elapsed() < Duration::from_secs(30));
    assert!(interrupt.is_interrupted());
    waker.join().expect("waker thread");
}

#[test]
fn unrepresentable_deadline_waits_until_interrupted() {
    let interrupt = Interrupt::new();
    let remote = interrupt.clone();
    let waker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        remote.interrupt();
    });

    let err = interrupt.sleep(Duration::MAX).expect_err("interrupted sleep");
    assert!(matches!(err, BurlError::InterruptedWait));
    waker.join().expect("waker thread");

    let err = interrupt.sleep(Duration::MAX).expect_err("already interrupted");
    assert!(matches!(err, BurlError::InterruptedWait));
}
