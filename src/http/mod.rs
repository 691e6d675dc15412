//! HTTP request/response lifecycle
//!
//! [`Request`] accumulates method, URL, parameters, headers, cookies and
//! body, then drives a [`transport::Transport`] through the retry loop and
//! keeps the settled [`response::ResponseState`].

pub mod attempt;
pub mod auth;
pub mod cookie;
pub mod curl;
pub mod request;
pub mod response;
pub mod transport;

pub use attempt::ExchangeObserver;
pub use cookie::ResponseCookie;
pub use request::Request;
pub use response::ResponseState;
pub use transport::{Exchange, RawResponse, ReqwestTransport, Transport};
