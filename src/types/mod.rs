//! 类型模块：定义请求、响应快照等核心数据类型。
//!
//! # Types Module
//!
//! Request and response descriptors exchanged between the host, the network
//! capability and the cache store.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Request`] | Intercepted request descriptor (method, URL, mode, headers) |
//! | [`RequestMode`] | Request mode; only [`RequestMode::Navigate`] changes routing |
//! | [`Response`] | Response snapshot (status, headers, body) |
//!
//! ## Example
//!
//! ```rust
//! use offline_worker::types::{Request, Response};
//! use reqwest::StatusCode;
//!
//! let page = Request::navigate("/about");
//! assert!(page.is_navigation());
//!
//! let notice = Response::html(StatusCode::SERVICE_UNAVAILABLE, "<p>offline</p>");
//! assert_eq!(notice.content_type(), Some("text/html; charset=utf-8"));
//! ```

pub mod request;
pub mod response;

pub use request::{Request, RequestMode};
pub use response::Response;
