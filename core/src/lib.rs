//! Build HTTP requests from form fields, files or JSON payloads.
//!
//! # Overview
//! Callers fill a builder and ask it for a request; the builder picks the
//! body encoding and `Content-Type` from the shape of the input:
//!
//! - `FormBuilder` with GET: fields merged into the URL query, no body.
//! - `FormBuilder` without files: `application/x-www-form-urlencoded`.
//! - `FormBuilder` with files: `multipart/form-data`, files streamed from
//!   disk.
//! - `JsonBuilder`: `application/json`.
//!
//! # Design
//! - Builders produce `HttpRequest` plain data and never do network I/O
//!   themselves; a `Transport` executes requests, with a shared `ureq`
//!   agent as the default.
//! - Both builders implement `RequestBuilder`, so dispatch (`send`) and
//!   basic auth work the same for either.
//! - Building takes `&self` and re-reads files each time; a builder can be
//!   built repeatedly without changing it.

pub mod builder;
pub mod error;
pub mod form;
pub mod http;
pub mod json;
pub mod multimap;
pub mod multipart;
pub mod transport;

pub use builder::{set_basic_auth, RequestBuilder};
pub use error::{ApiError, Result};
pub use form::FormBuilder;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use json::JsonBuilder;
pub use multimap::MultiMap;
pub use multipart::MultipartWriter;
pub use transport::{default_agent, send, send_with, Transport};
