//! HTTP request and response types as plain data.
//!
//! # Design
//! Builders produce `HttpRequest` values without touching the network; a
//! `Transport` executes them and hands back an `HttpResponse`. Both sides
//! use owned types so a request can be inspected, stored or sent to another
//! thread before dispatch.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::multimap::MultiMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [HttpMethod; 7] = [
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
            HttpMethod::Options,
        ];
        ALL.into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ApiError::UnknownMethod(s.to_string()))
    }
}

/// An HTTP request described as plain data.
///
/// Produced fresh by every `RequestBuilder::build_request` call. `body` is
/// `None` only for GET, where fields travel in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: MultiMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First value of header `name`, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header_value(CONTENT_TYPE)
    }
}

/// Copy of `headers` with any existing Content-Type, in any letter case,
/// replaced by `content_type`.
pub(crate) fn with_content_type(headers: &MultiMap, content_type: &str) -> MultiMap {
    let mut headers = headers.clone();
    headers.retain(|key| !key.eq_ignore_ascii_case(CONTENT_TYPE));
    headers.set(CONTENT_TYPE, content_type);
    headers
}

/// An HTTP response described as plain data.
///
/// Returned by a `Transport`. Status codes are not interpreted: a 404 is a
/// response like any other.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: MultiMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
