//! Executing built requests.
//!
//! # Design
//! `Transport` is the seam between request assembly and the network. The
//! crate ships an implementation for `ureq::Agent`; `send` uses a shared
//! agent created on first use, `send_with` takes any transport. A build
//! failure returns before the transport is touched.
//!
//! The default agent has `http_status_as_error` disabled so 4xx/5xx
//! responses come back as `HttpResponse` values rather than `Err`.
//!
//! On the wire `Host` always comes from the request URL. A `Host` entry in
//! the built request's headers stays visible on the `HttpRequest` but is not
//! sent.

use std::sync::OnceLock;

use tracing::debug;
use ureq::http as wire;

use crate::builder::RequestBuilder;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multimap::MultiMap;

const HOST: &str = "Host";

/// Executes an `HttpRequest` and returns the raw response.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl Transport for ureq::Agent {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = wire::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in request.headers.pairs() {
            if name.eq_ignore_ascii_case(HOST) {
                continue;
            }
            builder = builder.header(name, value);
        }

        // Empty bodies go out as no body, which every method accepts.
        let response = match request.body.filter(|body| !body.is_empty()) {
            Some(body) => self.run(builder.body(body).map_err(invalid_request)?)?,
            None => self.run(builder.body(()).map_err(invalid_request)?)?,
        };

        let (parts, mut body) = response.into_parts();
        let mut headers = MultiMap::new();
        for (name, value) in parts.headers.iter() {
            headers.add(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        let body = body.read_to_vec()?;
        debug!(status = parts.status.as_u16(), len = body.len(), "received response");

        Ok(HttpResponse {
            status: parts.status.as_u16(),
            headers,
            body,
        })
    }
}

fn invalid_request(err: wire::Error) -> ApiError {
    ApiError::InvalidRequest(err.to_string())
}

/// The agent shared by every `send` call.
pub fn default_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent()
    })
}

/// Build a request from `builder` and execute it on the default agent.
pub fn send<B: RequestBuilder + ?Sized>(builder: &B, method: HttpMethod, url: &str) -> Result<HttpResponse> {
    send_with(default_agent(), builder, method, url)
}

/// Build a request from `builder` and execute it on `transport`.
pub fn send_with<T, B>(transport: &T, builder: &B, method: HttpMethod, url: &str) -> Result<HttpResponse>
where
    T: Transport + ?Sized,
    B: RequestBuilder + ?Sized,
{
    let request = builder.build_request(method, url)?;
    debug!(%method, url = %request.url, "dispatching request");
    transport.execute(request)
}
