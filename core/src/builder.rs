//! The capability shared by every request builder.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multimap::MultiMap;
use crate::transport;

pub const AUTHORIZATION: &str = "Authorization";

/// Anything that can turn its input into an `HttpRequest`.
///
/// Implementors provide the header map and the encoding logic; dispatch and
/// basic auth come for free.
pub trait RequestBuilder {
    /// Headers attached verbatim to every built request.
    fn header(&mut self) -> &mut MultiMap;

    /// Assemble a request for `method` against `url`.
    ///
    /// Takes `&self`: building never changes the builder, so the same
    /// builder can be built any number of times.
    fn build_request(&self, method: HttpMethod, url: &str) -> Result<HttpRequest>;

    /// Build and dispatch through the shared default transport.
    fn send(&self, method: HttpMethod, url: &str) -> Result<HttpResponse>
    where
        Self: Sized,
    {
        transport::send(self, method, url)
    }

    fn set_basic_auth(&mut self, username: &str, password: &str)
    where
        Self: Sized,
    {
        set_basic_auth(self, username, password)
    }
}

/// Set `Authorization: Basic ...` on the builder's headers, replacing any
/// earlier credential.
pub fn set_basic_auth<B: RequestBuilder + ?Sized>(builder: &mut B, username: &str, password: &str) {
    let token = BASE64_STANDARD.encode(format!("{username}:{password}"));
    builder.header().set(AUTHORIZATION, format!("Basic {token}"));
}
