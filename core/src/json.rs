//! JSON requests for arbitrary serializable payloads.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::builder::RequestBuilder;
use crate::error::{ApiError, Result};
use crate::http::{with_content_type, HttpMethod, HttpRequest, APPLICATION_JSON};
use crate::multimap::MultiMap;

/// Builder for requests whose body is a JSON document.
///
/// Without a payload the body is empty; `Content-Type` is always
/// `application/json`.
#[derive(Debug, Clone)]
pub struct JsonBuilder<T = serde_json::Value> {
    payload: Option<T>,
    header: MultiMap,
}

impl<T> Default for JsonBuilder<T> {
    fn default() -> Self {
        Self {
            payload: None,
            header: MultiMap::new(),
        }
    }
}

impl<T: Serialize> JsonBuilder<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload: Some(payload),
            header: MultiMap::new(),
        }
    }

    /// Replace the payload.
    pub fn set(&mut self, payload: T) -> &mut Self {
        self.payload = Some(payload);
        self
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }
}

impl<T: Serialize> RequestBuilder for JsonBuilder<T> {
    fn header(&mut self) -> &mut MultiMap {
        &mut self.header
    }

    fn build_request(&self, method: HttpMethod, url: &str) -> Result<HttpRequest> {
        let url = Url::parse(url).map_err(|source| ApiError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let body = match &self.payload {
            Some(payload) => serde_json::to_vec(payload)?,
            None => Vec::new(),
        };
        debug!(%method, url = %url, len = body.len(), "built json request");

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: with_content_type(&self.header, APPLICATION_JSON),
            body: Some(body),
        })
    }
}
