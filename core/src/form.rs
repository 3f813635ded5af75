//! Form requests: url-encoded, multipart, or query string for GET.
//!
//! # Design
//! The encoding follows from the input. GET carries fields in the query
//! string and never has a body; files attached to a GET builder are
//! ignored. Any other verb sends url-encoded fields unless at least one file
//! is attached, in which case everything goes out as `multipart/form-data`.
//!
//! Files are re-read from disk on every build. Each handle lives only for
//! the copy of its own part and is closed on every exit path, including a
//! failed copy.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, trace};
use url::Url;

use crate::builder::RequestBuilder;
use crate::error::{ApiError, Result};
use crate::http::{with_content_type, HttpMethod, HttpRequest, FORM_URLENCODED};
use crate::multimap::MultiMap;
use crate::multipart::MultipartWriter;

/// Builder for form submissions with optional file uploads.
///
/// ```no_run
/// use easyreq::{FormBuilder, HttpMethod, RequestBuilder};
///
/// let mut form = FormBuilder::new();
/// form.fields().add("Name", "John");
/// form.files().add("File", "test-files/logo.png");
/// let request = form.build_request(HttpMethod::Post, "http://example.com/postform")?;
/// # Ok::<(), easyreq::ApiError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    fields: MultiMap,
    files: MultiMap,
    header: MultiMap,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder prefilled with `fields` and `files` (field name to path).
    pub fn with_values(fields: MultiMap, files: MultiMap) -> Self {
        Self {
            fields,
            files,
            header: MultiMap::new(),
        }
    }

    /// Form fields, sent in the body or, for GET, in the query string.
    pub fn fields(&mut self) -> &mut MultiMap {
        &mut self.fields
    }

    /// Files to upload, keyed by field name, valued by filesystem path.
    pub fn files(&mut self) -> &mut MultiMap {
        &mut self.files
    }

    fn build_query(&self, mut url: Url) -> HttpRequest {
        if !self.fields.is_empty() {
            url.query_pairs_mut().extend_pairs(self.fields.pairs());
        }
        if !self.files.is_empty() {
            debug!(files = self.files.len(), "ignoring files on GET request");
        }
        debug!(url = %url, "built GET form request");
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: self.header.clone(),
            body: None,
        }
    }

    fn build_urlencoded(&self, method: HttpMethod, url: Url) -> HttpRequest {
        let body = self.fields.encode();
        debug!(%method, url = %url, len = body.len(), "built url-encoded form request");
        HttpRequest {
            method,
            url: url.into(),
            headers: with_content_type(&self.header, FORM_URLENCODED),
            body: Some(body.into_bytes()),
        }
    }

    fn build_multipart(&self, method: HttpMethod, url: Url) -> Result<HttpRequest> {
        let mut writer = MultipartWriter::new(Vec::new());

        for (field, path) in self.files.pairs() {
            write_file_part(&mut writer, field, Path::new(path))?;
        }

        for (field, value) in self.fields.pairs() {
            writer.write_field(field, value).map_err(ApiError::Body)?;
            trace!(field, "wrote multipart field");
        }

        let content_type = writer.content_type();
        let parts = writer.parts();
        let body = writer.finish().map_err(ApiError::Body)?;
        debug!(%method, url = %url, parts, len = body.len(), "built multipart form request");

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: with_content_type(&self.header, &content_type),
            body: Some(body),
        })
    }
}

/// Stream the file at `path` into a new part of `writer`.
fn write_file_part(writer: &mut MultipartWriter<Vec<u8>>, field: &str, path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| ApiError::open(path, e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());

    let part = writer.create_form_file(field, &file_name).map_err(ApiError::Body)?;
    let copied = io::copy(&mut file, part).map_err(|source| ApiError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    trace!(field, path = %path.display(), bytes = copied, "wrote multipart file");
    Ok(())
}

impl RequestBuilder for FormBuilder {
    fn header(&mut self) -> &mut MultiMap {
        &mut self.header
    }

    fn build_request(&self, method: HttpMethod, url: &str) -> Result<HttpRequest> {
        let parsed = Url::parse(url).map_err(|source| ApiError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        if method == HttpMethod::Get {
            Ok(self.build_query(parsed))
        } else if self.files.is_empty() {
            Ok(self.build_urlencoded(method, parsed))
        } else {
            self.build_multipart(method, parsed)
        }
    }
}
