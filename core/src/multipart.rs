//! Streaming `multipart/form-data` writer.
//!
//! Parts are written straight into the underlying `Write`; a file part hands
//! out the writer itself so file content can be copied in with `io::copy`
//! without an intermediate buffer.

use std::io::{self, Write};

use uuid::Uuid;

/// Generate a random boundary string for a multipart body.
pub(crate) fn gen_boundary() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Writes multipart parts separated by a generated boundary.
#[derive(Debug)]
pub struct MultipartWriter<W: Write> {
    inner: W,
    boundary: String,
    parts: usize,
}

impl<W: Write> MultipartWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            boundary: gen_boundary(),
            parts: 0,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Number of parts started so far.
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// `Content-Type` header value announcing this writer's boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Start a file part and return the writer its content goes to.
    ///
    /// Content must be written before the next part is started.
    pub fn create_form_file(&mut self, field: &str, file_name: &str) -> io::Result<&mut W> {
        let disposition = format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n",
            escape_quotes(field),
            escape_quotes(file_name),
        );
        self.begin_part(&disposition)?;
        Ok(&mut self.inner)
    }

    /// Write a complete text field part.
    pub fn write_field(&mut self, field: &str, value: &str) -> io::Result<()> {
        let disposition = format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n",
            escape_quotes(field)
        );
        self.begin_part(&disposition)?;
        self.inner.write_all(value.as_bytes())
    }

    /// Emit the closing boundary and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        write!(self.inner, "\r\n--{}--\r\n", self.boundary)?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn begin_part(&mut self, headers: &str) -> io::Result<()> {
        if self.parts > 0 {
            self.inner.write_all(b"\r\n")?;
        }
        write!(self.inner, "--{}\r\n{}\r\n", self.boundary, headers)?;
        self.parts += 1;
        Ok(())
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
