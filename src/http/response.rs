//! Fixed-capacity response builder.
//!
//! Collects a status line, a few headers and a short plain-text body.  The
//! transport retrieves the finished [`Response`] once per request and
//! renders it with [`Response::to_http`].

use core::fmt::Write;

use log::warn;

const MAX_STATUS: usize = 32;
const MAX_HEADERS: usize = 4;
const MAX_BODY: usize = 64;

/// A finished response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: heapless::String<MAX_STATUS>,
    headers: heapless::Vec<(&'static str, &'static str), MAX_HEADERS>,
    body: heapless::String<MAX_BODY>,
}

impl Response {
    /// `200 OK` with the permissive CORS header every prop route sends.
    pub fn ok() -> ResponseBuilder {
        ResponseBuilder::new("200 OK").header("Access-Control-Allow-Origin", "*")
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn header(&self, key: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|&(_, v)| v)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Render as an HTTP/1.1 response.
    pub fn to_http(&self) -> String {
        let mut out = String::with_capacity(64 + self.body.len());
        let _ = write!(out, "HTTP/1.1 {}\r\n", self.status);
        for (k, v) in &self.headers {
            let _ = write!(out, "{k}: {v}\r\n");
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
        out
    }
}

/// Incremental builder for a [`Response`].
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    inner: Response,
}

impl ResponseBuilder {
    pub fn new(status: &str) -> Self {
        let mut s = heapless::String::new();
        if s.push_str(status).is_err() {
            warn!("Response: status line truncated");
        }
        Self {
            inner: Response {
                status: s,
                headers: heapless::Vec::new(),
                body: heapless::String::new(),
            },
        }
    }

    /// Add a header.  Extra headers beyond capacity are dropped.
    pub fn header(mut self, key: &'static str, value: &'static str) -> Self {
        if self.inner.headers.push((key, value)).is_err() {
            warn!("Response: header {} dropped", key);
        }
        self
    }

    /// Replace the body with formatted text, truncated at capacity.
    pub fn body(mut self, args: core::fmt::Arguments<'_>) -> Self {
        self.inner.body.clear();
        if self.inner.body.write_fmt(args).is_err() {
            warn!("Response: body truncated");
        }
        self
    }

    pub fn finish(self) -> Response {
        self.inner
    }
}
