//! Per-request dispatch state.
//!
//! A [`Context`] is created fresh for every request and owned by the task
//! handling it. It carries the request data, the captured route parameters,
//! the resolved handler chain with its cursor, and the response being built.

use std::fmt;

use axum::{body::Body, body::Bytes, response::Response};
use http::{
    HeaderMap, HeaderValue, Method, StatusCode,
    header::{self, AsHeaderName, HeaderName},
    request::Parts,
};
use percent_encoding::percent_decode_str;
use serde::Serialize;

use super::handler::{Handler, HandlerFunc};
use crate::{Error, routing::Params};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

pub struct Context {
    // request
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
    matched_pattern: Option<String>,

    // chain
    handlers: Vec<HandlerFunc>,
    cursor: usize,
    aborted: bool,

    // response
    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Vec<u8>,
}

impl Context {
    /// Creates a context for `method` and a request target such as
    /// `/search?q=rust`. The query string, if any, is split off the path.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };
        Self::with_target(method, path.to_owned(), query)
    }

    /// Creates a context from the head of an HTTP request and its buffered body.
    ///
    /// The path is percent-decoded once here, before routing, so `%2F` becomes
    /// a separator and invalid UTF-8 is replaced with U+FFFD.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        let path = percent_decode_str(parts.uri.path())
            .decode_utf8_lossy()
            .into_owned();
        let query = parts.uri.query().map(str::to_owned);
        let mut ctx = Self::with_target(parts.method, path, query);
        ctx.headers = parts.headers;
        ctx.body = body;
        ctx
    }

    fn with_target(method: Method, path: String, query: Option<String>) -> Self {
        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::new(),
            matched_pattern: None,
            handlers: Vec::new(),
            cursor: 0,
            aborted: false,
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Vec::new(),
        }
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replaces the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn bind_chain(
        &mut self,
        handlers: Vec<HandlerFunc>,
        params: Params,
        matched_pattern: Option<String>,
    ) {
        self.handlers = handlers;
        self.params = params;
        self.matched_pattern = matched_pattern;
        self.cursor = 0;
        self.aborted = false;
    }

    // ========================================================================
    // Chain control
    // ========================================================================

    /// Runs the next handler in the chain, if any.
    ///
    /// Exactly one handler runs per call; it decides for itself whether to
    /// call `next` again. Work placed after `ctx.next()` runs once the rest of
    /// the chain has returned.
    pub fn next(&mut self) {
        if let Some(handler) = self.handlers.get(self.cursor).cloned() {
            self.cursor += 1;
            handler.call(self);
        }
    }

    /// Skips every handler that has not run yet.
    pub fn abort(&mut self) {
        self.cursor = self.handlers.len();
        self.aborted = true;
    }

    /// Whether [`abort`](Self::abort) or [`fail`](Self::fail) was called for this chain.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Number of handlers in the resolved chain.
    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    // ========================================================================
    // Request accessors
    // ========================================================================

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Captured value for a `:name` or `*name` segment.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The registered pattern that matched this request, if any.
    pub fn matched_pattern(&self) -> Option<&str> {
        self.matched_pattern.as_deref()
    }

    /// First value of `key` in the query string, percent-decoded.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }

    /// First value of `key` in an `application/x-www-form-urlencoded` body.
    pub fn post_form(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(&self.body)
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    }

    /// Request header value, if present and valid UTF-8.
    pub fn header(&self, name: impl AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    // ========================================================================
    // Response writers
    // ========================================================================

    pub fn status(&mut self, code: StatusCode) {
        self.status = code;
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.insert(name, value);
    }

    /// Writes a plain text response.
    pub fn string(&mut self, code: StatusCode, body: impl Into<String>) {
        self.write(code, TEXT_PLAIN, body.into().into_bytes());
    }

    /// Writes `value` as a JSON response. Serialization failures become the
    /// JSON error response of an internal [`Error`].
    pub fn json<T: Serialize + ?Sized>(&mut self, code: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.write(code, APPLICATION_JSON, body),
            Err(err) => {
                let error = Error::from(err);
                tracing::error!(
                    error = %error,
                    path = %self.path,
                    "Failed to serialize JSON response"
                );
                let body = serde_json::to_vec(&error.to_error_response()).unwrap_or_default();
                self.write(error.status_code(), APPLICATION_JSON, body);
            }
        }
    }

    /// Writes an HTML response. The markup is sent as-is.
    pub fn html(&mut self, code: StatusCode, body: impl Into<String>) {
        self.write(code, TEXT_HTML, body.into().into_bytes());
    }

    /// Writes raw bytes without touching the content type.
    pub fn data(&mut self, code: StatusCode, body: impl Into<Vec<u8>>) {
        self.status = code;
        self.response_body = body.into();
    }

    /// Aborts the chain and answers with `{"message": ...}`.
    pub fn fail(&mut self, code: StatusCode, message: impl Into<String>) {
        self.abort();
        self.response_headers.clear();
        self.json(code, &serde_json::json!({ "message": message.into() }));
    }

    fn write(&mut self, code: StatusCode, content_type: &'static str, body: Vec<u8>) {
        self.set_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.status = code;
        self.response_body = body;
    }

    // ========================================================================
    // Response accessors
    // ========================================================================

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// Converts the written response into an axum response.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.response_body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.response_headers;
        response
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("chain_len", &self.handlers.len())
            .field("cursor", &self.cursor)
            .field("aborted", &self.aborted)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
