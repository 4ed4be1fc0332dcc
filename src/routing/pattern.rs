//! Path and pattern segmentation.
//!
//! A registered pattern is split on `/` with empty segments dropped. Each
//! remaining segment is one of:
//!
//! - `:name` - named capture, matches exactly one request segment
//! - `*name` - wildcard capture, matches the rest of the request path
//! - anything else - literal, matched by text equality
//!
//! Segments after the first wildcard are discarded, since the wildcard has
//! already absorbed everything that could follow it.

/// Classification of a single pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Matched by exact text equality.
    Literal(&'a str),
    /// `:name`, binds one request segment.
    Named(&'a str),
    /// `*name`, binds the remainder of the request path joined by `/`.
    Wildcard(&'a str),
}

impl<'a> Segment<'a> {
    /// Classifies a raw segment by its first byte.
    pub fn classify(part: &'a str) -> Self {
        if let Some(name) = part.strip_prefix(':') {
            Segment::Named(name)
        } else if let Some(name) = part.strip_prefix('*') {
            Segment::Wildcard(name)
        } else {
            Segment::Literal(part)
        }
    }
}

/// Returns true for `:name` and `*name` segments.
pub fn is_capture(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

/// Splits a registered pattern into segments, stopping after the first wildcard.
pub fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for item in pattern.split('/').filter(|item| !item.is_empty()) {
        parts.push(item);
        if item.starts_with('*') {
            break;
        }
    }
    parts
}

/// Splits a request path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|item| !item.is_empty()).collect()
}
