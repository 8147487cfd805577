//! Cache Key Module
//!
//! Normalizes caller-supplied keys into canonical storage locations.

use std::fmt;

use crate::cache::MAX_LOCATION_LENGTH;
use crate::error::{CacheError, Result};

/// Delimiter between segment and id. Never produced by percent-encoding.
const DELIMITER: char = ':';

// == Cache Key ==
/// A key as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKey {
    /// Plain identifier, scoped by the client's default segment
    Plain(String),
    /// Identifier with its own segment
    Scoped { id: String, segment: String },
}

impl CacheKey {
    /// Creates a key carrying its own segment.
    pub fn scoped(id: impl Into<String>, segment: impl Into<String>) -> Self {
        CacheKey::Scoped {
            id: id.into(),
            segment: segment.into(),
        }
    }

    /// Returns the raw id of the key.
    pub fn id(&self) -> &str {
        match self {
            CacheKey::Plain(id) => id,
            CacheKey::Scoped { id, .. } => id,
        }
    }

    // == Resolve ==
    /// Resolves the key into its canonical location.
    ///
    /// A scoped key's own segment takes precedence over `default_segment`.
    ///
    /// # Errors
    /// `CacheError::InvalidKey` when the id or a scoped segment is empty, or
    /// when the encoded location exceeds `MAX_LOCATION_LENGTH`.
    pub fn resolve(&self, default_segment: &str) -> Result<Location> {
        let (id, segment) = match self {
            CacheKey::Plain(id) => (id.as_str(), default_segment),
            CacheKey::Scoped { id, segment } => {
                if segment.is_empty() {
                    return Err(CacheError::InvalidKey(format!(
                        "Key '{}' has an empty segment",
                        id
                    )));
                }
                (id.as_str(), segment.as_str())
            }
        };

        if id.is_empty() {
            return Err(CacheError::InvalidKey("Key id cannot be empty".to_string()));
        }

        let location = Location::new(segment, id);
        let rendered_len = location.to_string().len();
        if rendered_len > MAX_LOCATION_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Encoded key exceeds maximum length of {} bytes",
                MAX_LOCATION_LENGTH
            )));
        }

        Ok(location)
    }
}

impl From<&str> for CacheKey {
    fn from(id: &str) -> Self {
        CacheKey::Plain(id.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(id: String) -> Self {
        CacheKey::Plain(id)
    }
}

/// `(id, segment)` pair.
impl From<(&str, &str)> for CacheKey {
    fn from((id, segment): (&str, &str)) -> Self {
        CacheKey::scoped(id, segment)
    }
}

// == Location ==
/// Canonical storage location: a resolved `(segment, id)` pair.
///
/// Renders as `urlencode(segment):urlencode(id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    segment: String,
    id: String,
}

impl Location {
    pub fn new(segment: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            id: id.into(),
        }
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // == Parse ==
    /// Decodes a rendered location back into its components.
    ///
    /// Returns `None` unless the input has exactly one delimiter, both
    /// halves decode to valid UTF-8, and the input is the canonical encoding
    /// of the decoded pair (so `%61` is rejected in favour of `a`).
    pub fn parse(rendered: &str) -> Option<Self> {
        let (segment, id) = rendered.split_once(DELIMITER)?;
        if id.contains(DELIMITER) {
            return None;
        }

        let segment = urlencoding::decode(segment).ok()?;
        let id = urlencoding::decode(id).ok()?;
        let location = Self::new(segment.into_owned(), id.into_owned());
        (location.to_string() == rendered).then_some(location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            urlencoding::encode(&self.segment),
            DELIMITER,
            urlencoding::encode(&self.id)
        )
    }
}

impl From<Location> for CacheKey {
    fn from(location: Location) -> Self {
        CacheKey::Scoped {
            id: location.id,
            segment: location.segment,
        }
    }
}
