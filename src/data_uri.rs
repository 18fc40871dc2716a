//! Base64 data URIs (`data:<mime>;base64,<payload>`).

use crate::error::{ReelMindError, Result};
use base64::Engine;
use std::fmt;
use std::str::FromStr;

/// MIME type assumed when a response or an upload does not carry one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// An image payload encoded inline as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    data: String,
}

impl DataUri {
    /// Creates a data URI from an already base64-encoded payload.
    ///
    /// An empty MIME type falls back to [`DEFAULT_MIME_TYPE`].
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        Self {
            mime_type: if mime_type.trim().is_empty() {
                DEFAULT_MIME_TYPE.to_string()
            } else {
                mime_type
            },
            data: base64_data.into(),
        }
    }

    /// Encodes raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(
            mime_type,
            base64::engine::general_purpose::STANDARD.encode(bytes),
        )
    }

    /// Returns the MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the base64 payload without the `data:` header.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// Decodes the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| ReelMindError::Decode(e.to_string()))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

impl FromStr for DataUri {
    type Err = ReelMindError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| ReelMindError::Decode("missing `data:` scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ReelMindError::Decode("missing `,` separator".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| ReelMindError::Decode("only base64 data URIs are supported".into()))?;
        Ok(Self::new(mime_type, payload))
    }
}

/// Returns the bare base64 payload of `input`.
///
/// A `data:...,` header is removed; anything else is returned unmodified.
pub fn strip_data_uri_prefix(input: &str) -> &str {
    if input.starts_with("data:") {
        if let Some((_, payload)) = input.split_once(',') {
            return payload;
        }
    }
    input
}
