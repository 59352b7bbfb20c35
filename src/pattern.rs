use std::borrow::Cow;

use widestring::Utf16String;

use crate::error::FinderError;

/// A search pattern, normalized to bytes before matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// UTF-8 text, matched byte for byte
    Text(String),
    Bytes(Vec<u8>),
    /// Text matched in its UTF-16LE encoding, as wide strings are stored in memory on Windows
    Utf16(String),
}

impl Pattern {
    pub fn utf16(text: impl Into<String>) -> Self {
        Pattern::Utf16(text.into())
    }

    /// Parses a hex byte string such as `"de ad be ef"` or `"DEADBEEF"`.
    pub fn from_hex(hex: &str) -> Result<Self, FinderError> {
        let digits = hex.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        hex::decode(&digits)
            .map(Pattern::Bytes)
            .map_err(|e| FinderError::InvalidArgument(format!("bad hex pattern '{}': {}", hex, e)))
    }

    /// The canonical byte form. An empty pattern would match at every offset, so it is rejected.
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>, FinderError> {
        let bytes = match self {
            Pattern::Text(text) => Cow::Borrowed(text.as_bytes()),
            Pattern::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
            Pattern::Utf16(text) => Cow::Owned(
                Utf16String::from_str(text)
                    .into_vec()
                    .iter()
                    .flat_map(|&unit| unit.to_le_bytes())
                    .collect(),
            ),
        };
        if bytes.is_empty() {
            return Err(FinderError::InvalidArgument(
                "pattern must contain at least one byte".to_string(),
            ));
        }
        Ok(bytes)
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::Text(text.to_string())
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Pattern::Text(text)
    }
}

impl From<&[u8]> for Pattern {
    fn from(bytes: &[u8]) -> Self {
        Pattern::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Pattern {
    fn from(bytes: &[u8; N]) -> Self {
        Pattern::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Pattern {
    fn from(bytes: Vec<u8>) -> Self {
        Pattern::Bytes(bytes)
    }
}
