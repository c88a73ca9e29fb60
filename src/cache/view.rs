//! Immutable byte views handed out by the cache.

use std::fmt;

use bytes::Bytes;

/// An immutable snapshot of a cached value.
///
/// Cloning is cheap (the backing buffer is reference-counted) and the
/// buffer itself is never exposed mutably, so a view handed to a caller
/// cannot alter cached state. Accessors that produce owned bytes always
/// copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    data: Bytes,
}

impl ByteView {
    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view holds zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy the contents into a fresh buffer owned by the caller.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self { data: Bytes::from(data) }
    }
}

impl From<Bytes> for ByteView {
    fn from(data: Bytes) -> Self {
        Self { data }
    }
}

impl From<&[u8]> for ByteView {
    fn from(data: &[u8]) -> Self {
        Self { data: Bytes::copy_from_slice(data) }
    }
}

impl From<&str> for ByteView {
    fn from(data: &str) -> Self {
        Self { data: Bytes::copy_from_slice(data.as_bytes()) }
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}
