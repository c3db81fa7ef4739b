//! Item content as an async byte stream
//!
//! `Content` is the body type for reads and writes at the storage contract
//! boundary. It wraps whatever reader a backend hands out (a file handle,
//! an HTTP response body, an in-memory buffer) behind one concrete type so
//! trait objects stay simple.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use crate::error::Result;

/// Streamed item content
///
/// Reads from the start of the item to its end exactly once. `Content`
/// itself implements [`AsyncRead`], so it plugs into `tokio::io::copy`
/// and friends directly.
pub struct Content(Box<dyn AsyncRead + Send + Unpin + 'static>);

impl Content {
    /// Wrap an async reader
    pub fn new(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self(Box::new(reader))
    }

    /// Content of zero bytes
    pub fn empty() -> Self {
        Self::from(Bytes::new())
    }

    /// Read the remaining content into memory
    pub async fn collect(mut self) -> Result<Bytes> {
        let mut buf = Vec::new();
        self.0.read_to_end(&mut buf).await?;
        Ok(buf.into())
    }
}

impl AsyncRead for Content {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().0).poll_read(cx, buf)
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Content(..)")
    }
}

impl From<Bytes> for Content {
    fn from(bytes: Bytes) -> Self {
        Self::new(io::Cursor::new(bytes))
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<&'static str> for Content {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}
