//! Lazy reads over entry contents.

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use filecache_core::constants::STREAM_CHUNK_SIZE;

/// Byte stream over a single entry file.
///
/// Usable either as an [`AsyncRead`] or as a [`Stream`] of [`Bytes`] chunks.
/// The stream is finite and cannot be rewound once consumed.
#[derive(Debug)]
pub struct EntryStream {
    file: File,
    path: PathBuf,
    len: u64,
    chunk: Vec<u8>,
    done: bool,
}

impl EntryStream {
    pub(crate) fn new(file: File, path: PathBuf, len: u64) -> Self {
        Self {
            file,
            path,
            len,
            chunk: vec![0u8; STREAM_CHUNK_SIZE],
            done: false,
        }
    }

    /// Returns the path of the file being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file size observed when the stream was opened.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the file was empty when opened.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads the rest of the stream into memory.
    pub async fn read_all(mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.len as usize);
        self.file.read_to_end(&mut out).await?;
        Ok(out)
    }
}

impl AsyncRead for EntryStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().file).poll_read(cx, buf)
    }
}

impl Stream for EntryStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        let mut buf = ReadBuf::new(&mut this.chunk);
        match Pin::new(&mut this.file).poll_read(cx, &mut buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => {
                this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(Ok(())) if buf.filled().is_empty() => {
                this.done = true;
                Poll::Ready(None)
            }
            Poll::Ready(Ok(())) => Poll::Ready(Some(Ok(Bytes::copy_from_slice(buf.filled())))),
        }
    }
}
