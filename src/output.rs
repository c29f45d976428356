use std::io::Write;

use tracing::{trace, warn};

use crate::constants::BUFFER_SIZE;
use crate::error::EmbedError;

/// Fixed-capacity write buffer in front of the output stream.
///
/// The buffer never grows: when it fills up it is flushed to the destination
/// in one `write_all`, and any failure there is final. A failed buffer is
/// poisoned and silently discards further input, since the caller is expected
/// to abort on the returned error.
///
/// [`OutputBuffer::finish`] must be called to push out the tail. A buffer
/// dropped without it (an error elsewhere in the pipeline) still makes a
/// best-effort attempt to flush what it holds, up to the last boundary set
/// with [`OutputBuffer::mark_boundary`].
#[derive(Debug)]
pub struct OutputBuffer<W>
where
    W: Write,
{
    dest: Option<W>,
    buf: Vec<u8>,
    capacity: usize,
    /// Bytes of `buf` that end on a boundary and may be flushed on drop.
    committed: usize,
    poisoned: bool,
}

impl<W> OutputBuffer<W>
where
    W: Write,
{
    pub fn new(dest: W) -> Self {
        Self::with_capacity(dest, BUFFER_SIZE)
    }

    pub fn with_capacity(dest: W, capacity: usize) -> Self {
        assert!(capacity > 0, "output buffer capacity must be non-zero");

        Self {
            dest: Some(dest),
            buf: Vec::with_capacity(capacity),
            capacity,
            committed: 0,
            poisoned: false,
        }
    }

    #[cfg(test)]
    pub fn used(&self) -> usize {
        self.buf.len()
    }

    pub fn write(&mut self, mut bytes: &[u8]) -> Result<(), EmbedError> {
        if self.poisoned {
            return Ok(());
        }

        while !bytes.is_empty() {
            if self.buf.len() == self.capacity {
                self.flush()?;
            }

            let room = self.capacity - self.buf.len();
            let (head, tail) = bytes.split_at(room.min(bytes.len()));
            self.buf.extend_from_slice(head);
            bytes = tail;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), EmbedError> {
        if self.poisoned {
            return Ok(());
        }
        let Some(dest) = self.dest.as_mut() else {
            return Ok(());
        };

        trace!(bytes = self.buf.len(), "flushing output buffer");

        let result = dest.write_all(&self.buf).and_then(|()| dest.flush());
        match result {
            Ok(()) => {
                self.buf.clear();
                self.committed = 0;
                Ok(())
            }
            Err(err) => {
                self.poisoned = true;
                self.buf.clear();
                self.committed = 0;
                Err(EmbedError::from_write(err))
            }
        }
    }

    /// Marks everything written so far as complete output.
    pub fn mark_boundary(&mut self) {
        self.committed = self.buf.len();
    }

    /// Flushes the remaining bytes and hands back the destination.
    pub fn finish(mut self) -> Result<W, EmbedError> {
        self.flush()?;

        // Only `finish` takes the destination, and it consumes the buffer.
        Ok(self.dest.take().expect("destination taken twice"))
    }
}

impl<W> Drop for OutputBuffer<W>
where
    W: Write,
{
    fn drop(&mut self) {
        if self.dest.is_none() || self.poisoned {
            return;
        }

        self.buf.truncate(self.committed);
        if self.buf.is_empty() {
            return;
        }

        if let Err(err) = self.flush() {
            warn!("dropping unflushed output: {err}");
        }
    }
}
