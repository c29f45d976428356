use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::error::EmbedError;

/// Reads a source in fixed-size chunks through a caller-owned scratch buffer.
///
/// Every chunk except the last is exactly `chunk.len()` bytes long. The end
/// of the stream is only concluded from a zero-byte read, so a source whose
/// length is a multiple of the chunk size costs one extra (empty) read.
#[derive(Debug)]
pub struct ByteStream<'a, R> {
    source: R,
    path: PathBuf,
    chunk: &'a mut [u8],
    finished: bool,
}

impl<'a> ByteStream<'a, File> {
    pub fn open(path: &Path, chunk: &'a mut [u8]) -> Result<Self, EmbedError> {
        let file = File::open(path).map_err(|source| EmbedError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(file, path, chunk))
    }
}

impl<'a, R> ByteStream<'a, R>
where
    R: Read,
{
    pub fn new(source: R, path: &Path, chunk: &'a mut [u8]) -> Self {
        Self {
            source,
            path: path.to_path_buf(),
            chunk,
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn next_chunk(&mut self) -> Result<Option<&[u8]>, EmbedError> {
        if self.finished {
            return Ok(None);
        }

        let mut filled = 0;
        while filled < self.chunk.len() {
            match self.source.read(&mut self.chunk[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(EmbedError::FileRead {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }

        if filled == 0 {
            return Ok(None);
        }

        Ok(Some(&self.chunk[..filled]))
    }
}
