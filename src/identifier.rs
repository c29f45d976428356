use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::constants::MAX_NAME_LENGTH;
use crate::error::EmbedError;

/// How bytes of the last path segment are mapped into an array name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum NamingPolicy {
    /// Letters kept, digits kept unless leading, everything else becomes `_`.
    #[default]
    Strict,
    /// Only `.` and space become `_`, everything else is copied verbatim.
    Loose,
}

impl NamingPolicy {
    fn map(self, byte: u8, is_empty: bool) -> u8 {
        match self {
            Self::Strict => {
                if byte.is_ascii_alphabetic() || (!is_empty && byte.is_ascii_digit()) {
                    byte
                } else {
                    b'_'
                }
            }
            Self::Loose => match byte {
                b'.' | b' ' => b'_',
                _ => byte,
            },
        }
    }
}

/// Derives an array name from the raw bytes of `path`. Separators restart
/// the name, so only the last path segment contributes, and the name is
/// never longer than the path.
pub fn derive_identifier(path: &[u8], policy: NamingPolicy) -> Vec<u8> {
    let mut identifier = Vec::with_capacity(path.len());

    for &byte in path {
        match byte {
            b'/' | b'\\' => identifier.clear(),
            _ => {
                let mapped = policy.map(byte, identifier.is_empty());
                identifier.push(mapped);
            }
        }
    }

    identifier
}

/// One input file together with the name of the array it becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    path: PathBuf,
    identifier: Vec<u8>,
}

impl FileTask {
    /// `index` is the 1-based position of `arg` on the command line.
    pub fn new(index: usize, arg: &OsStr, policy: NamingPolicy) -> Result<Self, EmbedError> {
        let bytes = arg.as_encoded_bytes();
        if bytes.len() > MAX_NAME_LENGTH {
            return Err(EmbedError::NameTooLong {
                index,
                limit: MAX_NAME_LENGTH,
            });
        }

        let identifier = derive_identifier(bytes, policy);
        if identifier.is_empty() {
            return Err(EmbedError::EmptyIdentifier { index });
        }

        Ok(Self {
            path: PathBuf::from(arg),
            identifier,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }
}
