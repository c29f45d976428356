use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Must provide at least 1 argument")]
    NoFiles,
    #[error("Must provide at most {max} arguments (got {count})")]
    TooManyFiles { count: usize, max: usize },
    #[error("Argument {index} is longer than maximum allowed {limit} characters")]
    NameTooLong { index: usize, limit: usize },
    #[error("Argument {index} resulted in zero-length identifier")]
    EmptyIdentifier { index: usize },
    #[error("Failed to open file: {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read file: {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to create output file: {}", path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Output stream is closed")]
    OutputClosed {
        #[source]
        source: io::Error,
    },
    #[error("Failed to write to output stream")]
    OutputWrite {
        #[source]
        source: io::Error,
    },
}

impl EmbedError {
    /// Classifies a failed flush of the output stream.
    pub fn from_write(source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero | io::ErrorKind::UnexpectedEof => {
                Self::OutputClosed { source }
            }
            _ => Self::OutputWrite { source },
        }
    }
}
