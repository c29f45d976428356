use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use clap::builder::TypedValueParser;
use eyre::Result;
use tracing::debug;

use crate::carray::HexArray;
use crate::constants::{BUFFER_SIZE, DEFAULT_WRAP_WIDTH, MAX_FILES};
use crate::error::EmbedError;
use crate::identifier::{FileTask, NamingPolicy};
use crate::output::OutputBuffer;
use crate::stream::ByteStream;

#[derive(Debug, Parser)]
pub struct Embed {
    /// Files to embed, one array per file in the order given. Put file names
    /// starting with `-` after `--`.
    #[clap(value_name = "FILES")]
    files: Vec<OsString>,
    /// How array names are derived from file names.
    #[clap(short, long, env = "SEMB_NAMING", value_enum, default_value_t = NamingPolicy::Strict)]
    naming: NamingPolicy,
    /// Number of bytes per line of array body.
    #[clap(
        short,
        long,
        env = "SEMB_WRAP_WIDTH",
        default_value_t = DEFAULT_WRAP_WIDTH,
        value_parser = clap::value_parser!(u32).range(1..).map(|width| width as usize),
    )]
    wrap_width: usize,
    /// Write the declarations to this file instead of standard output.
    #[clap(short, long, env = "SEMB_OUTPUT")]
    output: Option<PathBuf>,
}

impl Embed {
    pub fn run(self) -> Result<()> {
        let tasks = derive_tasks(&self.files, self.naming)?;
        let format = HexArray::new(self.wrap_width);

        match &self.output {
            Some(path) => {
                let file = File::create(path).map_err(|source| EmbedError::OutputCreate {
                    path: path.clone(),
                    source,
                })?;
                emit(&tasks, format, file)?;
            }
            None => {
                let _stdout = emit(&tasks, format, io::stdout().lock())?;
            }
        }

        Ok(())
    }
}

/// Validates the argument list and pairs every path with its array name.
pub fn derive_tasks(args: &[OsString], policy: NamingPolicy) -> Result<Vec<FileTask>, EmbedError> {
    if args.is_empty() {
        return Err(EmbedError::NoFiles);
    }
    if args.len() > MAX_FILES {
        return Err(EmbedError::TooManyFiles {
            count: args.len(),
            max: MAX_FILES,
        });
    }

    args.iter()
        .enumerate()
        .map(|(i, arg)| FileTask::new(i + 1, arg, policy))
        .collect()
}

/// Writes one declaration per task, in order, and flushes everything to `dest`.
pub fn emit<W>(tasks: &[FileTask], format: HexArray, dest: W) -> Result<W, EmbedError>
where
    W: Write,
{
    let mut chunk = vec![0u8; BUFFER_SIZE];
    let mut out = OutputBuffer::new(dest);

    for task in tasks {
        let mut stream = ByteStream::open(task.path(), &mut chunk)?;
        format.write_declaration(task.identifier(), &mut stream, &mut out)?;
    }

    debug!(files = tasks.len(), "all files embedded");

    out.finish()
}
