use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod embed;
use embed::Embed;

mod carray;

mod constants;

mod error;

mod identifier;

mod output;

mod stream;

/// Embed binary files into C sources as `static const unsigned char` arrays.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(flatten)]
    embed: Embed,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    cli.embed.run()
}
