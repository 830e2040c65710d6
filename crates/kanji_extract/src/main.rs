//! Creates the per-grade Dart kanji files from the TypeScript kanji module.

mod cli;

use clap::Parser;
use cli::Cli;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    tracing::info!("starting kanji extraction");
    let summary = kanji_extract::run::run(&cli.input, &cli.output_dir)?;
    println!("\n{summary}\n");
    tracing::info!("done, see {}", cli.output_dir.display());
    Ok(())
}
