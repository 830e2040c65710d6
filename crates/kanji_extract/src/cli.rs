use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// The path to the TypeScript kanji module.
    #[arg(short, long, default_value = "../Learn-Kana/data/kanji.ts")]
    pub input: PathBuf,
    /// The directory the per-grade Dart files are written to.
    #[arg(short, long, default_value = "../lib/data/kanji")]
    pub output_dir: PathBuf,
}
