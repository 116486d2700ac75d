mod word_list;

use anyhow::{bail, Result};
use clap::Parser;
use libjyutping_core::{Lexicon, RedbStore};
use std::path::PathBuf;

use word_list::Format;

/// Build the lexicon store artifacts from a frequency-ordered word list.
#[derive(Parser)]
#[command(name = "build_lexicon")]
struct Args {
    /// Word list: TSV (`word<TAB>romanization`) or a JSON array of {word, romanization}
    #[arg(long)]
    input: PathBuf,

    /// Force the input format instead of guessing from the extension
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// In-memory store output
    #[arg(long)]
    out_bincode: Option<PathBuf>,

    /// Persistent store output
    #[arg(long)]
    out_redb: Option<PathBuf>,

    /// Skip the prefix index
    #[arg(long)]
    no_prefix_index: bool,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum InputFormat {
    Tsv,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.out_bincode.is_none() && args.out_redb.is_none() {
        bail!("nothing to write: pass --out-bincode and/or --out-redb");
    }

    let format = match args.format {
        Some(InputFormat::Tsv) => Format::Tsv,
        Some(InputFormat::Json) => Format::Json,
        None => Format::detect(&args.input),
    };
    let rows = word_list::read(&args.input, format)?;
    let prefix_index = !args.no_prefix_index;
    let lexicon = Lexicon::from_entries(
        rows.into_iter().map(|r| (r.word, r.romanization)),
        prefix_index,
    );
    println!("Read {} rows from {}", lexicon.len(), args.input.display());

    if let Some(path) = &args.out_bincode {
        lexicon.save_bincode(path)?;
        println!("Wrote bincode lexicon to {}", path.display());
    }
    if let Some(path) = &args.out_redb {
        RedbStore::create(path, &lexicon, prefix_index)?;
        println!("Wrote redb lexicon to {}", path.display());
    }
    Ok(())
}
