use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use libjyutping::{Candidate, Combo, Config, JyutpingEngine, SuggestOptions};

#[derive(Parser)]
#[command(name = "jyutping")]
#[command(about = "Cantonese (Jyutping) candidate generation, one input per line")]
#[command(version)]
struct Cli {
    /// Directory holding lexicon.redb or lexicon.bincode (and optionally config.toml)
    #[arg(short, long, default_value = "data/jyutping")]
    data_dir: PathBuf,

    /// TOML file overriding the engine tunables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat each line as ten-key presses (digits 2-9, or letters standing for their key)
    #[arg(long)]
    ten_key: bool,

    /// Answer from a plain query, skipping strict tone and separator handling
    #[arg(long)]
    asap: bool,

    /// Candidates printed per input
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
}

fn load_engine(cli: &Cli) -> JyutpingEngine {
    let config = match &cli.config {
        Some(path) => match Config::load_toml(path) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("warning: failed to load config {:?}: {}", path, e);
                None
            }
        },
        None => None,
    };

    if cli.data_dir.exists() {
        let loaded = match config {
            Some(c) => JyutpingEngine::from_data_dir_with_config(&cli.data_dir, c),
            None => JyutpingEngine::from_data_dir(&cli.data_dir),
        };
        match loaded {
            Ok(engine) => {
                println!("loaded lexicon from {}", cli.data_dir.display());
                return engine;
            }
            Err(e) => eprintln!("warning: {}", e),
        }
    }

    println!("using built-in demo lexicon");
    JyutpingEngine::demo()
}

/// Presses for a line: `2`-`9` are keys, letters stand for the key they sit on.
fn parse_presses(line: &str) -> Option<Vec<Combo>> {
    line.chars()
        .map(|ch| match ch {
            '2' => Some(Combo::ABC),
            '3' => Some(Combo::DEF),
            '4' => Some(Combo::GHI),
            '5' => Some(Combo::JKL),
            '6' => Some(Combo::MNO),
            '7' => Some(Combo::PQRS),
            '8' => Some(Combo::TUV),
            '9' => Some(Combo::WXYZ),
            other => Combo::of(other),
        })
        .collect()
}

fn print_candidate(cand: &Candidate, idx: usize) {
    println!("{}. {}  [{}]  input='{}'", idx + 1, cand.text, cand.romanization, cand.input);
}

fn main() {
    let cli = Cli::parse();
    let engine = load_engine(&cli);
    let options = SuggestOptions {
        needs_symbols: false,
        asap: cli.asap,
    };

    if cli.ten_key {
        println!("ten-key mode: type presses such as 4668 and press Enter");
    } else {
        println!("type jyutping such as neihou or nei5hou2 and press Enter");
    }
    println!("Ctrl-D to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let raw = match line {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("error reading stdin: {}", e);
                break;
            }
        };
        let input = raw.trim();
        if input.is_empty() {
            continue;
        }

        let cands = if cli.ten_key {
            match parse_presses(input) {
                Some(presses) => engine.ten_key(&presses),
                None => {
                    eprintln!("not a ten-key sequence: '{}'", input);
                    continue;
                }
            }
        } else {
            engine.suggest_with(input, options)
        };

        if cands.is_empty() {
            println!("  (no candidates found)");
        } else {
            for (i, c) in cands.iter().take(cli.limit).enumerate() {
                print_candidate(c, i);
            }
        }
        println!();
    }
}
