//! Prints random sentences from a grammar file.
//!
//! Usage:
//!   rsg <grammar-file> [--count N] [--seed S] [--width W] [--json]
//!
//! With the `tracing` feature, `RUST_LOG=rsg=debug` logs parsing and generation to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::exit;

use rsg::rand::SeedableRng;
use rsg::rand::rngs::StdRng;
use rsg::{Error, Grammar, Sentence};

const USAGE: &str = "usage: rsg <grammar-file> [--count N] [--seed S] [--width W] [--json]";
const DEFAULT_COUNT: usize = 3;
const DEFAULT_WIDTH: usize = 55;

struct Options {
    path: PathBuf,
    count: usize,
    seed: Option<u64>,
    width: usize,
    json: bool,
}

fn parse_number<T>(flag: &str, value: Option<String>) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|e| format!("{flag} expects a number, got '{value}': {e}"))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut path = None;
    let mut options = Options {
        path: PathBuf::new(),
        count: DEFAULT_COUNT,
        seed: None,
        width: DEFAULT_WIDTH,
        json: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--count" | "-n" => options.count = parse_number(&arg, args.next())?,
            "--seed" | "-s" => options.seed = Some(parse_number(&arg, args.next())?),
            "--width" | "-w" => options.width = parse_number(&arg, args.next())?,
            "--json" => options.json = true,
            "--help" | "-h" => return Err(String::from(USAGE)),
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            _ if path.is_some() => return Err(format!("unexpected argument {arg}")),
            _ => path = Some(PathBuf::from(&arg)),
        }
    }

    options.path = path.ok_or_else(|| String::from("missing grammar file"))?;
    if options.width == 0 {
        return Err(String::from("--width must be at least 1"));
    }
    Ok(options)
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*};
    let filter_layer = tracing_subscriber::EnvFilter::from_default_env();
    let fmt_layer = fmt::Layer::default().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[cfg(not(feature = "tracing"))]
const fn init_tracing() {}

/// Print the sentences as a JSON array, one object per version
#[cfg(feature = "serde")]
fn print_json(sentences: &[Sentence]) -> Result<(), Error> {
    let versions: Vec<_> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            serde_json::json!({
                "version": i + 1,
                "text": sentence.to_string(),
                "words": sentence.words_iter().collect::<Vec<_>>(),
            })
        })
        .collect();
    let json = serde_json::to_string_pretty(&versions)
        .map_err(|e| Error::GenerateError(format!("could not encode sentences as JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_json(_sentences: &[Sentence]) -> Result<(), Error> {
    Err(Error::GenerateError(String::from(
        "--json requires the `serde` feature",
    )))
}

fn run(options: &Options) -> Result<(), Error> {
    let grammar = Grammar::from_file(&options.path)?;
    grammar.validate()?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let sentences = (0..options.count)
        .map(|_| grammar.generate_seeded(&mut rng))
        .collect::<Result<Vec<_>, _>>()?;

    if options.json {
        return print_json(&sentences);
    }

    for (i, sentence) in sentences.iter().enumerate() {
        println!("Version #{}: ---------------------------------", i + 1);
        println!("{}", sentence.wrap(options.width));
        println!();
    }
    Ok(())
}

fn main() {
    init_tracing();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) if message == USAGE => {
            println!("{USAGE}");
            exit(0);
        }
        Err(message) => {
            eprintln!("rsg: {message}");
            eprintln!("{USAGE}");
            exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("rsg: {e}");
        exit(1);
    }
}
