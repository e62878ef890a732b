use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{LevelFilter, debug};

use rs_poem_core::{Generator, PoemConfig};

/// Prints a poem chained from a corpus' bigrams, shaped by syllable counts.
#[derive(Parser, Debug)]
#[command(name = "rs-poem", version, about, long_about = None)]
struct Cli {
	/// JSON configuration file (every key optional)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Corpus text file, overrides the configuration
	#[arg(long, value_name = "PATH")]
	corpus: Option<PathBuf>,

	/// Pronunciation dictionary in cmudict format, overrides the configuration
	#[arg(long, value_name = "PATH")]
	dictionary: Option<PathBuf>,

	/// Fixed random seed for reproducible output
	#[arg(long, value_name = "SEED")]
	seed: Option<u64>,

	/// Do not read or write the `<corpus>.bin` model cache
	#[arg(long)]
	no_cache: bool,

	/// Inspect words from stdin instead of printing a poem ('0' quits)
	#[arg(short, long)]
	interactive: bool,

	/// Increase logging verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	/// Resolves the configuration: file (or defaults), then flag overrides.
	fn config(&self) -> Result<PoemConfig> {
		let mut config = match &self.config {
			Some(path) => PoemConfig::from_file(path)
				.with_context(|| format!("failed to load configuration {}", path.display()))?,
			None => PoemConfig::default(),
		};

		if let Some(corpus) = &self.corpus {
			config.corpus_path = corpus.clone();
		}
		if let Some(dictionary) = &self.dictionary {
			config.dictionary_path = dictionary.clone();
		}
		if self.seed.is_some() {
			config.seed = self.seed;
		}
		if self.no_cache {
			config.use_cache = false;
		}
		Ok(config)
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	let config = cli.config()?;
	debug!("Using configuration {:?}", config);
	let generator = Generator::from_config(&config).with_context(|| {
		format!(
			"failed to load corpus {} / dictionary {}",
			config.corpus_path.display(),
			config.dictionary_path.display()
		)
	})?;

	if cli.interactive {
		let stdin = io::stdin();
		let stdout = io::stdout();
		run_interactive(&generator, stdin.lock(), stdout.lock())?;
	} else {
		let poem = generator.generate_poem().context("failed to generate a poem")?;
		println!("{}", poem);
	}

	Ok(())
}

/// Warnings only by default so stdout carries nothing but the poem.
fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	if verbose > 0 {
		builder.filter_level(level);
	}
	builder.format_timestamp(None).init();
}

/// Word inspection loop.
///
/// Reads one word per line and prints its diagnostic report. Stops on `"0"`
/// or end of input; blank lines are skipped.
fn run_interactive<R: BufRead, W: Write>(generator: &Generator, mut input: R, mut output: W) -> Result<()> {
	let mut line = String::new();
	loop {
		write!(output, "Please enter a word (Enter '0' to quit): ")?;
		output.flush()?;

		line.clear();
		if input.read_line(&mut line)? == 0 {
			writeln!(output)?;
			break;
		}

		let word = line.trim();
		if word == "0" {
			break;
		}
		if word.is_empty() {
			continue;
		}

		let report = generator
			.diagnose(word)
			.with_context(|| format!("failed to inspect '{}'", word))?;
		writeln!(output, "{}", report)?;
	}
	Ok(())
}
