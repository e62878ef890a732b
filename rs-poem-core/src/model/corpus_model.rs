use std::collections::BTreeMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use rand::Rng;

use serde::{Deserialize, Serialize};
use crate::error::PoemError;
use crate::io::{build_output_path, read_tokens};
use super::state::WordState;

/// Returns `true` if the token's first character is a letter.
///
/// Only alphabetic tokens may start a chain or continue one; punctuation
/// tokens such as `","` or `"--"` are skipped. The empty string is not
/// alphabetic.
pub fn is_alphabetic(token: &str) -> bool {
	token.chars().next().is_some_and(char::is_alphabetic)
}

/// Bigram model of a tokenized corpus.
///
/// This struct holds:
/// - `tokens`: the corpus in reading order.
/// - `states`: for each token, a `WordState` counting the tokens that follow it.
///
/// # Invariants
/// - Every key of `states` appears in `tokens`.
/// - Every transition count is >= 1.
/// - Immutable once built; share it behind an `Arc` across generators.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CorpusModel {
	tokens: Vec<String>,
	states: BTreeMap<String, WordState>,
}

impl CorpusModel {
	/// Builds the model by scanning every consecutive token pair.
	///
	/// An empty corpus is legal; generation over it fails later with
	/// `PoemError::EmptyCorpus`.
	pub fn build(tokens: Vec<String>) -> Self {
		let states = Self::count_bigrams(&tokens);
		Self { tokens, states }
	}

	/// Builds the same model as `build`, counting chunks of the corpus on
	/// worker threads and merging the partial tables.
	///
	/// # Behavior
	/// - Splits tokens into chunks (based on CPU cores * factor).
	/// - Consecutive chunks overlap by one token so the pair straddling a
	///   chunk boundary is counted exactly once.
	/// - Merges all partial tables sequentially.
	pub fn build_parallel(tokens: Vec<String>) -> Self {
		if tokens.len() < 2 {
			return Self::build(tokens);
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = ((tokens.len() + chunks - 1) / chunks).max(1);

		let (tx, rx) = mpsc::channel();
		let mut start = 0;
		while start < tokens.len() - 1 {
			let end = (start + chunk_size + 1).min(tokens.len());
			let tx = tx.clone();
			let chunk: Vec<String> = tokens[start..end].to_vec();

			thread::spawn(move || {
				// The receiver outlives every worker.
				let _ = tx.send(Self::count_bigrams(&chunk));
			});
			start += chunk_size;
		}
		drop(tx);

		let mut model = Self { tokens, states: BTreeMap::new() };
		for partial in rx.iter() {
			Self::merge_states(&mut model.states, &partial);
		}
		debug!("Counted {} distinct words from {} tokens", model.states.len(), model.tokens.len());
		model
	}

	/// Loads the model for a corpus file.
	///
	/// - `filepath` is the input text file.
	/// - With `use_cache`, a `<corpus>.bin` next to it is loaded if it is
	///   newer than the corpus; otherwise the corpus is tokenized, counted in
	///   parallel and the cache is (re)written.
	/// - Uses `postcard` for compact serialization/deserialization.
	/// - A cache that cannot be read or written is logged and ignored.
	pub fn load<P: AsRef<Path>>(filepath: P, use_cache: bool) -> Result<Self, PoemError> {
		let filepath = filepath.as_ref();
		if !use_cache {
			return Self::read_corpus_file(filepath);
		}

		let binary_data_path = build_output_path(filepath, "bin")?;
		if Self::cache_is_fresh(filepath, &binary_data_path) {
			match Self::load_cache(&binary_data_path) {
				Ok(model) => {
					info!("Loaded corpus model from {}", binary_data_path.display());
					return Ok(model);
				}
				Err(e) => warn!("Ignoring unreadable cache {}: {}", binary_data_path.display(), e),
			}
		}

		let model = Self::read_corpus_file(filepath)?;
		if let Err(e) = model.save_cache(&binary_data_path) {
			warn!("Could not write cache {}: {}", binary_data_path.display(), e);
		}
		Ok(model)
	}

	/// Reads a serialized model.
	pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<Self, PoemError> {
		let bytes = std::fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	/// Serializes the model to `path`.
	pub fn save_cache<P: AsRef<Path>>(&self, path: P) -> Result<(), PoemError> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(&path, bytes)?;
		info!("Wrote corpus model cache to {}", path.as_ref().display());
		Ok(())
	}

	fn read_corpus_file(filepath: &Path) -> Result<Self, PoemError> {
		let tokens = read_tokens(filepath)?;
		info!("Read {} tokens from {}", tokens.len(), filepath.display());
		Ok(Self::build_parallel(tokens))
	}

	fn cache_is_fresh(corpus: &Path, cache: &Path) -> bool {
		let modified = |path: &Path| std::fs::metadata(path).and_then(|m| m.modified()).ok();
		match (modified(corpus), modified(cache)) {
			(Some(corpus_time), Some(cache_time)) => cache_time >= corpus_time,
			(None, Some(_)) => true,
			_ => false,
		}
	}

	fn count_bigrams(tokens: &[String]) -> BTreeMap<String, WordState> {
		let mut states: BTreeMap<String, WordState> = BTreeMap::new();
		for pair in tokens.windows(2) {
			let state = states.entry(pair[0].clone()).or_insert_with(|| WordState::new(&pair[0]));
			state.add_transition(&pair[1]);
		}
		states
	}

	fn merge_states(into: &mut BTreeMap<String, WordState>, other: &BTreeMap<String, WordState>) {
		for (key, state) in other {
			if let Some(existing) = into.get_mut(key) {
				existing.merge(state);
			} else {
				into.insert(key.clone(), state.clone());
			}
		}
	}

	/// Appends another model's corpus to this one.
	///
	/// # Notes
	/// - Occurrence counts for matching words and successors are summed.
	/// - No pair is created between this corpus' last token and the other's
	///   first token: the corpora stay separate texts.
	pub fn merge(&mut self, other: &Self) {
		self.tokens.extend(other.tokens.iter().cloned());
		Self::merge_states(&mut self.states, &other.states);
	}

	/// The corpus tokens in reading order.
	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Number of tokens in the corpus.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// The successor table of `word`, if it is ever followed by something.
	pub fn successors(&self, word: &str) -> Option<&WordState> {
		self.states.get(word)
	}

	/// Iterates over every word that has at least one successor.
	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.states.keys().map(String::as_str)
	}

	/// Draws uniformly random tokens until an alphabetic one comes up.
	///
	/// # Errors
	/// `PoemError::EmptyCorpus` if the corpus is empty or `max_attempts`
	/// draws all hit non-alphabetic tokens.
	pub fn random_alphabetic<R: Rng + ?Sized>(&self, rng: &mut R, max_attempts: usize) -> Result<&str, PoemError> {
		if self.tokens.is_empty() {
			return Err(PoemError::EmptyCorpus { attempts: 0 });
		}
		for _ in 0..max_attempts {
			let token = &self.tokens[rng.random_range(0..self.tokens.len())];
			if is_alphabetic(token) {
				return Ok(token);
			}
		}
		Err(PoemError::EmptyCorpus { attempts: max_attempts })
	}
}
