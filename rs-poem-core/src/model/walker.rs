use log::trace;
use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::PoemError;
use super::corpus_model::{CorpusModel, is_alphabetic};

/// Default bound on random draws when looking for an alphabetic token.
pub const DEFAULT_MAX_RANDOM_ATTEMPTS: usize = 10_000;

/// How the next word is picked among the successors of the current one.
///
/// # Variants
/// - `Uniform`: every distinct alphabetic successor is equally likely; bigram
///   counts are ignored. This is the default.
/// - `Weighted`: successors are drawn proportionally to their bigram counts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
	#[default]
	Uniform,
	Weighted,
}

/// Random walk over the bigram chain of a `CorpusModel`.
///
/// # Responsibilities
/// - Resolve a valid (alphabetic) starting word
/// - Follow bigram successors word by word
/// - Fall back to a random corpus word at dead ends
///
/// The walker owns its RNG and its chain state (`current_word`); the model is
/// borrowed read-only, so any number of walkers may share one model.
#[derive(Debug)]
pub struct WordChainWalker<'a, R> {
	model: &'a CorpusModel,
	rng: R,
	selection: Selection,
	max_random_attempts: usize,
	current_word: Option<String>,
}

impl<'a, R: Rng> WordChainWalker<'a, R> {
	/// Creates a walker using uniform selection and the default retry bound.
	pub fn new(model: &'a CorpusModel, rng: R) -> Self {
		Self {
			model,
			rng,
			selection: Selection::Uniform,
			max_random_attempts: DEFAULT_MAX_RANDOM_ATTEMPTS,
			current_word: None,
		}
	}

	/// Sets the successor selection policy.
	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.selection = selection;
		self
	}

	/// Sets how many random draws may be made before giving up with
	/// `PoemError::EmptyCorpus`.
	pub fn with_max_random_attempts(mut self, max_random_attempts: usize) -> Self {
		self.max_random_attempts = max_random_attempts;
		self
	}

	/// The model being walked.
	pub fn model(&self) -> &'a CorpusModel {
		self.model
	}

	/// The last word produced, if any.
	pub fn current_word(&self) -> Option<&str> {
		self.current_word.as_deref()
	}

	/// Generates `count` related words starting from `seed`.
	///
	/// # Behavior
	/// - If `seed` is absent or not alphabetic, a random alphabetic corpus
	///   word is used instead. The seed (or its replacement) is the first
	///   element of the result.
	/// - Each following word is a successor of the previous one in the bigram
	///   table, chosen according to the `Selection` policy among alphabetic
	///   successors.
	/// - When the previous word has no alphabetic successor, a random
	///   alphabetic corpus word is used.
	///
	/// # Errors
	/// - `PoemError::InvalidSequenceLength` if `count` is 0.
	/// - `PoemError::EmptyCorpus` if no alphabetic word can be drawn.
	pub fn generate_sequence(&mut self, seed: Option<&str>, count: usize) -> Result<Vec<String>, PoemError> {
		if count == 0 {
			return Err(PoemError::InvalidSequenceLength);
		}

		let start = match seed {
			Some(word) if is_alphabetic(word) => word.to_owned(),
			_ => self.random_word()?,
		};

		let mut result = Vec::with_capacity(count);
		self.current_word = Some(start.clone());
		result.push(start);

		while result.len() < count {
			let word = self.next_word()?;
			self.current_word = Some(word.clone());
			result.push(word);
		}

		Ok(result)
	}

	/// Follows the chain one step from `current_word`.
	fn next_word(&mut self) -> Result<String, PoemError> {
		let model = self.model;
		let state = self.current_word.as_deref().and_then(|word| model.successors(word));

		let chosen = match state {
			Some(state) => match self.selection {
				Selection::Uniform => state.choose_uniform(&mut self.rng),
				Selection::Weighted => state.choose_weighted(&mut self.rng),
			},
			None => None,
		};

		match chosen {
			Some(word) => Ok(word.to_owned()),
			None => {
				trace!("No alphabetic successor for {:?}, drawing a random word", self.current_word);
				self.random_word()
			}
		}
	}

	fn random_word(&mut self) -> Result<String, PoemError> {
		let word = self.model.random_alphabetic(&mut self.rng, self.max_random_attempts)?;
		Ok(word.to_owned())
	}
}
