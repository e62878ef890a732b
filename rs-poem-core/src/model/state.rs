use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use super::corpus_model::is_alphabetic;


/// Represents a word state in the bigram chain.
///
/// A `WordState` corresponds to one corpus token (`key`) and stores every
/// token observed right after it, with the number of times the pair occurred.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate successor occurrences while the corpus is scanned
/// - Pick the next word, uniformly among distinct successors or weighted by count
/// - Merge with another state having the same key (parallel counting support)
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WordState {
	/// The preceding token.
	key: String,
	/// Outgoing transitions indexed by the following token.
	/// Example: { "cat" => 1, "mat" => 1 }
	///
	/// Ordered so that a seeded RNG always walks the same candidates.
	transitions: BTreeMap<String, usize>
}

impl WordState {
	/// Creates a new empty state for the given word.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			transitions: BTreeMap::new(),
		}
	}

	/// The word this state follows from.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Records an occurrence of `next_word` following this state's word.
	pub fn add_transition(&mut self, next_word: &str) {
		*self.transitions.entry(next_word.to_owned()).or_insert(0) += 1;
	}

	/// Number of times `next_word` was seen after this state's word (0 if never).
	pub fn count(&self, next_word: &str) -> usize {
		self.transitions.get(next_word).copied().unwrap_or(0)
	}

	/// Total number of observed transitions out of this state.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Iterates `(successor, count)` pairs in lexical order.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(word, count)| (word.as_str(), *count))
	}

	/// Distinct successors whose first character is a letter.
	pub fn alphabetic_successors(&self) -> impl Iterator<Item = &str> {
		self.transitions.keys().map(String::as_str).filter(|word| is_alphabetic(word))
	}

	/// Picks an alphabetic successor uniformly among distinct keys.
	///
	/// Occurrence counts are ignored: a successor seen 40 times is as likely
	/// as one seen once.
	///
	/// Returns `None` if no successor is alphabetic.
	pub fn choose_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let candidates: Vec<&str> = self.alphabetic_successors().collect();
		if candidates.is_empty() {
			return None;
		}
		Some(candidates[rng.random_range(0..candidates.len())])
	}

	/// Picks an alphabetic successor using weighted random sampling.
	///
	/// The probability of selecting a word is proportional to its
	/// occurrence count.
	///
	/// Returns `None` if no successor is alphabetic.
	pub fn choose_weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let total: usize = self
			.transitions
			.iter()
			.filter(|(word, _)| is_alphabetic(word))
			.map(|(_, occurrence)| occurrence)
			.sum();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (word, occurrence) in self.transitions.iter().filter(|(word, _)| is_alphabetic(word)) {
			if r < *occurrence {
				return Some(word.as_str());
			}
			r -= occurrence;
		}

		// Unreachable while counts are consistent with `total`.
		None
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same word (`key`).
	/// Transition occurrence counts are summed.
	pub fn merge(&mut self, other: &Self) {
		debug_assert_eq!(self.key, other.key, "merging states of different words");

		for (next_word, occurrence) in &other.transitions {
			*self.transitions.entry(next_word.clone()).or_insert(0) += *occurrence;
		}
	}
}
