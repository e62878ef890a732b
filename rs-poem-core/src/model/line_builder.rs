use std::fmt;

use log::debug;
use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::PoemError;
use crate::pronunciation::PronunciationService;
use super::walker::WordChainWalker;

/// Words requested from the walker for each appended word; only the second
/// one (the successor of the previous word) is kept.
const LOOKAHEAD: usize = 3;

/// Constraints for one line of a poem.
///
/// # Invariants (checked by `validate`)
/// - `1 <= min_words <= max_words`
/// - `0 < min_ratio <= max_ratio`, both finite
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LineParameters {
	/// Words added unconditionally before the ratio is looked at.
	pub min_words: usize,
	/// Hard cap on the line length.
	pub max_words: usize,
	/// Lower edge of the syllables-per-word band (exclusive).
	pub min_ratio: f64,
	/// Upper edge of the syllables-per-word band (exclusive).
	pub max_ratio: f64,
}

impl LineParameters {
	pub const DEFAULT_MIN_RATIO: f64 = 0.8;
	pub const DEFAULT_MAX_RATIO: f64 = 1.2;

	/// Parameters with the default `(0.8, 1.2)` ratio band.
	pub fn new(min_words: usize, max_words: usize) -> Self {
		Self {
			min_words,
			max_words,
			min_ratio: Self::DEFAULT_MIN_RATIO,
			max_ratio: Self::DEFAULT_MAX_RATIO,
		}
	}

	/// Replaces the ratio band.
	pub fn with_ratio_band(mut self, min_ratio: f64, max_ratio: f64) -> Self {
		self.min_ratio = min_ratio;
		self.max_ratio = max_ratio;
		self
	}

	/// Returns `true` if `ratio` lies strictly inside the band.
	pub fn in_band(&self, ratio: f64) -> bool {
		ratio > self.min_ratio && ratio < self.max_ratio
	}

	/// Checks the parameters before any word is generated.
	///
	/// # Errors
	/// `PoemError::InvalidLineParameters` describing the first violation.
	pub fn validate(&self) -> Result<(), PoemError> {
		let invalid = |reason: String| Err(PoemError::InvalidLineParameters(reason));

		if self.min_words == 0 {
			return invalid("min_words must be >= 1".to_owned());
		}
		if self.min_words > self.max_words {
			return invalid(format!("min_words ({}) > max_words ({})", self.min_words, self.max_words));
		}
		if !self.min_ratio.is_finite() || !self.max_ratio.is_finite() {
			return invalid("ratios must be finite".to_owned());
		}
		if self.min_ratio <= 0.0 || self.max_ratio <= 0.0 {
			return invalid(format!("ratios must be positive, got ({}, {})", self.min_ratio, self.max_ratio));
		}
		if self.min_ratio > self.max_ratio {
			return invalid(format!("min_ratio ({}) > max_ratio ({})", self.min_ratio, self.max_ratio));
		}
		Ok(())
	}
}

impl Default for LineParameters {
	fn default() -> Self {
		Self::new(10, 20)
	}
}

/// One line of a poem, with its syllable bookkeeping.
///
/// A blank line has no words and is used as a stanza separator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
	words: Vec<String>,
	syllable_count: usize,
}

impl Line {
	/// An empty separator line.
	pub fn blank() -> Self {
		Self::default()
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	pub fn word_count(&self) -> usize {
		self.words.len()
	}

	pub fn syllable_count(&self) -> usize {
		self.syllable_count
	}

	pub fn is_blank(&self) -> bool {
		self.words.is_empty()
	}

	/// Syllables per word; `0.0` for a blank line.
	pub fn ratio(&self) -> f64 {
		if self.words.is_empty() {
			return 0.0;
		}
		self.syllable_count as f64 / self.words.len() as f64
	}

	fn push(&mut self, word: String, syllables: usize) {
		self.words.push(word);
		self.syllable_count += syllables;
	}
}

impl fmt::Display for Line {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.words.join(" "))
	}
}

/// Builds lines word by word under length and syllable-ratio constraints.
pub struct LineBuilder<'a, R> {
	walker: WordChainWalker<'a, R>,
	pronunciation: &'a dyn PronunciationService,
}

impl<'a, R: Rng> LineBuilder<'a, R> {
	pub fn new(walker: WordChainWalker<'a, R>, pronunciation: &'a dyn PronunciationService) -> Self {
		Self { walker, pronunciation }
	}

	/// Builds one line.
	///
	/// # Behavior
	/// - Fill: words are appended until the line has `min_words` words.
	/// - If the syllable ratio is then outside the open band
	///   `(min_ratio, max_ratio)`, the line is done.
	/// - Otherwise words keep being appended until the ratio leaves the band
	///   or the line reaches `max_words`.
	///
	/// Each word is the second element of a fresh 3-word walk seeded with the
	/// previous word of the line, so consecutive words are bigram neighbours
	/// whenever the chain allows it.
	///
	/// # Errors
	/// - `PoemError::InvalidLineParameters` for degenerate parameters.
	/// - `PoemError::EmptyCorpus` if the walker cannot find a word.
	pub fn build_line(&mut self, params: &LineParameters) -> Result<Line, PoemError> {
		params.validate()?;

		let mut line = Line::default();
		while line.word_count() < params.min_words {
			self.append_word(&mut line)?;
		}

		while params.in_band(line.ratio()) && line.word_count() < params.max_words {
			self.append_word(&mut line)?;
		}

		debug!(
			"Built line: {} words, {} syllables, ratio {:.2}",
			line.word_count(),
			line.syllable_count(),
			line.ratio()
		);
		Ok(line)
	}

	fn append_word(&mut self, line: &mut Line) -> Result<(), PoemError> {
		let previous = line.words().last().cloned();
		let mut probe = self.walker.generate_sequence(previous.as_deref(), LOOKAHEAD)?;
		let word = probe.swap_remove(1);
		let syllables = self.pronunciation.syllable_count(&word);
		line.push(word, syllables);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::corpus_model::CorpusModel;
	use crate::pronunciation::cmudict::CmuDictionary;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn corpus(text: &str) -> CorpusModel {
		CorpusModel::build(text.split_whitespace().map(str::to_owned).collect())
	}

	fn one_syllable_dictionary() -> CmuDictionary {
		let mut dict = CmuDictionary::new();
		for (word, phones) in [
			("the", "DH AH0"),
			("cat", "K AE1 T"),
			("sat", "S AE1 T"),
			("on", "AA1 N"),
			("mat", "M AE1 T"),
		] {
			dict.insert(word, phones);
		}
		dict
	}

	#[test]
	fn steady_ratio_extends_to_max_words() {
		let model = corpus("the cat sat on the mat");
		let dict = one_syllable_dictionary();
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(3));
		let mut builder = LineBuilder::new(walker, &dict);

		let params = LineParameters::new(3, 5).with_ratio_band(0.8, 1.2);
		for _ in 0..20 {
			let line = builder.build_line(&params).unwrap();
			assert_eq!(line.word_count(), 5);
			assert_eq!(line.syllable_count(), 5);
			assert_eq!(line.ratio(), 1.0);
		}
	}

	#[test]
	fn ratio_below_band_stops_after_fill() {
		// No word is in the dictionary: every word counts 0 syllables.
		let model = corpus("the cat sat on the mat");
		let dict = CmuDictionary::new();
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(3));
		let mut builder = LineBuilder::new(walker, &dict);

		let line = builder.build_line(&LineParameters::new(4, 12)).unwrap();
		assert_eq!(line.word_count(), 4);
		assert_eq!(line.syllable_count(), 0);
	}

	#[test]
	fn ratio_above_band_stops_after_fill() {
		let model = corpus("window lantern window");
		let mut dict = CmuDictionary::new();
		dict.insert("window", "W IH1 N D OW0");
		dict.insert("lantern", "L AE1 N T ER0 N");
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(3));
		let mut builder = LineBuilder::new(walker, &dict);

		let line = builder.build_line(&LineParameters::new(2, 9)).unwrap();
		assert_eq!(line.word_count(), 2);
		assert_eq!(line.ratio(), 2.0);
	}

	#[test]
	fn line_length_stays_within_bounds() {
		let model = corpus("to be or not to be that is the question whether tis nobler in the mind");
		let mut dict = one_syllable_dictionary();
		dict.insert("question", "K W EH1 S CH AH0 N");
		dict.insert("whether", "W EH1 DH ER0");
		dict.insert("nobler", "N OW1 B AH0 L ER0");
		dict.insert("to", "T UW1");
		dict.insert("be", "B IY1");
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(21));
		let mut builder = LineBuilder::new(walker, &dict);

		let params = LineParameters::new(4, 9).with_ratio_band(0.9, 1.1);
		for _ in 0..100 {
			let line = builder.build_line(&params).unwrap();
			assert!(line.word_count() >= 4 && line.word_count() <= 9, "{}", line);
		}
	}

	#[test]
	fn equal_min_and_max_words_gives_exact_length() {
		let model = corpus("the cat sat on the mat");
		let dict = one_syllable_dictionary();
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(3));
		let mut builder = LineBuilder::new(walker, &dict);
		assert_eq!(builder.build_line(&LineParameters::new(6, 6)).unwrap().word_count(), 6);
	}

	#[test]
	fn consecutive_words_follow_the_chain() {
		// A cycle: each word has a single successor.
		let model = corpus("one two three one two three one");
		let dict = CmuDictionary::new();
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(3));
		let mut builder = LineBuilder::new(walker, &dict);

		let line = builder.build_line(&LineParameters::new(6, 6)).unwrap();
		let next = |w: &str| match w {
			"one" => "two",
			"two" => "three",
			_ => "one",
		};
		for pair in line.words().windows(2) {
			assert_eq!(next(&pair[0]), pair[1]);
		}
	}

	#[test]
	fn display_joins_with_single_spaces() {
		let mut line = Line::blank();
		assert_eq!(line.to_string(), "");
		line.push("to".to_owned(), 1);
		line.push("sleep".to_owned(), 1);
		assert_eq!(line.to_string(), "to sleep");
	}

	#[test]
	fn invalid_parameters_fail_fast() {
		let model = corpus("the cat");
		let dict = CmuDictionary::new();
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(3));
		let mut builder = LineBuilder::new(walker, &dict);

		for params in [
			LineParameters::new(0, 5),
			LineParameters::new(6, 5),
			LineParameters::new(2, 5).with_ratio_band(0.0, 1.2),
			LineParameters::new(2, 5).with_ratio_band(-1.0, 1.2),
			LineParameters::new(2, 5).with_ratio_band(1.2, 0.8),
			LineParameters::new(2, 5).with_ratio_band(0.8, f64::NAN),
		] {
			assert!(
				matches!(builder.build_line(&params), Err(PoemError::InvalidLineParameters(_))),
				"{:?} accepted",
				params
			);
		}
	}

	#[test]
	fn empty_corpus_is_reported() {
		let model = corpus("");
		let dict = CmuDictionary::new();
		let walker = WordChainWalker::new(&model, StdRng::seed_from_u64(3));
		let mut builder = LineBuilder::new(walker, &dict);
		assert!(matches!(
			builder.build_line(&LineParameters::new(2, 4)),
			Err(PoemError::EmptyCorpus { .. })
		));
	}
}
