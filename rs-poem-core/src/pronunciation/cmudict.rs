use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::error::PoemError;
use crate::io::read_file;
use super::{PronunciationService, rhyming_part};

/// In-memory CMU pronouncing dictionary.
///
/// Entries follow the `cmudict.dict` format, one pronunciation per line:
///
/// ```text
/// a AH0
/// a(2) EY1
/// achill AE1 K IH0 L # place, irish
/// ```
///
/// `(N)` marks an alternate pronunciation of the same word; everything after
/// `#` is a comment. Lines starting with `;;;` (older releases) are ignored.
///
/// # Invariants
/// - Keys of `entries` are lowercase.
/// - `rhyme_index` maps every variant's rhyming part to the words having it.
#[derive(Debug, Default, Clone)]
pub struct CmuDictionary {
	entries: HashMap<String, Vec<String>>,
	rhyme_index: HashMap<String, Vec<String>>,
}

impl CmuDictionary {
	/// Creates an empty dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a dictionary from a `cmudict.dict` file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PoemError> {
		let lines = read_file(&path)?;
		let dictionary = Self::parse(lines.iter().map(String::as_str))?;
		info!("Loaded {} dictionary words from {}", dictionary.len(), path.as_ref().display());
		Ok(dictionary)
	}

	/// Builds a dictionary from `cmudict` formatted lines.
	///
	/// # Errors
	/// `PoemError::Dictionary` for a word without phonemes or a malformed
	/// phoneme.
	pub fn parse<'a, I>(lines: I) -> Result<Self, PoemError>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut dictionary = Self::new();
		for (index, raw) in lines.into_iter().enumerate() {
			let line_number = index + 1;
			if raw.starts_with(";;;") {
				continue;
			}
			let line = match raw.find('#') {
				Some(start) => &raw[..start],
				None => raw,
			};

			let mut fields = line.split_whitespace();
			let Some(term) = fields.next() else {
				continue;
			};
			let phonemes: Vec<&str> = fields.collect();
			if phonemes.is_empty() {
				return Err(PoemError::Dictionary {
					line: line_number,
					message: format!("'{}' has no phonemes", term),
				});
			}
			if let Some(bad) = phonemes.iter().find(|p| !is_phoneme(p)) {
				return Err(PoemError::Dictionary {
					line: line_number,
					message: format!("invalid phoneme '{}'", bad),
				});
			}

			dictionary.insert(strip_variant(term), &phonemes.join(" "));
		}
		Ok(dictionary)
	}

	/// Adds one pronunciation of `word`.
	pub fn insert(&mut self, word: &str, phones: &str) {
		let word = word.to_lowercase();
		self.rhyme_index.entry(rhyming_part(phones)).or_default().push(word.clone());
		self.entries.entry(word).or_default().push(phones.to_owned());
	}

	/// Number of distinct words.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl PronunciationService for CmuDictionary {
	fn phones(&self, word: &str) -> Vec<String> {
		self.entries.get(&word.to_lowercase()).cloned().unwrap_or_default()
	}

	fn rhymes(&self, word: &str) -> Vec<String> {
		let word = word.to_lowercase();
		let mut rhymes: Vec<String> = self
			.phones(&word)
			.iter()
			.filter_map(|phones| self.rhyme_index.get(&rhyming_part(phones)))
			.flatten()
			.filter(|candidate| **candidate != word)
			.cloned()
			.collect();
		rhymes.sort();
		rhymes.dedup();
		rhymes
	}
}

/// `"aluminium(2)"` → `"aluminium"`
fn strip_variant(term: &str) -> &str {
	let Some(open) = term.rfind('(') else {
		return term;
	};
	let Some(variant) = term[open + 1..].strip_suffix(')') else {
		return term;
	};
	if !variant.is_empty() && variant.chars().all(|c| c.is_ascii_digit()) {
		&term[..open]
	} else {
		term
	}
}

/// Uppercase ARPABET symbol with an optional 0/1/2 stress digit.
fn is_phoneme(phoneme: &str) -> bool {
	let symbol = phoneme.trim_end_matches(['0', '1', '2']);
	!symbol.is_empty() && phoneme.len() - symbol.len() <= 1 && symbol.chars().all(|c| c.is_ascii_uppercase())
}
