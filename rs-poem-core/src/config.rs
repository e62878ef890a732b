use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PoemError;
use crate::model::poem::PoemTemplate;
use crate::model::walker::{DEFAULT_MAX_RANDOM_ATTEMPTS, Selection};

/// Settings for loading data and generating poems.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "corpus_path": "data/hamlet.txt", "selection": "weighted", "seed": 42 }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PoemConfig {
	/// Plain text corpus, tokenized on load.
	pub corpus_path: PathBuf,
	/// Pronunciation dictionary in `cmudict.dict` format.
	pub dictionary_path: PathBuf,
	/// Load/store the counted model as `<corpus>.bin`.
	pub use_cache: bool,
	/// Random draws allowed when looking for an alphabetic word.
	pub max_random_attempts: usize,
	pub selection: Selection,
	/// Fixed RNG seed; every poem is then identical for the same data.
	pub seed: Option<u64>,
	pub template: PoemTemplate,
}

impl Default for PoemConfig {
	fn default() -> Self {
		Self {
			corpus_path: PathBuf::from("./data/corpus.txt"),
			dictionary_path: PathBuf::from("./data/cmudict.dict"),
			use_cache: true,
			max_random_attempts: DEFAULT_MAX_RANDOM_ATTEMPTS,
			selection: Selection::Uniform,
			seed: None,
			template: PoemTemplate::default(),
		}
	}
}

impl PoemConfig {
	/// Reads a JSON configuration file. Missing keys keep their defaults.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PoemError> {
		let text = std::fs::read_to_string(path)?;
		let config: Self = serde_json::from_str(&text)?;
		config.validate()?;
		Ok(config)
	}

	/// # Errors
	/// `PoemError::Config` for a zero retry bound, or the template's own
	/// validation error.
	pub fn validate(&self) -> Result<(), PoemError> {
		if self.max_random_attempts == 0 {
			return Err(PoemError::Config("max_random_attempts must be >= 1".to_owned()));
		}
		self.template.validate()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::line_builder::LineParameters;
	use crate::model::poem::TemplateLine;

	#[test]
	fn partial_file_keeps_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("poem.json");
		std::fs::write(&path, r#"{ "corpus_path": "hamlet.txt", "selection": "weighted", "seed": 42 }"#).unwrap();

		let config = PoemConfig::from_file(&path).unwrap();
		assert_eq!(config.corpus_path, PathBuf::from("hamlet.txt"));
		assert_eq!(config.selection, Selection::Weighted);
		assert_eq!(config.seed, Some(42));
		assert_eq!(config.dictionary_path, PoemConfig::default().dictionary_path);
		assert_eq!(config.template, PoemTemplate::default());
	}

	#[test]
	fn template_can_be_configured() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("poem.json");
		std::fs::write(
			&path,
			r#"{ "template": { "lines": [
				"blank",
				{ "verse": { "min_words": 3, "max_words": 6, "min_ratio": 0.5, "max_ratio": 1.5 } }
			] } }"#,
		)
		.unwrap();

		let config = PoemConfig::from_file(&path).unwrap();
		assert_eq!(
			config.template.lines(),
			&[
				TemplateLine::Blank,
				TemplateLine::Verse(LineParameters::new(3, 6).with_ratio_band(0.5, 1.5)),
			]
		);
	}

	#[test]
	fn invalid_values_are_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("poem.json");

		std::fs::write(&path, r#"{ "max_random_attempts": 0 }"#).unwrap();
		assert!(matches!(PoemConfig::from_file(&path), Err(PoemError::Config(_))));

		std::fs::write(&path, r#"{ "selection": "loudest" }"#).unwrap();
		assert!(matches!(PoemConfig::from_file(&path), Err(PoemError::Config(_))));

		std::fs::write(
			&path,
			r#"{ "template": { "lines": [ { "verse": { "min_words": 9, "max_words": 2, "min_ratio": 0.8, "max_ratio": 1.2 } } ] } }"#,
		)
		.unwrap();
		assert!(matches!(PoemConfig::from_file(&path), Err(PoemError::InvalidLineParameters(_))));
	}

	#[test]
	fn missing_file_is_an_io_error() {
		assert!(matches!(PoemConfig::from_file("/nonexistent/poem.json"), Err(PoemError::Io(_))));
	}
}
