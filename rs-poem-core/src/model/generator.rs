use std::fmt;
use std::sync::Arc;

use log::info;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::config::PoemConfig;
use crate::error::PoemError;
use crate::model::corpus_model::CorpusModel;
use crate::model::line_builder::{Line, LineBuilder, LineParameters};
use crate::model::poem::{Poem, PoemAssembler, PoemTemplate};
use crate::model::walker::{DEFAULT_MAX_RANDOM_ATTEMPTS, Selection, WordChainWalker};
use crate::pronunciation::PronunciationService;
use crate::pronunciation::cmudict::CmuDictionary;

/// Number of chained words shown by `diagnose`.
const DIAGNOSTIC_CHAIN_LENGTH: usize = 5;

/// High-level poem generator.
///
/// # Responsibilities
/// - Own the corpus model and the pronunciation dictionary as shared,
///   read-only state
/// - Hand out per-call walkers, line builders and assemblers
/// - Produce word diagnostics
///
/// `Generator` is `Send + Sync`: each call builds its own RNG and chain
/// state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct Generator {
	model: Arc<CorpusModel>,
	pronunciation: Arc<dyn PronunciationService>,
	selection: Selection,
	max_random_attempts: usize,
	template: PoemTemplate,
	seed: Option<u64>,
}

impl Generator {
	/// Creates a generator over already-built data with default settings.
	pub fn new(model: Arc<CorpusModel>, pronunciation: Arc<dyn PronunciationService>) -> Self {
		Self {
			model,
			pronunciation,
			selection: Selection::Uniform,
			max_random_attempts: DEFAULT_MAX_RANDOM_ATTEMPTS,
			template: PoemTemplate::default(),
			seed: None,
		}
	}

	/// Loads the corpus and dictionary named by `config`.
	///
	/// # Errors
	/// - Configuration validation errors.
	/// - I/O or parse errors for the corpus or dictionary file.
	pub fn from_config(config: &PoemConfig) -> Result<Self, PoemError> {
		config.validate()?;

		let model = CorpusModel::load(&config.corpus_path, config.use_cache)?;
		let dictionary = CmuDictionary::from_file(&config.dictionary_path)?;
		info!(
			"Generator ready: {} tokens, {} dictionary words",
			model.len(),
			dictionary.len()
		);

		Ok(Self::new(Arc::new(model), Arc::new(dictionary))
			.with_selection(config.selection)
			.with_max_random_attempts(config.max_random_attempts)
			.with_template(config.template.clone())
			.with_seed(config.seed))
	}

	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.selection = selection;
		self
	}

	pub fn with_max_random_attempts(mut self, max_random_attempts: usize) -> Self {
		self.max_random_attempts = max_random_attempts;
		self
	}

	pub fn with_template(mut self, template: PoemTemplate) -> Self {
		self.template = template;
		self
	}

	/// With a seed, `generate_poem` and `diagnose` are reproducible.
	pub fn with_seed(mut self, seed: Option<u64>) -> Self {
		self.seed = seed;
		self
	}

	pub fn model(&self) -> &CorpusModel {
		&self.model
	}

	pub fn pronunciation(&self) -> &dyn PronunciationService {
		self.pronunciation.as_ref()
	}

	/// A walker over the shared model, configured with this generator's
	/// selection policy and retry bound.
	pub fn walker<R: Rng>(&self, rng: R) -> WordChainWalker<'_, R> {
		WordChainWalker::new(&self.model, rng)
			.with_selection(self.selection)
			.with_max_random_attempts(self.max_random_attempts)
	}

	/// A line builder backed by `walker(rng)` and the shared dictionary.
	pub fn line_builder<R: Rng>(&self, rng: R) -> LineBuilder<'_, R> {
		LineBuilder::new(self.walker(rng), self.pronunciation.as_ref())
	}

	/// Generates one poem using the configured template.
	pub fn generate_poem(&self) -> Result<Poem, PoemError> {
		match self.seed {
			Some(seed) => self.generate_poem_with(StdRng::seed_from_u64(seed)),
			None => self.generate_poem_with(rand::rng()),
		}
	}

	/// Generates one poem drawing randomness from `rng`.
	pub fn generate_poem_with<R: Rng>(&self, rng: R) -> Result<Poem, PoemError> {
		PoemAssembler::new(self.line_builder(rng))
			.with_template(self.template.clone())
			.assemble_poem()
	}

	/// Generates a single line.
	pub fn generate_line_with<R: Rng>(&self, rng: R, params: &LineParameters) -> Result<Line, PoemError> {
		self.line_builder(rng).build_line(params)
	}

	/// Collects everything known about `word`.
	///
	/// Bigram successors are looked up with the word as typed (the corpus is
	/// case-sensitive); pronunciation data is looked up lowercased.
	///
	/// # Errors
	/// `PoemError::EmptyCorpus` if the chain sample cannot be drawn.
	pub fn diagnose(&self, word: &str) -> Result<WordReport, PoemError> {
		let chain = match self.seed {
			Some(seed) => self.walker(StdRng::seed_from_u64(seed)).generate_sequence(Some(word), DIAGNOSTIC_CHAIN_LENGTH)?,
			None => self.walker(rand::rng()).generate_sequence(Some(word), DIAGNOSTIC_CHAIN_LENGTH)?,
		};

		let successors: Vec<(String, usize)> = self
			.model
			.successors(word)
			.map(|state| state.transitions().map(|(next, count)| (next.to_owned(), count)).collect())
			.unwrap_or_default();

		Ok(WordReport {
			word: word.to_owned(),
			successors,
			chain,
			phones: self.pronunciation.phones(word),
			syllables: self.pronunciation.syllable_count(word),
			rhymes: self.pronunciation.rhymes(word),
			stresses: self.pronunciation.stress_patterns(word),
		})
	}
}

impl fmt::Debug for Generator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Generator")
			.field("tokens", &self.model.len())
			.field("selection", &self.selection)
			.field("max_random_attempts", &self.max_random_attempts)
			.field("seed", &self.seed)
			.finish()
	}
}

/// Diagnostic view of one word: its place in the corpus chain and its
/// pronunciation data.
#[derive(Clone, Debug, PartialEq)]
pub struct WordReport {
	pub word: String,
	/// `(successor, count)` pairs from the bigram table.
	pub successors: Vec<(String, usize)>,
	/// A short random walk starting at the word.
	pub chain: Vec<String>,
	pub phones: Vec<String>,
	pub syllables: usize,
	pub rhymes: Vec<String>,
	pub stresses: Vec<String>,
}

impl fmt::Display for WordReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let successors: Vec<String> = self
			.successors
			.iter()
			.map(|(next, count)| format!("{} ({})", next, count))
			.collect();

		writeln!(f, "Successors of {}", self.word)?;
		writeln!(f, "{}", successors.join(", "))?;
		writeln!(f)?;
		writeln!(f, "Random {} words following {}", self.chain.len(), self.word)?;
		writeln!(f, "{}", self.chain.join(" "))?;
		writeln!(f)?;
		writeln!(f, "Pronunciations of {}", self.word)?;
		writeln!(f, "{}", self.phones.join(" | "))?;
		writeln!(f)?;
		writeln!(f, "Syllables in {}", self.word)?;
		writeln!(f, "{}", self.syllables)?;
		writeln!(f)?;
		writeln!(f, "Rhymes for {}", self.word)?;
		writeln!(f, "{}", self.rhymes.join(", "))?;
		writeln!(f)?;
		writeln!(f, "Stresses for {}", self.word)?;
		writeln!(f, "{}", self.stresses.join(", "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn generator() -> Generator {
		let model = CorpusModel::build(
			"the cat sat on the mat".split(' ').map(str::to_owned).collect(),
		);
		let dictionary = CmuDictionary::parse([
			"the DH AH0",
			"the(2) DH IY0",
			"cat K AE1 T",
			"sat S AE1 T",
			"on AA1 N",
			"mat M AE1 T",
		])
		.unwrap();
		Generator::new(Arc::new(model), Arc::new(dictionary))
	}

	#[test]
	fn generator_is_shareable_across_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<Generator>();
	}

	#[test]
	fn seeded_generators_repeat_themselves() {
		let generator = generator().with_seed(Some(99));
		assert_eq!(generator.generate_poem().unwrap(), generator.generate_poem().unwrap());
	}

	#[test]
	fn template_is_applied() {
		let template = PoemTemplate::new(vec![crate::model::poem::TemplateLine::Verse(LineParameters::new(2, 2))]);
		let generator = generator().with_template(template);
		let poem = generator.generate_poem().unwrap();
		assert_eq!(poem.lines().len(), 1);
		assert_eq!(poem.lines()[0].word_count(), 2);
	}

	#[test]
	fn diagnose_collects_chain_and_pronunciation() {
		let report = generator().diagnose("the").unwrap();
		assert_eq!(report.successors, vec![("cat".to_owned(), 1), ("mat".to_owned(), 1)]);
		assert_eq!(report.chain.len(), 5);
		assert_eq!(report.chain[0], "the");
		assert_eq!(report.phones, vec!["DH AH0", "DH IY0"]);
		assert_eq!(report.syllables, 1);
		assert_eq!(report.stresses, vec!["0", "0"]);
	}

	#[test]
	fn diagnose_unknown_word_is_empty_not_an_error() {
		let report = generator().diagnose("xyzzyqq").unwrap();
		assert!(report.successors.is_empty());
		assert!(report.phones.is_empty());
		assert_eq!(report.syllables, 0);
		assert!(report.rhymes.is_empty());
		assert_eq!(report.chain[0], "xyzzyqq");
	}

	#[test]
	fn report_renders_every_section() {
		let text = generator().diagnose("cat").unwrap().to_string();
		for heading in [
			"Successors of cat",
			"Random 5 words following cat",
			"Pronunciations of cat",
			"Syllables in cat",
			"Rhymes for cat",
			"Stresses for cat",
		] {
			assert!(text.contains(heading), "missing {}", heading);
		}
		assert!(text.contains("mat, sat"));
	}
}
