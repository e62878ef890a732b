//! Bigram-chain poem generation library.
//!
//! This crate provides:
//! - A bigram model built from a tokenized corpus
//! - A random walk over that model with fallback to random words
//! - Line construction driven by a syllables-per-word ratio band
//! - Template-based poem assembly
//! - Pronunciation lookups (syllables, rhymes, stresses) over the CMU dictionary
//!
//! Corpus tokenization and dictionary parsing are adapters; the generation
//! core only needs a token sequence and a `PronunciationService`.

/// Core models and generation logic.
pub mod model;

/// Pronunciation service trait and the CMU dictionary implementation.
pub mod pronunciation;

/// Generation settings, loadable from JSON.
pub mod config;

/// Error type shared by every fallible operation.
pub mod error;

/// I/O utilities (file loading, tokenizing, path helpers).
///
/// Only the tokenizer is exposed.
pub(crate) mod io;

pub use config::PoemConfig;
pub use error::PoemError;
pub use io::tokenize;
pub use model::corpus_model::{CorpusModel, is_alphabetic};
pub use model::generator::{Generator, WordReport};
pub use model::line_builder::{Line, LineBuilder, LineParameters};
pub use model::poem::{Poem, PoemAssembler, PoemTemplate, TemplateLine};
pub use model::walker::{Selection, WordChainWalker};
pub use pronunciation::PronunciationService;
pub use pronunciation::cmudict::CmuDictionary;
