//! Top-level module for the poem generation system.
//!
//! This module provides:
//! - The bigram corpus model (`CorpusModel`)
//! - Internal per-word chain state (`WordState`)
//! - The chain random walk (`WordChainWalker`)
//! - Constrained line construction (`LineBuilder`)
//! - Template-driven poem layout (`PoemAssembler`)
//! - A high-level generation interface (`Generator`)

/// High-level interface owning the shared corpus model and dictionary.
///
/// Exposes loading from configuration, poem generation and word diagnostics.
pub mod generator;

/// Bigram model over an ordered token sequence.
///
/// Supports sequential and parallel construction, merging,
/// binary caching and random alphabetic draws.
pub mod corpus_model;

/// Random walk over the bigram chain with fallback to random words.
pub mod walker;

/// Line construction under word-count and syllable-ratio constraints.
pub mod line_builder;

/// Poem templates and assembly.
pub mod poem;

/// Successor table of a single word.
///
/// Tracks outgoing transitions and supports uniform or weighted sampling.
pub mod state;
