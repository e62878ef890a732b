use std::fmt;
use std::io;

/// Errors surfaced by corpus loading and poem generation.
///
/// Lookup misses (unknown words, no rhymes, no stresses) are never errors:
/// they come back as `0` or empty collections.
#[derive(Debug)]
pub enum PoemError {
	/// No alphabetic token could be drawn from the corpus.
	EmptyCorpus {
		/// Number of random draws made before giving up.
		attempts: usize,
	},

	/// `generate_sequence` was asked for zero words.
	InvalidSequenceLength,

	/// Degenerate `build_line` inputs.
	InvalidLineParameters(String),

	/// Malformed pronunciation dictionary line.
	Dictionary {
		line: usize,
		message: String,
	},

	/// Invalid configuration value or file.
	Config(String),

	/// Model cache could not be encoded or decoded.
	Cache(postcard::Error),

	Io(io::Error),
}

impl fmt::Display for PoemError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PoemError::EmptyCorpus { attempts } => {
				write!(f, "corpus has no alphabetic token (gave up after {} draws)", attempts)
			}
			PoemError::InvalidSequenceLength => write!(f, "sequence length must be >= 1"),
			PoemError::InvalidLineParameters(reason) => write!(f, "invalid line parameters: {}", reason),
			PoemError::Dictionary { line, message } => write!(f, "dictionary line {}: {}", line, message),
			PoemError::Config(message) => write!(f, "invalid configuration: {}", message),
			PoemError::Cache(e) => write!(f, "model cache error: {}", e),
			PoemError::Io(e) => write!(f, "i/o error: {}", e),
		}
	}
}

impl std::error::Error for PoemError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			PoemError::Cache(e) => Some(e),
			PoemError::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for PoemError {
	fn from(e: io::Error) -> Self {
		PoemError::Io(e)
	}
}

impl From<postcard::Error> for PoemError {
	fn from(e: postcard::Error) -> Self {
		PoemError::Cache(e)
	}
}

impl From<serde_json::Error> for PoemError {
	fn from(e: serde_json::Error) -> Self {
		PoemError::Config(e.to_string())
	}
}
