use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::io;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Reads a corpus file and returns its tokens in reading order.
pub(crate) fn read_tokens<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let lines = read_file(filename)?;
	Ok(lines.iter().flat_map(|line| tokenize(line)).collect())
}

#[derive(PartialEq, Clone, Copy)]
enum CharClass {
	Word,
	Punct,
	Space,
}

fn classify(c: char) -> CharClass {
	if c.is_alphanumeric() || c == '_' {
		CharClass::Word
	} else if c.is_whitespace() {
		CharClass::Space
	} else {
		CharClass::Punct
	}
}

/// Splits text into word and punctuation tokens.
///
/// A token is a maximal run of word characters (alphanumerics and `_`) or a
/// maximal run of other non-space characters. Whitespace only separates.
///
/// Example:
/// `"Who's there?"` → `["Who", "'", "s", "there", "?"]`
pub fn tokenize(text: &str) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut current = String::new();
	let mut current_class = CharClass::Space;

	for c in text.chars() {
		let class = classify(c);
		if class != current_class && !current.is_empty() {
			tokens.push(std::mem::take(&mut current));
		}
		if class != CharClass::Space {
			current.push(c);
		}
		current_class = class;
	}
	if !current.is_empty() {
		tokens.push(current);
	}

	tokens
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/corpus.txt` + `"bin"` → `data/corpus.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}
