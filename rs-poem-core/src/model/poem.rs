use std::fmt;

use log::debug;
use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::PoemError;
use super::line_builder::{Line, LineBuilder, LineParameters};

/// One slot of a poem template.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TemplateLine {
	/// Stanza separator.
	Blank,
	/// A generated line built with the given constraints.
	Verse(LineParameters),
}

/// Layout of a poem: blank separators and per-line constraints, in order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoemTemplate {
	lines: Vec<TemplateLine>,
}

impl PoemTemplate {
	pub fn new(lines: Vec<TemplateLine>) -> Self {
		Self { lines }
	}

	pub fn lines(&self) -> &[TemplateLine] {
		&self.lines
	}

	/// Validates every verse slot.
	pub fn validate(&self) -> Result<(), PoemError> {
		for line in &self.lines {
			if let TemplateLine::Verse(params) = line {
				params.validate()?;
			}
		}
		Ok(())
	}
}

impl Default for PoemTemplate {
	/// Two quatrains, each preceded by a blank line. The first uses the
	/// default `(0.8, 1.2)` band; the second alternates tighter bands.
	fn default() -> Self {
		let verse = |min_ratio: f64, max_ratio: f64| {
			TemplateLine::Verse(LineParameters::new(10, 20).with_ratio_band(min_ratio, max_ratio))
		};
		Self::new(vec![
			TemplateLine::Blank,
			verse(0.8, 1.2),
			verse(0.8, 1.2),
			verse(0.8, 1.2),
			verse(0.8, 1.2),
			TemplateLine::Blank,
			verse(0.85, 1.15),
			verse(0.9, 1.1),
			verse(0.85, 1.15),
			verse(0.9, 1.1),
		])
	}
}

/// An assembled poem. Displayed as its lines joined by `\n`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Poem {
	lines: Vec<Line>,
}

impl Poem {
	pub fn lines(&self) -> &[Line] {
		&self.lines
	}

	/// Lines that carry words.
	pub fn verses(&self) -> impl Iterator<Item = &Line> {
		self.lines.iter().filter(|line| !line.is_blank())
	}
}

impl fmt::Display for Poem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, line) in self.lines.iter().enumerate() {
			if i > 0 {
				writeln!(f)?;
			}
			write!(f, "{}", line)?;
		}
		Ok(())
	}
}

/// Lays out a poem from a template, building each verse with a `LineBuilder`.
///
/// No rhyme or cross-line constraint is applied; lines are independent.
pub struct PoemAssembler<'a, R> {
	builder: LineBuilder<'a, R>,
	template: PoemTemplate,
}

impl<'a, R: Rng> PoemAssembler<'a, R> {
	/// Assembler using the default two-quatrain template.
	pub fn new(builder: LineBuilder<'a, R>) -> Self {
		Self { builder, template: PoemTemplate::default() }
	}

	pub fn with_template(mut self, template: PoemTemplate) -> Self {
		self.template = template;
		self
	}

	pub fn template(&self) -> &PoemTemplate {
		&self.template
	}

	/// Builds every line of the template in order.
	///
	/// # Errors
	/// - `PoemError::InvalidLineParameters` if any verse slot is invalid,
	///   reported before any line is built.
	/// - `PoemError::EmptyCorpus` if the corpus cannot feed a line.
	pub fn assemble_poem(&mut self) -> Result<Poem, PoemError> {
		self.template.validate()?;

		let mut lines = Vec::with_capacity(self.template.lines.len());
		for slot in &self.template.lines {
			let line = match slot {
				TemplateLine::Blank => Line::blank(),
				TemplateLine::Verse(params) => self.builder.build_line(params)?,
			};
			lines.push(line);
		}

		debug!("Assembled poem of {} lines", lines.len());
		Ok(Poem { lines })
	}
}
