//! Pronunciation lookups: syllables, rhymes and stress patterns.
//!
//! Transcriptions use ARPABET phonemes as found in the CMU pronouncing
//! dictionary. Vowel phonemes carry a stress digit (`AH0`, `EY1`, `AE2`):
//! 0 is unstressed, 1 primary stress, 2 secondary stress. One vowel is one
//! syllable.

/// CMU pronouncing dictionary backed implementation.
pub mod cmudict;

/// Source of pronunciation data for words.
///
/// Implementations are pure lookups keyed by the lowercased word; unknown
/// words yield empty results, never errors. The trait is object safe so a
/// generator can hold any dictionary behind an `Arc<dyn PronunciationService>`.
pub trait PronunciationService: Send + Sync {
	/// Every phonetic transcription of `word`, one per pronunciation variant.
	fn phones(&self, word: &str) -> Vec<String>;

	/// Words sharing the rhyming part of any variant of `word`, excluding
	/// `word` itself, sorted and de-duplicated.
	fn rhymes(&self, word: &str) -> Vec<String>;

	/// Maximum syllable count across variants, `0` if the word is unknown.
	fn syllable_count(&self, word: &str) -> usize {
		self.phones(word).iter().map(|p| syllable_count(p)).max().unwrap_or(0)
	}

	/// One stress string per variant, e.g. `"010"` for "tomorrow".
	fn stress_patterns(&self, word: &str) -> Vec<String> {
		self.phones(word).iter().map(|p| stresses(p)).collect()
	}
}

/// The stress digits of a transcription, in order.
///
/// `"T AH0 M AA1 R OW2"` → `"012"`
pub fn stresses(phones: &str) -> String {
	phones.chars().filter(|c| matches!(c, '0' | '1' | '2')).collect()
}

/// Number of syllables (vowel phonemes) in a transcription.
pub fn syllable_count(phones: &str) -> usize {
	stresses(phones).len()
}

/// The part of a transcription that has to match for two words to rhyme.
///
/// Runs from the last vowel carrying primary or secondary stress to the end.
/// A transcription without such a vowel after its first phoneme is returned
/// whole.
///
/// `"S IH1 T IY0"` → `"IH1 T IY0"`
pub fn rhyming_part(phones: &str) -> String {
	let phonemes: Vec<&str> = phones.split_whitespace().collect();
	for i in (1..phonemes.len()).rev() {
		if phonemes[i].ends_with('1') || phonemes[i].ends_with('2') {
			return phonemes[i..].join(" ");
		}
	}
	phonemes.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stresses_keep_only_digits() {
		assert_eq!(stresses("T AH0 M AA1 R OW2"), "012");
		assert_eq!(stresses("K AE1 T"), "1");
		assert_eq!(stresses(""), "");
	}

	#[test]
	fn syllables_count_vowels() {
		assert_eq!(syllable_count("AE1 P AH0 L"), 2);
		assert_eq!(syllable_count("S T R EH1 NG K TH S"), 1);
	}

	#[test]
	fn rhyming_part_starts_at_last_stressed_vowel() {
		assert_eq!(rhyming_part("S IH1 T IY0"), "IH1 T IY0");
		assert_eq!(rhyming_part("P R OW1 G R AE2 M"), "AE2 M");
		assert_eq!(rhyming_part("K AE1 T"), "AE1 T");
	}

	#[test]
	fn rhyming_part_without_late_stress_is_whole() {
		assert_eq!(rhyming_part("AY1"), "AY1");
		assert_eq!(rhyming_part("AH0"), "AH0");
		assert_eq!(rhyming_part("DH AH0"), "DH AH0");
	}
}
