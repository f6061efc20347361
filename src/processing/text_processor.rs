//! Text normalization for offer texts

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    glyph_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        // Bullets, arrows and emoji commonly pasted into job offers
        let glyph_regex = Regex::new("[•\u{2022}▪\u{FE0F}➡✅👉🔎🚀🧠🤝🎁📌🔧💼📝⭐]+")
            .expect("Invalid glyph regex");

        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            glyph_regex,
            whitespace_regex,
        }
    }

    /// Strip decorative glyphs, replace carriage returns, collapse whitespace
    /// and trim. Idempotent.
    pub fn normalize(&self, text: &str) -> String {
        let without_glyphs = self.glyph_regex.replace_all(text, " ");
        let without_cr = without_glyphs.replace('\r', " ");
        self.collapse_whitespace(&without_cr)
    }

    pub fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace_regex.replace_all(text, " ").trim().to_string()
    }

    /// Lowercased word tokens of at least two characters
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().count() > 1)
            .collect()
    }
}
