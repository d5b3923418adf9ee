//! Tokenizing strings for the edit engine
//!
//! Plain text is split per `char`. When either string carries combining
//! marks or astral codepoints, both are split into glyphs instead: a base
//! codepoint plus any combining marks trailing it, so an interpolated string
//! never strands an accent away from its letter.

use regex::Regex;
use std::sync::OnceLock;

const COMBINING: &str = r"\u{0300}-\u{036F}\u{1DC0}-\u{1DFF}\u{20D0}-\u{20FF}\u{FE20}-\u{FE2F}";

fn multi_codepoint() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"[{COMBINING}\u{{10000}}-\u{{10FFFF}}]")).expect("valid glyph pattern")
    })
}

fn glyph() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"(?s).[{COMBINING}]*")).expect("valid glyph pattern"))
}

/// Whether `text` needs glyph tokenization
pub fn has_multi_codepoint_glyphs(text: &str) -> bool {
    multi_codepoint().is_match(text)
}

/// One token per `char`
pub fn chars(text: &str) -> Vec<&str> {
    text.char_indices()
        .map(|(start, c)| &text[start..start + c.len_utf8()])
        .collect()
}

/// One token per base codepoint and its trailing combining marks
pub fn glyphs(text: &str) -> Vec<&str> {
    glyph().find_iter(text).map(|m| m.as_str()).collect()
}

/// Tokenize both strings with the same strategy
pub fn tokenize_pair<'a>(source: &'a str, target: &'a str) -> (Vec<&'a str>, Vec<&'a str>) {
    if has_multi_codepoint_glyphs(source) || has_multi_codepoint_glyphs(target) {
        (glyphs(source), glyphs(target))
    } else {
        (chars(source), chars(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_per_char() {
        assert!(!has_multi_codepoint_glyphs("plain ascii and é"));
        assert_eq!(chars("héllo"), vec!["h", "é", "l", "l", "o"]);
    }

    #[test]
    fn test_combining_marks_stay_with_base() {
        let text = "e\u{0301}a\u{0300}\u{0323}z";
        assert!(has_multi_codepoint_glyphs(text));
        assert_eq!(glyphs(text), vec!["e\u{0301}", "a\u{0300}\u{0323}", "z"]);
    }

    #[test]
    fn test_astral_codepoints_trigger_glyph_mode() {
        let (a, b) = tokenize_pair("a😀b", "ab");
        assert_eq!(a, vec!["a", "😀", "b"]);
        assert_eq!(b, vec!["a", "b"]);
    }

    #[test]
    fn test_glyphs_concatenate_back() {
        let text = "n\u{0303}o\u{0308}\u{20D7}!";
        assert_eq!(glyphs(text).concat(), text);
    }
}
