//! URL slug generation
//!
//! Slugs are derived from titles: diacritics are stripped via NFD
//! decomposition, the text is lowercased and trimmed, whitespace runs become
//! a single hyphen, anything outside `[a-z0-9_-]` is dropped and repeated
//! hyphens are collapsed.

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Turn arbitrary text into a URL-friendly slug
pub fn slugify(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !COMBINING_MARKS.contains(c)).collect();
    let lowered = stripped.to_lowercase();

    let mut hyphenated = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                hyphenated.push('-');
            }
            in_whitespace = true;
        } else {
            hyphenated.push(c);
            in_whitespace = false;
        }
    }

    let mut slug = String::with_capacity(hyphenated.len());
    for c in hyphenated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
    {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics_and_punctuation() {
        assert_eq!(slugify("Café de Flore!!"), "cafe-de-flore");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("tabs\tand\nnewlines"), "tabs-and-newlines");
    }

    #[test]
    fn test_collapses_repeated_hyphens() {
        assert_eq!(slugify("rock -- and -- roll"), "rock-and-roll");
        assert_eq!(slugify("a---b"), "a-b");
    }

    #[test]
    fn test_keeps_underscores_and_digits() {
        assert_eq!(slugify("Top_10 Beaches 2024"), "top_10-beaches-2024");
    }

    #[test]
    fn test_italian_title() {
        assert_eq!(
            slugify("Le Cinque Terre: Un Viaggio tra Borghi Sospesi tra Cielo e Mare"),
            "le-cinque-terre-un-viaggio-tra-borghi-sospesi-tra-cielo-e-mare"
        );
        assert_eq!(slugify("Perché è così"), "perche-e-cosi");
    }

    #[test]
    fn test_non_latin_text_is_dropped() {
        assert_eq!(slugify("京都 Kyoto"), "-kyoto");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_deterministic() {
        let title = "Hidden Gems of the Amalfi Coast";
        assert_eq!(slugify(title), slugify(title));
        assert_eq!(slugify(title), "hidden-gems-of-the-amalfi-coast");
    }
}
