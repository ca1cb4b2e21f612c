//! Clinical note normalizer.
//!
//! Handles:
//! - Lower-casing for case-insensitive matching
//! - Whitespace collapsing (line breaks inside phrases still match)
//! - Typographic dash folding (en/em dash → hyphen)

/// A note prepared for phrase matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Whether a phrase occurs in the note (case-insensitive substring).
    ///
    /// The phrase is folded like the note, except that a leading or trailing
    /// space is kept and must match.
    pub fn contains(&self, phrase: &str) -> bool {
        let phrase = fold(phrase);
        if phrase.trim().is_empty() {
            return false;
        }
        self.0.contains(&phrase)
    }

    /// Whether any of the phrases occurs in the note.
    pub fn contains_any<S: AsRef<str>>(&self, phrases: &[S]) -> bool {
        phrases.iter().any(|p| self.contains(p.as_ref()))
    }

    /// A copy of the note with every occurrence of the phrases blanked out.
    pub fn without<S: AsRef<str>>(&self, phrases: &[S]) -> NormalizedText {
        let mut text = self.0.clone();
        for phrase in phrases {
            let phrase = fold(phrase.as_ref());
            if !phrase.trim().is_empty() {
                text = text.replace(&phrase, " ");
            }
        }
        NormalizedText(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Dash folding, whitespace runs to a single space, lower-casing. Does not trim.
fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        out.push(match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        });
    }

    out.to_lowercase()
}

/// Normalizer for free-text clinical notes.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a note for matching.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        NormalizedText(fold(text).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_collapses() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("  Worsening COPD,\n\trespiratory   rate 24 ");

        assert_eq!(text.as_str(), "worsening copd, respiratory rate 24");
    }

    #[test]
    fn test_phrase_across_line_break() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("signs of pulmonary\nedema");

        assert!(text.contains("pulmonary edema"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("Starting IV Lasix 40mg");

        assert!(text.contains("IV Lasix"));
        assert!(text.contains("iv lasix"));
        assert!(!text.contains("bumex"));
    }

    #[test]
    fn test_empty_phrase_never_matches() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("anything");

        assert!(!text.contains(""));
        assert!(!text.contains("   "));
    }

    #[test]
    fn test_dash_folding() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("Expect 3\u{2013}4 day stay");

        assert_eq!(text.as_str(), "expect 3-4 day stay");
    }

    #[test]
    fn test_phrase_folded_like_note() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("Expect 3-4 day stay");

        assert!(text.contains("3\u{2013}4 day"));
        assert!(text.contains("expect  3-4\tday"));
    }

    #[test]
    fn test_phrase_edge_spaces_are_significant() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("Admit patient to medicine");

        assert!(text.contains("admit "));
        assert!(!normalizer.normalize("Patient admits to smoking").contains("admit "));
    }

    #[test]
    fn test_without_blanks_phrases() {
        let normalizer = Normalizer::new();
        let text = normalizer.normalize("JVD observed, observe overnight");
        let masked = text.without(&["observed"]);

        assert_eq!(masked.as_str(), "jvd  , observe overnight");
        assert!(masked.contains("observe"));
        assert!(!text.without(&["observed", "observe"]).contains("observe"));
    }
}
