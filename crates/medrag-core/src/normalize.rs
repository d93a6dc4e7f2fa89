//! Canonical text form shared by the embedder input and the string metrics.
//!
//! The result is lowercase ASCII with markup removed, whitespace collapsed
//! and trimmed. Characters without an ASCII decomposition are deleted, which
//! includes typographic quotes and dashes (`don’t` becomes `dont`).
//!
//! Folding to ASCII runs before lowercasing and tag removal so that
//! compatibility decompositions (fullwidth `＜`, letterlike `ℌ`) cannot
//! reintroduce tags or capitals, which keeps `normalize` idempotent.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("static tag pattern"))
}

fn whitespace_pattern() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// Fold `text` to ASCII: decompose (NFKD), drop the rest.
fn fold_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Normalise arbitrary text. Pure and total; the empty string maps to itself.
pub fn normalize(text: &str) -> String {
    let folded = fold_ascii(text).to_ascii_lowercase();
    let untagged = tag_pattern().replace_all(&folded, " ");
    whitespace_pattern().replace_all(&untagged, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_drops_unmappable() {
        assert_eq!(fold_ascii("café naïve"), "cafe naive");
        assert_eq!(fold_ascii("dose: 5 µg ☃"), "dose: 5 g ");
    }

    #[test]
    fn drops_typographic_punctuation() {
        assert_eq!(fold_ascii("\u{201C}it\u{2019}s\u{201D} \u{2014} ok"), "its  ok");
    }
}
