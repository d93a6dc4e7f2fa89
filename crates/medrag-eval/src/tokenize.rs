//! Tokenizers matching the conventions of each metric's reference tooling.

use regex::Regex;
use std::sync::OnceLock;

fn static_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern"))
}

/// Treebank clitics split off the end of a word.
const CLITICS: [&str; 7] = ["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

fn push_word(out: &mut Vec<String>, word: &str) {
    for clitic in CLITICS {
        if word.len() > clitic.len() && word.ends_with(clitic) {
            let cut = word.len() - clitic.len();
            out.push(word[..cut].to_string());
            out.push(word[cut..].to_string());
            return;
        }
    }
    out.push(word.to_string());
}

/// Lowercased word tokens in the Penn Treebank manner: numbers keep their
/// decimal point or thousands separator (`3.5`, `1,000`), clitics are split
/// (`don't` is `do` `n't`, `it's` is `it` `'s`), hyphenated words stay whole
/// and every other punctuation mark is its own token.
pub fn word_tokens(text: &str) -> Vec<String> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let re = static_regex(&WORD, r"\d+(?:[.,]\d+)*|\w+(?:['\-]\w+)*|[^\w\s]");
    let lower = text.to_lowercase();
    let mut out = Vec::new();
    for m in re.find_iter(&lower) {
        push_word(&mut out, m.as_str());
    }
    out
}

/// ROUGE tokens: lowercase, anything outside `[a-z0-9]` separates tokens.
pub fn rouge_tokens(text: &str) -> Vec<String> {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = static_regex(&NON_ALNUM, r"[^a-z0-9]+");
    let lower = text.to_lowercase();
    re.replace_all(&lower, " ").split_whitespace().map(str::to_string).collect()
}

/// The `13a` tokenizer used for BLEU (mteval-v13a): punctuation is split off,
/// except periods and commas inside numbers and dashes not preceded by a digit.
pub fn tokenize_13a(line: &str) -> Vec<String> {
    static PUNCT: OnceLock<Regex> = OnceLock::new();
    static PERIOD_COMMA_BEFORE: OnceLock<Regex> = OnceLock::new();
    static PERIOD_COMMA_AFTER: OnceLock<Regex> = OnceLock::new();
    static DIGIT_DASH: OnceLock<Regex> = OnceLock::new();

    let mut line = line.replace("<skipped>", "").replace("-\n", "").replace('\n', " ");
    if line.contains('&') {
        line = line.replace("&quot;", "\"").replace("&amp;", "&").replace("&lt;", "<").replace("&gt;", ">");
    }
    let line = format!(" {line} ");
    let line = static_regex(&PUNCT, r"([{-~\[-` -&(-+:-@/])").replace_all(&line, " ${1} ");
    let line = static_regex(&PERIOD_COMMA_BEFORE, r"([^0-9])([\.,])").replace_all(&line, "${1} ${2} ");
    let line = static_regex(&PERIOD_COMMA_AFTER, r"([\.,])([^0-9])").replace_all(&line, " ${1} ${2}");
    let line = static_regex(&DIGIT_DASH, r"([0-9])(-)").replace_all(&line, "${1} ${2} ");
    line.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_a_splits_punctuation() {
        assert_eq!(tokenize_13a("Hello, world."), vec!["Hello", ",", "world", "."]);
        assert_eq!(tokenize_13a("costs $3.50-4"), vec!["costs", "$", "3.50", "-", "4"]);
        assert_eq!(tokenize_13a("a &amp; b"), vec!["a", "&", "b"]);
    }

    #[test]
    fn word_tokens_split_clitics_and_keep_decimals() {
        assert_eq!(word_tokens("it's 3.5 mg"), vec!["it", "'s", "3.5", "mg"]);
        assert_eq!(word_tokens("Don't skip; we'll see"), vec!["do", "n't", "skip", ";", "we", "'ll", "see"]);
        assert_eq!(word_tokens("1,000 units, covid-19."), vec!["1,000", "units", ",", "covid-19", "."]);
    }

    #[test]
    fn word_and_rouge_tokens() {
        assert_eq!(word_tokens("It's well-known, OK?"), vec!["it", "'s", "well-known", ",", "ok", "?"]);
        assert_eq!(rouge_tokens("It's well-known, OK?"), vec!["it", "s", "well", "known", "ok"]);
        assert!(word_tokens("   ").is_empty());
    }
}
