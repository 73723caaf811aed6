//! Word-level sentiment lexicon backing the cover-letter analyzer.
//!
//! The weights ship with the binary as a tab-separated resource (an
//! AFINN-style `word<TAB>weight` table) and are parsed once per process.

use std::collections::HashMap;
use std::sync::OnceLock;

const LEXICON_TSV: &str = include_str!("lexicon.tsv");

/// Immutable word -> weight table.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    weights: HashMap<String, i32>,
}

impl SentimentLexicon {
    /// The process-wide lexicon built from the embedded resource.
    pub fn embedded() -> &'static SentimentLexicon {
        static LEXICON: OnceLock<SentimentLexicon> = OnceLock::new();
        LEXICON.get_or_init(|| SentimentLexicon::parse(LEXICON_TSV))
    }

    fn parse(raw: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(raw.as_bytes());

        let mut weights = HashMap::new();
        for record in reader.records() {
            let Ok(record) = record else { continue };
            let (Some(word), Some(weight)) = (record.get(0), record.get(1)) else {
                continue;
            };
            let Ok(weight) = weight.trim().parse::<i32>() else {
                continue;
            };
            weights.insert(word.trim().to_lowercase(), weight);
        }

        Self { weights }
    }

    pub fn weight(&self, token: &str) -> i32 {
        self.weights.get(token).copied().unwrap_or(0)
    }

    /// Sum the weights of every recognized token in `text`.
    ///
    /// Tokens are whitespace-separated words, lowercased, with leading and
    /// trailing punctuation stripped. The result is an unbounded signed sum.
    pub fn score(&self, text: &str) -> i32 {
        text.split_whitespace()
            .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|token| !token.is_empty())
            .map(|token| self.weight(&token))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lexicon_has_signed_weights() {
        let lexicon = SentimentLexicon::embedded();
        assert!(lexicon.weight("excited") > 0);
        assert!(lexicon.weight("terrible") < 0);
        assert_eq!(lexicon.weight("internship"), 0);
    }

    #[test]
    fn score_sums_token_weights() {
        let lexicon = SentimentLexicon::embedded();
        let expected = lexicon.weight("excited") + lexicon.weight("thrilled");
        assert_eq!(lexicon.score("I am excited and thrilled."), expected);
    }

    #[test]
    fn score_strips_punctuation_and_case() {
        let lexicon = SentimentLexicon::embedded();
        assert_eq!(lexicon.score("Excited!"), lexicon.weight("excited"));
        assert_eq!(lexicon.score(""), 0);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let lexicon = SentimentLexicon::parse("good\t3\nbroken-row\nbad\tNaN\nawful\t-3\n");
        assert_eq!(lexicon.weight("good"), 3);
        assert_eq!(lexicon.weight("awful"), -3);
        assert_eq!(lexicon.weight("bad"), 0);
    }
}
