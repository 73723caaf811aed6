//! Heuristic red-flag checks applied to cover letters.
//!
//! All checks run on a lowercased copy of the letter and accumulate
//! independently in a fixed order.

use serde::{Serialize, Serializer};

const BUZZWORDS: [&str; 4] = ["passionate", "hardworking", "team player", "detail-oriented"];
const MIN_WORD_COUNT: usize = 50;
const MAX_BUZZWORD_USES: usize = 3;

/// A heuristic signal that a cover letter may be weak or generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedFlag {
    GenericSalutation,
    NoCompanyReference,
    TooShort,
    BuzzwordOveruse,
}

impl RedFlag {
    /// Reader-facing message, also the wire representation.
    pub const fn message(self) -> &'static str {
        match self {
            RedFlag::GenericSalutation => {
                "Using generic salutation instead of personalized greeting"
            }
            RedFlag::NoCompanyReference => "Cover letter lacks company-specific references",
            RedFlag::TooShort => "Cover letter is too short (less than 50 words)",
            RedFlag::BuzzwordOveruse => "Overuse of generic buzzwords",
        }
    }
}

impl Serialize for RedFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Run every check against `text`, in order.
pub fn detect(text: &str) -> Vec<RedFlag> {
    let lowered = text.to_lowercase();
    let mut flags = Vec::new();

    if lowered.contains("to whom it may concern") {
        flags.push(RedFlag::GenericSalutation);
    }

    if !lowered.contains("company") && !lowered.contains("organization") {
        flags.push(RedFlag::NoCompanyReference);
    }

    if text.split_whitespace().count() < MIN_WORD_COUNT {
        flags.push(RedFlag::TooShort);
    }

    let buzzword_uses: usize = BUZZWORDS
        .iter()
        .map(|word| lowered.matches(word).count())
        .sum();
    if buzzword_uses > MAX_BUZZWORD_USES {
        flags.push(RedFlag::BuzzwordOveruse);
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_salutation_is_flagged_case_insensitively() {
        let flags = detect("To Whom It May Concern. I am excited.");
        assert!(flags.contains(&RedFlag::GenericSalutation));
    }

    #[test]
    fn short_letters_are_flagged() {
        let flags = detect("I want this internship at your company very much indeed.");
        assert!(flags.contains(&RedFlag::TooShort));
        assert!(!flags.contains(&RedFlag::NoCompanyReference));
    }

    #[test]
    fn missing_company_reference_is_flagged() {
        let flags = detect("I am a strong engineer and I love building things.");
        assert!(flags.contains(&RedFlag::NoCompanyReference));
    }

    #[test]
    fn buzzword_overuse_counts_across_the_whole_set() {
        let letter = "passionate passionate passionate passionate passionate company";
        let flags = detect(letter);
        assert!(flags.contains(&RedFlag::BuzzwordOveruse));

        // Three uses stay under the threshold.
        let mild = "passionate hardworking team player company";
        assert!(!detect(mild).contains(&RedFlag::BuzzwordOveruse));
    }

    #[test]
    fn multi_word_buzzwords_match_as_substrings() {
        let letter = "team player team player detail-oriented detail-oriented company";
        assert!(detect(letter).contains(&RedFlag::BuzzwordOveruse));
    }

    #[test]
    fn flags_accumulate_in_order() {
        let flags = detect("To whom it may concern: I am passionate.");
        assert_eq!(
            flags,
            vec![
                RedFlag::GenericSalutation,
                RedFlag::NoCompanyReference,
                RedFlag::TooShort,
            ]
        );
    }
}
