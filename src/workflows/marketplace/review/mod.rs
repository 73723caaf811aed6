//! Cover-letter analysis: lexical sentiment, heuristic red flags, and
//! externally generated feedback with graceful degradation.

pub(crate) mod feedback;
mod lexicon;
mod red_flags;

pub use feedback::{
    FeedbackError, FeedbackGenerator, FeedbackRequest, OpenAiFeedbackGenerator, FALLBACK_FEEDBACK,
};
pub use lexicon::SentimentLexicon;
pub use red_flags::RedFlag;

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::warn;

/// Categorical bucket derived from the sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnthusiasmLevel {
    VeryEnthusiastic,
    Enthusiastic,
    Neutral,
    LowEnthusiasm,
    VeryLowEnthusiasm,
}

impl EnthusiasmLevel {
    /// Bucket a sentiment score. Thresholds are checked top-down; the first
    /// match wins.
    pub const fn from_score(score: i32) -> Self {
        if score > 5 {
            EnthusiasmLevel::VeryEnthusiastic
        } else if score > 2 {
            EnthusiasmLevel::Enthusiastic
        } else if score > -2 {
            EnthusiasmLevel::Neutral
        } else if score > -5 {
            EnthusiasmLevel::LowEnthusiasm
        } else {
            EnthusiasmLevel::VeryLowEnthusiasm
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EnthusiasmLevel::VeryEnthusiastic => "Very Enthusiastic",
            EnthusiasmLevel::Enthusiastic => "Enthusiastic",
            EnthusiasmLevel::Neutral => "Neutral",
            EnthusiasmLevel::LowEnthusiasm => "Low Enthusiasm",
            EnthusiasmLevel::VeryLowEnthusiasm => "Very Low Enthusiasm",
        }
    }
}

impl Serialize for EnthusiasmLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Full result of analyzing one cover letter. Ephemeral: computed per
/// request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResult {
    pub sentiment_score: i32,
    pub enthusiasm: EnthusiasmLevel,
    pub red_flags: Vec<RedFlag>,
    pub feedback: String,
}

/// Analyzer combining the local heuristics with the external generator.
pub struct CoverLetterAnalyzer<F> {
    lexicon: &'static SentimentLexicon,
    feedback: Arc<F>,
}

impl<F> CoverLetterAnalyzer<F>
where
    F: FeedbackGenerator,
{
    pub fn new(feedback: Arc<F>) -> Self {
        Self {
            lexicon: SentimentLexicon::embedded(),
            feedback,
        }
    }

    /// Analyze a cover letter in the context of one posting.
    ///
    /// Sentiment and red flags are always computed locally. The external
    /// generator may fail or time out; that degrades the feedback text to
    /// [`FALLBACK_FEEDBACK`] and is never surfaced as an error.
    pub fn analyze(&self, cover_letter: &str, company_name: &str, job_title: &str) -> ReviewResult {
        let sentiment_score = self.lexicon.score(cover_letter);
        let enthusiasm = EnthusiasmLevel::from_score(sentiment_score);
        let red_flags = red_flags::detect(cover_letter);

        let request = FeedbackRequest {
            cover_letter: cover_letter.to_string(),
            company_name: company_name.to_string(),
            job_title: job_title.to_string(),
            sentiment_score,
            red_flags: red_flags.clone(),
        };

        let feedback = match self.feedback.generate(&request) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "feedback generator unavailable, degrading to fallback text");
                FALLBACK_FEEDBACK.to_string()
            }
        };

        ReviewResult {
            sentiment_score,
            enthusiasm,
            red_flags,
            feedback,
        }
    }
}
