//! Internship marketplace core: skill matching, cover-letter review, and the
//! application lifecycle, exposed through a service facade and HTTP router.

pub mod domain;
pub mod matching;
pub mod repository;
pub mod review;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationStatus, CandidateProfile,
    MatchResult, Posting, PostingDraft, PostingId, Principal, Role, UserId,
};
pub use repository::{
    CandidateApplicationView, EmployerApplicationView, InMemoryMarketplaceRepository,
    MarketplaceRepository, RepositoryError,
};
pub use review::{
    CoverLetterAnalyzer, EnthusiasmLevel, FeedbackError, FeedbackGenerator, FeedbackRequest,
    OpenAiFeedbackGenerator, RedFlag, ReviewResult, SentimentLexicon, FALLBACK_FEEDBACK,
};
pub use router::marketplace_router;
pub use service::{
    MarketplaceService, PostingFilter, ProfileDraft, ReviewRequest, ServiceError,
};
