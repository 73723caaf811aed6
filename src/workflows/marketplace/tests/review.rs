use std::sync::Arc;

use super::common::*;
use crate::workflows::marketplace::review::{
    CoverLetterAnalyzer, EnthusiasmLevel, RedFlag, SentimentLexicon, FALLBACK_FEEDBACK,
};
use crate::workflows::marketplace::service::ReviewRequest;
use crate::workflows::marketplace::ServiceError;

#[test]
fn analyzer_passes_local_signals_to_the_generator() {
    let feedback = Arc::new(RecordingFeedback::default());
    let analyzer = CoverLetterAnalyzer::new(feedback.clone());

    let letter = "To whom it may concern, I am passionate.";
    let result = analyzer.analyze(letter, "Orbit Labs", "Backend Intern");

    assert_eq!(result.feedback, CANNED_FEEDBACK);
    assert!(result.red_flags.contains(&RedFlag::GenericSalutation));

    let requests = feedback.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].company_name, "Orbit Labs");
    assert_eq!(requests[0].job_title, "Backend Intern");
    assert_eq!(requests[0].sentiment_score, result.sentiment_score);
    assert_eq!(requests[0].red_flags, result.red_flags);
}

#[test]
fn generator_failure_degrades_to_fallback_text() {
    let analyzer = CoverLetterAnalyzer::new(Arc::new(FailingFeedback));

    let letter = clean_cover_letter();
    let result = analyzer.analyze(&letter, "Orbit Labs", "Backend Intern");

    assert_eq!(result.feedback, FALLBACK_FEEDBACK);
    assert!(result.sentiment_score > 0, "local sentiment still computed");
    assert!(result.red_flags.is_empty(), "clean letter raises no flags");
}

#[test]
fn enthusiasm_label_tracks_lexicon_score() {
    let analyzer = CoverLetterAnalyzer::new(Arc::new(FailingFeedback));
    let lexicon = SentimentLexicon::embedded();

    let warm = "I am excited about this company and this organization";
    let result = analyzer.analyze(warm, "Orbit Labs", "Backend Intern");
    assert_eq!(result.sentiment_score, lexicon.weight("excited"));
    assert_eq!(result.enthusiasm, EnthusiasmLevel::Enthusiastic);

    let grim = "terrible terrible company experience overall";
    let result = analyzer.analyze(grim, "Orbit Labs", "Backend Intern");
    assert!(result.sentiment_score <= -5);
    assert_eq!(result.enthusiasm, EnthusiasmLevel::VeryLowEnthusiasm);
}

#[test]
fn short_example_letter_triggers_expected_flags() {
    let analyzer = CoverLetterAnalyzer::new(Arc::new(FailingFeedback));
    let result = analyzer.analyze(
        "To Whom It May Concern. I am excited.",
        "Orbit Labs",
        "Backend Intern",
    );
    assert!(result.red_flags.contains(&RedFlag::GenericSalutation));
    assert!(result.red_flags.contains(&RedFlag::TooShort));
}

#[test]
fn service_rejects_blank_cover_letters_before_analysis() {
    let (service, _, feedback) = build_service();
    let request = ReviewRequest {
        cover_letter: "   \n\t".to_string(),
        company_name: "Orbit Labs".to_string(),
        job_title: "Backend Intern".to_string(),
    };

    match service.review_cover_letter(&request) {
        Err(ServiceError::Validation(_)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(feedback.requests().is_empty(), "generator never invoked");
}

#[test]
fn service_review_survives_generator_outage() {
    let (service, _) = build_degraded_service();
    let request = ReviewRequest {
        cover_letter: "To whom it may concern, I am passionate.".to_string(),
        company_name: "Orbit Labs".to_string(),
        job_title: "Backend Intern".to_string(),
    };

    let result = service
        .review_cover_letter(&request)
        .expect("review never fails on generator outage");
    assert_eq!(result.feedback, FALLBACK_FEEDBACK);
    assert!(!result.red_flags.is_empty());
}

#[test]
fn review_application_checks_ownership() {
    let (service, _, _) = build_service();
    let employer = employer();
    let posting = publish(&service, &employer, "Backend Intern", &["Rust"]);

    let candidate = candidate();
    let application = service
        .create_application(
            &candidate,
            crate::workflows::marketplace::ApplicationDraft {
                posting_id: posting.id,
                cover_letter: clean_cover_letter(),
                resume_ref: None,
                additional_info: None,
            },
        )
        .expect("application submits");

    let stranger = crate::workflows::marketplace::Principal::candidate("cand-999");
    match service.review_application(&stranger, &application.id) {
        Err(ServiceError::Forbidden) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }

    let review = service
        .review_application(&candidate, &application.id)
        .expect("owner can review own application");
    assert_eq!(review.feedback, CANNED_FEEDBACK);
}
