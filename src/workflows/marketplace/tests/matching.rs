use super::common::*;
use crate::workflows::marketplace::matching::{match_score, recommend};

fn skills(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn full_coverage_scores_one_hundred() {
    let candidate = skills(&["Rust", "SQL", "Docker", "Kubernetes"]);
    let required = skills(&["Rust", "SQL"]);
    assert_eq!(match_score(&candidate, &required), 100);
}

#[test]
fn empty_candidate_skills_score_zero() {
    let required = skills(&["Rust", "SQL"]);
    assert_eq!(match_score(&[], &required), 0);
}

#[test]
fn empty_required_skills_score_zero() {
    let candidate = skills(&["Rust"]);
    assert_eq!(match_score(&candidate, &[]), 0);
}

#[test]
fn score_rounds_to_nearest_percentage() {
    let required = skills(&["Rust", "SQL", "Docker"]);
    assert_eq!(match_score(&skills(&["Rust"]), &required), 33);
    assert_eq!(match_score(&skills(&["Rust", "SQL"]), &required), 67);
}

#[test]
fn membership_is_case_sensitive() {
    let required = skills(&["Rust"]);
    assert_eq!(match_score(&skills(&["rust"]), &required), 0);
    assert_eq!(match_score(&skills(&["Rust"]), &required), 100);
}

#[test]
fn score_is_monotone_in_overlap() {
    let required = skills(&["Rust", "SQL", "Docker", "Kubernetes"]);
    let mut previous = 0;
    for covered in 1..=required.len() {
        let candidate: Vec<String> = required[..covered].to_vec();
        let score = match_score(&candidate, &required);
        assert!(score >= previous, "score dropped at overlap {covered}");
        previous = score;
    }
    assert_eq!(previous, 100);
}

#[test]
fn recommendations_sort_descending_and_keep_zero_scores() {
    let (service, _, _) = build_service();
    let employer = employer();
    publish(&service, &employer, "Embedded Intern", &["C", "Rust"]);
    publish(&service, &employer, "Data Intern", &["Python", "SQL"]);
    publish(&service, &employer, "Platform Intern", &["Rust", "SQL"]);

    let candidate = candidate();
    service
        .save_profile(&candidate, skills_profile(&["Rust", "SQL"]))
        .expect("profile saves");

    let results = service
        .recommendations(&candidate)
        .expect("recommendations build");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].posting.title, "Platform Intern");
    assert_eq!(results[0].match_score, 100);
    assert_eq!(results[1].match_score, 50);
    assert_eq!(results[2].match_score, 50);
    assert!(results.windows(2).all(|w| w[0].match_score >= w[1].match_score));
}

#[test]
fn equal_scores_keep_posting_order() {
    let (service, _, _) = build_service();
    let employer = employer();
    publish(&service, &employer, "First Tie", &["Rust", "Go"]);
    publish(&service, &employer, "Second Tie", &["Rust", "Zig"]);

    let candidate = candidate();
    service
        .save_profile(&candidate, skills_profile(&["Rust"]))
        .expect("profile saves");

    let results = service
        .recommendations(&candidate)
        .expect("recommendations build");
    assert_eq!(results[0].match_score, results[1].match_score);
    assert_eq!(results[0].posting.title, "First Tie");
    assert_eq!(results[1].posting.title, "Second Tie");
}

#[test]
fn missing_profile_is_an_empty_skill_set() {
    let (service, _, _) = build_service();
    let employer = employer();
    publish(&service, &employer, "Any Intern", &["Rust"]);

    let results = service
        .recommendations(&candidate())
        .expect("recommendations build without a profile");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_score, 0);
}

#[test]
fn recommend_handles_no_postings() {
    assert!(recommend(Vec::new(), None).is_empty());
}
