//! Skill-overlap scoring and the recommendation assembler.
//!
//! The score is the percentage of a posting's required skills the candidate
//! lists, rounded to the nearest integer. Membership is exact string
//! equality: skills are compared verbatim, matching how profile and posting
//! forms store them.

use super::domain::{CandidateProfile, MatchResult, Posting};

/// Score a set of candidate skills against a posting's requirements.
///
/// Returns 0 when the candidate lists no skills, and 0 when the posting
/// requires none (rather than leaving the percentage undefined).
pub fn match_score(candidate_skills: &[String], required_skills: &[String]) -> u8 {
    if candidate_skills.is_empty() || required_skills.is_empty() {
        return 0;
    }

    let matched = required_skills
        .iter()
        .filter(|skill| candidate_skills.contains(skill))
        .count();

    ((matched as f64 / required_skills.len() as f64) * 100.0).round() as u8
}

/// Join every open posting with the candidate's match score, best first.
///
/// A candidate without a saved profile is treated as having no skills, so
/// every posting still appears, scored 0. `sort_by` is stable: equal scores
/// keep the order the postings came in.
pub fn recommend(postings: Vec<Posting>, profile: Option<&CandidateProfile>) -> Vec<MatchResult> {
    let skills: &[String] = profile.map(|p| p.skills.as_slice()).unwrap_or(&[]);

    let mut results: Vec<MatchResult> = postings
        .into_iter()
        .map(|posting| {
            let match_score = match_score(skills, &posting.required_skills);
            MatchResult {
                posting,
                match_score,
            }
        })
        .collect();

    results.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    results
}
