use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for marketplace users (candidates and employers alike).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for published internship postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Role claim attached to every request by the upstream identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Candidate,
    Employer,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Employer => "employer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "candidate" => Some(Role::Candidate),
            "employer" => Some(Role::Employer),
            _ => None,
        }
    }
}

/// Authenticated caller identity. The session layer is an external
/// collaborator, so this claim is trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn candidate(id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(id.into()),
            role: Role::Candidate,
        }
    }

    pub fn employer(id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(id.into()),
            role: Role::Employer,
        }
    }
}

/// Candidate-owned profile, created lazily on first save.
///
/// Skills are stored exactly as entered. Matching is case sensitive by
/// contract, so no normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub resume_ref: Option<String>,
}

impl CandidateProfile {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            skills: Vec::new(),
            education: None,
            experience: None,
            resume_ref: None,
        }
    }
}

/// An internship opportunity published by an employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub id: PostingId,
    pub employer_id: UserId,
    pub company_name: String,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
    #[serde(default)]
    pub stipend: Option<u32>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
}

/// Fields an employer supplies when creating or replacing a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingDraft {
    pub company_name: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub location: String,
    #[serde(default)]
    pub stipend: Option<u32>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
}

impl PostingDraft {
    pub fn into_posting(self, id: PostingId, employer_id: UserId) -> Posting {
        Posting {
            id,
            employer_id,
            company_name: self.company_name,
            title: self.title,
            description: self.description,
            required_skills: self.required_skills,
            location: self.location,
            stipend: self.stipend,
            duration: self.duration,
            application_deadline: self.application_deadline,
        }
    }
}

/// Lifecycle state of one application. `Pending` is the only initial state;
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }

    /// Whether the three-state machine defines a transition to `next`.
    /// Only `Pending -> {Approved, Rejected}` exists; terminal states
    /// never change again.
    pub const fn allows_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (
                ApplicationStatus::Pending,
                ApplicationStatus::Approved | ApplicationStatus::Rejected
            )
        )
    }
}

/// A candidate's submission against one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: UserId,
    pub posting_id: PostingId,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    #[serde(default)]
    pub resume_ref: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Fields a candidate supplies when applying to a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub posting_id: PostingId,
    pub cover_letter: String,
    #[serde(default)]
    pub resume_ref: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

/// A posting annotated with its match score for one candidate. Never
/// persisted; assembled fresh per recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub posting: Posting,
    pub match_score: u8,
}
