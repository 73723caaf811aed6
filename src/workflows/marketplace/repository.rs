use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::domain::{
    Application, ApplicationId, CandidateProfile, Posting, PostingId, UserId,
};

/// Storage abstraction over profiles, postings, and applications so the
/// service module can be exercised in isolation.
///
/// `insert_application` owns the (candidate, posting) uniqueness invariant:
/// implementations must check and insert atomically (unique index, serialized
/// transaction, or a single lock) and answer `Conflict` on a repeat pair.
pub trait MarketplaceRepository: Send + Sync {
    fn upsert_profile(&self, profile: CandidateProfile) -> Result<CandidateProfile, RepositoryError>;
    fn profile(&self, candidate_id: &UserId) -> Result<Option<CandidateProfile>, RepositoryError>;

    fn insert_posting(&self, posting: Posting) -> Result<Posting, RepositoryError>;
    fn update_posting(&self, posting: Posting) -> Result<(), RepositoryError>;
    fn delete_posting(&self, id: &PostingId) -> Result<(), RepositoryError>;
    fn posting(&self, id: &PostingId) -> Result<Option<Posting>, RepositoryError>;
    fn postings(&self) -> Result<Vec<Posting>, RepositoryError>;
    fn postings_for_employer(&self, employer_id: &UserId) -> Result<Vec<Posting>, RepositoryError>;

    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn applications_for_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_postings(
        &self,
        posting_ids: &[PostingId],
    ) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// A candidate's application joined with the posting it targets.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateApplicationView {
    pub application: Application,
    pub posting: Posting,
}

/// An employer-facing triage row: the application plus just enough joined
/// context to list it.
#[derive(Debug, Clone, Serialize)]
pub struct EmployerApplicationView {
    pub application: Application,
    pub candidate_id: UserId,
    pub posting_title: String,
}

/// Mutex-guarded in-memory store used by the server binary and tests.
///
/// All records live behind one lock, which is what makes the duplicate
/// check inside `insert_application` atomic.
#[derive(Default, Clone)]
pub struct InMemoryMarketplaceRepository {
    inner: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    profiles: HashMap<UserId, CandidateProfile>,
    postings: HashMap<PostingId, Posting>,
    posting_order: Vec<PostingId>,
    applications: HashMap<ApplicationId, Application>,
    application_order: Vec<ApplicationId>,
}

impl MarketplaceRepository for InMemoryMarketplaceRepository {
    fn upsert_profile(
        &self,
        profile: CandidateProfile,
    ) -> Result<CandidateProfile, RepositoryError> {
        let mut store = self.inner.lock().expect("repository mutex poisoned");
        store.profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    fn profile(&self, candidate_id: &UserId) -> Result<Option<CandidateProfile>, RepositoryError> {
        let store = self.inner.lock().expect("repository mutex poisoned");
        Ok(store.profiles.get(candidate_id).cloned())
    }

    fn insert_posting(&self, posting: Posting) -> Result<Posting, RepositoryError> {
        let mut store = self.inner.lock().expect("repository mutex poisoned");
        if store.postings.contains_key(&posting.id) {
            return Err(RepositoryError::Conflict);
        }
        store.posting_order.push(posting.id.clone());
        store.postings.insert(posting.id.clone(), posting.clone());
        Ok(posting)
    }

    fn update_posting(&self, posting: Posting) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock().expect("repository mutex poisoned");
        if !store.postings.contains_key(&posting.id) {
            return Err(RepositoryError::NotFound);
        }
        store.postings.insert(posting.id.clone(), posting);
        Ok(())
    }

    fn delete_posting(&self, id: &PostingId) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock().expect("repository mutex poisoned");
        if store.postings.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        store.posting_order.retain(|existing| existing != id);
        Ok(())
    }

    fn posting(&self, id: &PostingId) -> Result<Option<Posting>, RepositoryError> {
        let store = self.inner.lock().expect("repository mutex poisoned");
        Ok(store.postings.get(id).cloned())
    }

    fn postings(&self) -> Result<Vec<Posting>, RepositoryError> {
        let store = self.inner.lock().expect("repository mutex poisoned");
        Ok(store
            .posting_order
            .iter()
            .filter_map(|id| store.postings.get(id).cloned())
            .collect())
    }

    fn postings_for_employer(&self, employer_id: &UserId) -> Result<Vec<Posting>, RepositoryError> {
        let store = self.inner.lock().expect("repository mutex poisoned");
        Ok(store
            .posting_order
            .iter()
            .filter_map(|id| store.postings.get(id))
            .filter(|posting| &posting.employer_id == employer_id)
            .cloned()
            .collect())
    }

    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut store = self.inner.lock().expect("repository mutex poisoned");
        let duplicate = store.applications.values().any(|existing| {
            existing.candidate_id == application.candidate_id
                && existing.posting_id == application.posting_id
        });
        if duplicate || store.applications.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        store.application_order.push(application.id.clone());
        store
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock().expect("repository mutex poisoned");
        if !store.applications.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        store.applications.insert(application.id.clone(), application);
        Ok(())
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let store = self.inner.lock().expect("repository mutex poisoned");
        Ok(store.applications.get(id).cloned())
    }

    fn applications_for_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let store = self.inner.lock().expect("repository mutex poisoned");
        Ok(store
            .application_order
            .iter()
            .filter_map(|id| store.applications.get(id))
            .filter(|application| &application.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    fn applications_for_postings(
        &self,
        posting_ids: &[PostingId],
    ) -> Result<Vec<Application>, RepositoryError> {
        let store = self.inner.lock().expect("repository mutex poisoned");
        Ok(store
            .application_order
            .iter()
            .filter_map(|id| store.applications.get(id))
            .filter(|application| posting_ids.contains(&application.posting_id))
            .cloned()
            .collect())
    }
}
