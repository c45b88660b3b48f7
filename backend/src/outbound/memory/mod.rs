//! In-process store implementing the enrolment repository ports.
//!
//! Used when no database is configured and by the test-suite. A single mutex
//! guards all state, so the capacity re-check and uniqueness checks in
//! [`ParticipantRepository::insert`] observe the same snapshot as the write.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    CohortRepository, CohortRepositoryError, ParticipantRepository, ParticipantRepositoryError,
    TagRepository, TagRepositoryError,
};
use crate::domain::{Cohort, CohortId, Participant, ParticipantId, Tag, TagSlug};

#[derive(Debug, Default)]
struct StoreState {
    cohorts: HashMap<Uuid, Cohort>,
    tags: HashMap<TagSlug, Tag>,
    participants: Vec<Participant>,
}

impl StoreState {
    fn enrolled(&self, cohort_id: &CohortId) -> usize {
        self.participants
            .iter()
            .filter(|participant| participant.cohort_id.as_uuid() == cohort_id.as_uuid())
            .count()
    }
}

/// Shared in-memory state for cohorts, tags and participants.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a cohort, consuming and returning the store.
    #[must_use]
    pub fn with_cohort(self, cohort: Cohort) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.cohorts.insert(*cohort.id.as_uuid(), cohort);
        }
        self
    }

    /// Seed a tag, consuming and returning the store.
    #[must_use]
    pub fn with_tag(self, tag: Tag) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.tags.entry(tag.slug.clone()).or_insert(tag);
        }
        self
    }

    /// Number of tags currently stored.
    pub fn tag_count(&self) -> usize {
        self.state.lock().map(|state| state.tags.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl CohortRepository for InMemoryStore {
    async fn find_by_id(&self, id: &CohortId) -> Result<Option<Cohort>, CohortRepositoryError> {
        let state = self.lock().map_err(CohortRepositoryError::query)?;
        Ok(state.cohorts.get(id.as_uuid()).cloned())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &TagSlug) -> Result<Option<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::query)?;
        Ok(state.tags.get(slug).cloned())
    }

    async fn create(&self, tag: &Tag) -> Result<(), TagRepositoryError> {
        let mut state = self.lock().map_err(TagRepositoryError::query)?;
        if state.tags.contains_key(&tag.slug) {
            return Err(TagRepositoryError::duplicate_slug(tag.slug.as_str()));
        }
        state.tags.insert(tag.slug.clone(), tag.clone());
        debug!(slug = %tag.slug, "tag stored");
        Ok(())
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryStore {
    async fn count_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<u64, ParticipantRepositoryError> {
        let state = self.lock().map_err(ParticipantRepositoryError::query)?;
        Ok(state.enrolled(cohort_id) as u64)
    }

    async fn insert(&self, participant: &Participant) -> Result<(), ParticipantRepositoryError> {
        let mut state = self.lock().map_err(ParticipantRepositoryError::query)?;
        let cohort_key = participant.cohort_id.to_string();

        let Some(cohort) = state.cohorts.get(participant.cohort_id.as_uuid()) else {
            return Err(ParticipantRepositoryError::cohort_missing(cohort_key));
        };
        let capacity = cohort.cohort_size;

        // Same order as the PostgreSQL adapter: capacity, then uniqueness.
        if capacity.is_full(state.enrolled(&participant.cohort_id) as u64) {
            return Err(ParticipantRepositoryError::cohort_full(cohort_key));
        }
        let duplicate = state.participants.iter().any(|existing| {
            existing.user_id.as_uuid() == participant.user_id.as_uuid()
                && existing.cohort_id.as_uuid() == participant.cohort_id.as_uuid()
        });
        if duplicate {
            return Err(ParticipantRepositoryError::duplicate_enrolment(cohort_key));
        }
        if let Some(missing) = participant
            .tags
            .iter()
            .find(|tag| !state.tags.contains_key(&tag.slug))
        {
            return Err(ParticipantRepositoryError::query(format!(
                "tag {} is not stored",
                missing.slug
            )));
        }

        state.participants.push(participant.clone());
        debug!(participant_id = %participant.id, cohort_id = %cohort_key, "participant stored");
        Ok(())
    }

    async fn list_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        let state = self.lock().map_err(ParticipantRepositoryError::query)?;
        let mut participants: Vec<Participant> = state
            .participants
            .iter()
            .filter(|participant| participant.cohort_id.as_uuid() == cohort_id.as_uuid())
            .cloned()
            .collect();
        participants.sort_by_key(|participant| participant.sign_up_date);
        Ok(participants)
    }

    async fn find(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        let state = self.lock().map_err(ParticipantRepositoryError::query)?;
        Ok(state
            .participants
            .iter()
            .find(|participant| participant.id.as_uuid() == id.as_uuid())
            .cloned())
    }
}
