use crate::core::error::MatchingError;
use crate::core::filters::pair_key;
use crate::models::{Match, MatchStatus, Profile};
use crate::services::store::{MatchStore, ProfileStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process store backed by a mutex-guarded map.
///
/// Used by the test suites and as a fixture store; both traits are
/// implemented with the same duplicate-pair and compare-and-set guarantees
/// the Postgres store gives, so the engine behaves identically against
/// either.
#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<Vec<Profile>>,
    matches: Mutex<HashMap<String, Match>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            matches: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_profile(&self, profile: Profile) {
        self.profiles.lock().unwrap().push(profile);
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Profile, MatchingError> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| MatchingError::NotFound(format!("user {}", user_id)))
    }

    async fn list_all(&self) -> Result<Vec<Profile>, MatchingError> {
        Ok(self.profiles.lock().unwrap().clone())
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn get(&self, match_id: &str) -> Result<Option<Match>, MatchingError> {
        Ok(self.matches.lock().unwrap().get(match_id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Match>, MatchingError> {
        let mut matches: Vec<Match> = self
            .matches
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.user_a_id == user_id || m.user_b_id == user_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }

    async fn find_by_pair(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<Match>, MatchingError> {
        let key = pair_key(user_a, user_b);
        Ok(self
            .matches
            .lock()
            .unwrap()
            .values()
            .find(|m| pair_key(&m.user_a_id, &m.user_b_id) == key)
            .cloned())
    }

    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, MatchingError> {
        let mut matches: Vec<Match> = self
            .matches
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.status == status)
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }

    async fn insert(&self, proposal: Match) -> Result<Match, MatchingError> {
        let mut matches = self.matches.lock().unwrap();

        // Duplicate-pair check and insert under one lock, so two racing
        // proposals cannot both succeed.
        let key = pair_key(&proposal.user_a_id, &proposal.user_b_id);
        let duplicate = matches
            .values()
            .any(|m| pair_key(&m.user_a_id, &m.user_b_id) == key);
        if duplicate {
            return Err(MatchingError::Conflict(
                proposal.user_a_id,
                proposal.user_b_id,
            ));
        }

        matches.insert(proposal.id.clone(), proposal.clone());
        Ok(proposal)
    }

    async fn transition(
        &self,
        match_id: &str,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<Option<Match>, MatchingError> {
        let mut matches = self.matches.lock().unwrap();

        match matches.get_mut(match_id) {
            Some(m) if m.status == from => {
                m.status = to;
                Ok(Some(m.clone()))
            }
            _ => Ok(None),
        }
    }
}
