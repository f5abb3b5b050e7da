use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::medium::StorageMedium;
use crate::policy::{Policy, PolicyDraft};

use super::layout::{self, FIRST_ID, NEXT_ID_KEY, POLICIES_KEY};

struct State {
    policies: Vec<Policy>,
    next_id: u64,
}

/// Authoritative in-memory policy collection, mirrored into a persistence
/// medium at the end of every mutating operation.
///
/// Clone-friendly (cloning shares the same underlying state and medium).
/// The medium is a best-effort mirror: a failed write is logged and
/// swallowed, and the in-memory state stays authoritative for the session.
pub struct PolicyStore<S: StorageMedium> {
    medium: S,
    state: Arc<RwLock<State>>,
}

impl<S: StorageMedium + Clone> Clone for PolicyStore<S> {
    fn clone(&self) -> Self {
        PolicyStore {
            medium: self.medium.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: StorageMedium> PolicyStore<S> {
    /// Open a store over `medium`, loading any persisted collection and
    /// counter. Unreadable or corrupt entries degrade to empty defaults;
    /// construction never fails.
    pub fn open(medium: S) -> Self {
        let policies = match medium.get(POLICIES_KEY) {
            Ok(Some(raw)) => layout::decode_policies(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read policy collection from medium, starting empty");
                Vec::new()
            }
        };
        let raw_next = match medium.get(NEXT_ID_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "failed to read next-id entry from medium");
                None
            }
        };
        let next_id = layout::decode_next_id(raw_next.as_deref(), &policies);
        debug!(policies = policies.len(), next_id, "policy store loaded");

        PolicyStore {
            medium,
            state: Arc::new(RwLock::new(State { policies, next_id })),
        }
    }

    /// Snapshot of all records, in insertion order.
    pub fn get_all(&self) -> Result<Vec<Policy>, StoreError> {
        let state = self.read("get_all")?;
        Ok(state.policies.clone())
    }

    /// Look up one record by id. No side effect.
    pub fn get_by_id(&self, id: u64) -> Result<Option<Policy>, StoreError> {
        let state = self.read("get_by_id")?;
        Ok(state.policies.iter().find(|p| p.id == id).cloned())
    }

    /// Validate `draft`, assign the next id, append, and mirror. Returns the
    /// stored record.
    pub fn add(&self, draft: PolicyDraft) -> Result<Policy, StoreError> {
        draft.validate()?;
        let mut state = self.write("add")?;
        let policy = draft.into_policy(state.next_id);
        state.next_id += 1;
        state.policies.push(policy.clone());
        self.save(&state);
        Ok(policy)
    }

    /// Replace the record whose id matches `policy.id` with the full record
    /// given. An unknown id is a no-op; the return value reports whether a
    /// record was replaced.
    pub fn update(&self, policy: Policy) -> Result<bool, StoreError> {
        let mut state = self.write("update")?;
        let replaced = match state.policies.iter_mut().find(|p| p.id == policy.id) {
            Some(slot) => {
                *slot = policy;
                true
            }
            None => false,
        };
        if replaced {
            self.save(&state);
        }
        Ok(replaced)
    }

    /// Remove the record with the given id, if present. The allocator is
    /// never decremented; deleted ids are never reused.
    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut state = self.write("delete")?;
        let before = state.policies.len();
        state.policies.retain(|p| p.id != id);
        let removed = state.policies.len() != before;
        if removed {
            self.save(&state);
        }
        Ok(removed)
    }

    /// Empty the collection, reset the allocator, and drop both persisted
    /// entries. Idempotent.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.write("clear")?;
        state.policies.clear();
        state.next_id = FIRST_ID;
        for key in [POLICIES_KEY, NEXT_ID_KEY] {
            if let Err(e) = self.medium.remove(key) {
                warn!(key, error = %e, "failed to remove persisted entry");
            }
        }
        Ok(())
    }

    /// Find all records matching a predicate, in insertion order.
    pub fn find<F>(&self, predicate: F) -> Result<Vec<Policy>, StoreError>
    where
        F: Fn(&Policy) -> bool,
    {
        let state = self.read("find")?;
        Ok(state
            .policies
            .iter()
            .filter(|p| predicate(p))
            .cloned()
            .collect())
    }

    /// Find the first record matching a predicate.
    pub fn find_one<F>(&self, predicate: F) -> Result<Option<Policy>, StoreError>
    where
        F: Fn(&Policy) -> bool,
    {
        let state = self.read("find_one")?;
        Ok(state.policies.iter().find(|p| predicate(p)).cloned())
    }

    /// Check if any record matches a predicate.
    pub fn exists<F>(&self, predicate: F) -> Result<bool, StoreError>
    where
        F: Fn(&Policy) -> bool,
    {
        let state = self.read("exists")?;
        Ok(state.policies.iter().any(|p| predicate(p)))
    }

    /// Count records matching a predicate.
    pub fn count<F>(&self, predicate: F) -> Result<usize, StoreError>
    where
        F: Fn(&Policy) -> bool,
    {
        let state = self.read("count")?;
        Ok(state.policies.iter().filter(|p| predicate(p)).count())
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn write(&self, operation: &'static str) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    /// Mirror the current state into the medium. Best effort: failures are
    /// logged and the in-memory state stays authoritative.
    fn save(&self, state: &State) {
        match layout::encode_policies(&state.policies) {
            Ok(raw) => {
                if let Err(e) = self.medium.put(POLICIES_KEY, &raw) {
                    warn!(error = %e, "failed to mirror policy collection to medium");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize policy collection"),
        }
        if let Err(e) = self
            .medium
            .put(NEXT_ID_KEY, &layout::encode_next_id(state.next_id))
        {
            warn!(error = %e, "failed to mirror next-id to medium");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::{InMemoryMedium, MediumError};

    fn draft(number: &str) -> PolicyDraft {
        PolicyDraft {
            policy_number: number.into(),
            customer_name: "John Doe".into(),
            start_date: "2024-01-01".into(),
            end_date: "2024-12-31".into(),
            premium_amount: 1500.0,
        }
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let store = PolicyStore::open(InMemoryMedium::new());
        assert_eq!(store.add(draft("POL-001")).unwrap().id, 1);
        assert_eq!(store.add(draft("POL-002")).unwrap().id, 2);
        assert_eq!(store.add(draft("POL-003")).unwrap().id, 3);
    }

    #[test]
    fn add_rejects_empty_required_field() {
        let store = PolicyStore::open(InMemoryMedium::new());
        let err = store.add(draft("")).unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn get_by_id_missing_returns_none() {
        let store = PolicyStore::open(InMemoryMedium::new());
        store.add(draft("POL-001")).unwrap();
        assert!(store.get_by_id(99).unwrap().is_none());
    }

    #[test]
    fn get_all_preserves_insertion_order() {
        let store = PolicyStore::open(InMemoryMedium::new());
        store.add(draft("POL-001")).unwrap();
        store.add(draft("POL-002")).unwrap();
        store.add(draft("POL-003")).unwrap();
        store.delete(2).unwrap();
        store.add(draft("POL-004")).unwrap();

        let numbers: Vec<String> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|p| p.policy_number)
            .collect();
        assert_eq!(numbers, vec!["POL-001", "POL-003", "POL-004"]);
    }

    #[test]
    fn update_replaces_full_record() {
        let store = PolicyStore::open(InMemoryMedium::new());
        let mut policy = store.add(draft("POL-001")).unwrap();
        policy.customer_name = "Jane Roe".into();
        policy.premium_amount = 2000.0;

        assert!(store.update(policy).unwrap());
        let loaded = store.get_by_id(1).unwrap().unwrap();
        assert_eq!(loaded.customer_name, "Jane Roe");
        assert_eq!(loaded.premium_amount, 2000.0);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let store = PolicyStore::open(InMemoryMedium::new());
        let existing = store.add(draft("POL-001")).unwrap();

        let mut ghost = existing.clone();
        ghost.id = 99;
        assert!(!store.update(ghost).unwrap());
        assert_eq!(store.get_all().unwrap(), vec![existing]);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let store = PolicyStore::open(InMemoryMedium::new());
        store.add(draft("POL-001")).unwrap();
        assert!(!store.delete(99).unwrap());
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn allocator_never_reuses_ids() {
        let store = PolicyStore::open(InMemoryMedium::new());
        store.add(draft("POL-001")).unwrap();
        store.add(draft("POL-002")).unwrap();
        store.delete(1).unwrap();

        let third = store.add(draft("POL-003")).unwrap();
        assert_eq!(third.id, 3);

        let ids: Vec<u64> = store.get_all().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.add(draft("POL-004")).unwrap().id, 4);
    }

    #[test]
    fn clear_resets_allocator() {
        let store = PolicyStore::open(InMemoryMedium::new());
        for n in 0..5 {
            store.add(draft(&format!("POL-{:03}", n))).unwrap();
        }

        store.clear().unwrap();
        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(store.add(draft("POL-001")).unwrap().id, 1);
    }

    #[test]
    fn clear_twice_is_idempotent() {
        let store = PolicyStore::open(InMemoryMedium::new());
        store.add(draft("POL-001")).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(store.add(draft("POL-002")).unwrap().id, 1);
    }

    #[test]
    fn find_filters_in_insertion_order() {
        let store = PolicyStore::open(InMemoryMedium::new());
        store.add(draft("POL-001")).unwrap();
        let mut cheap = draft("POL-002");
        cheap.premium_amount = 10.0;
        store.add(cheap).unwrap();
        store.add(draft("POL-003")).unwrap();

        let expensive = store.find(|p| p.premium_amount > 100.0).unwrap();
        assert_eq!(expensive.len(), 2);
        assert_eq!(expensive[0].policy_number, "POL-001");
        assert_eq!(expensive[1].policy_number, "POL-003");
    }

    #[test]
    fn find_one_exists_count() {
        let store = PolicyStore::open(InMemoryMedium::new());
        store.add(draft("POL-001")).unwrap();
        store.add(draft("POL-002")).unwrap();

        let first = store
            .find_one(|p| p.policy_number == "POL-002")
            .unwrap()
            .unwrap();
        assert_eq!(first.id, 2);
        assert!(store.exists(|p| p.id == 1).unwrap());
        assert!(!store.exists(|p| p.id == 9).unwrap());
        assert_eq!(store.count(|_| true).unwrap(), 2);
    }

    #[test]
    fn clone_shares_state() {
        let store = PolicyStore::open(InMemoryMedium::new());
        let clone = store.clone();
        store.add(draft("POL-001")).unwrap();
        assert_eq!(clone.get_all().unwrap().len(), 1);
    }

    /// Medium that fails every operation, for the best-effort contract.
    #[derive(Clone)]
    struct BrokenMedium;

    impl StorageMedium for BrokenMedium {
        fn get(&self, _key: &str) -> Result<Option<String>, MediumError> {
            Err(MediumError::Io("disk on fire".into()))
        }
        fn put(&self, _key: &str, _value: &str) -> Result<(), MediumError> {
            Err(MediumError::Io("disk on fire".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), MediumError> {
            Err(MediumError::Io("disk on fire".into()))
        }
    }

    #[test]
    fn mutations_succeed_when_medium_writes_fail() {
        let store = PolicyStore::open(BrokenMedium);
        let policy = store.add(draft("POL-001")).unwrap();
        assert_eq!(policy.id, 1);
        assert_eq!(store.get_all().unwrap().len(), 1);

        assert!(store.delete(1).unwrap());
        store.clear().unwrap();
    }

    #[test]
    fn open_over_failing_medium_starts_empty() {
        let store = PolicyStore::open(BrokenMedium);
        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(store.add(draft("POL-001")).unwrap().id, 1);
    }
}
