//! Store plus persistence backend, with the hydration gate.
//!
//! Until [`SchoolSession::load`] has run, mutations only touch memory.

use seiva_domain::{
    CalendarEvent, Employee, EventPatch, PayrollEntry, PayrollStatus, Student, StudentPatch,
    Transaction,
};
use tracing::{error, info, warn};

use crate::{
    school_store::{Reconciliation, SchoolStore},
    storage::{snapshot_warnings, SchoolSnapshot, SchoolStorage},
    CoreError,
};

/// Result of the one-time hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Persisted collections replaced the in-memory ones.
    Restored { warnings: Vec<String> },
    /// Nothing had been persisted; the current collections stay.
    Empty,
    /// Persisted data could not be read; the current collections stay.
    Fallback { reason: String },
}

pub struct SchoolSession {
    store: SchoolStore,
    storage: Box<dyn SchoolStorage>,
    loaded: bool,
}

impl SchoolSession {
    pub fn new(store: SchoolStore, storage: Box<dyn SchoolStorage>) -> Self {
        Self {
            store,
            storage,
            loaded: false,
        }
    }

    pub fn store(&self) -> &SchoolStore {
        &self.store
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Hydrates the store from storage. Opens the persistence gate whatever the outcome.
    pub fn load(&mut self) -> LoadOutcome {
        let outcome = match self.storage.load() {
            Ok(Some(snapshot)) => {
                let warnings = snapshot_warnings(&snapshot);
                for warning in &warnings {
                    warn!(%warning, "persisted data anomaly");
                }
                self.store.replace_all(snapshot);
                info!(
                    students = self.store.students().len(),
                    transactions = self.store.transactions().len(),
                    events = self.store.events().len(),
                    "school data restored"
                );
                LoadOutcome::Restored { warnings }
            }
            Ok(None) => {
                info!("no persisted school data, keeping current records");
                LoadOutcome::Empty
            }
            Err(err) => {
                warn!(error = %err, "failed to load school data, keeping current records");
                LoadOutcome::Fallback {
                    reason: err.to_string(),
                }
            }
        };
        self.loaded = true;
        outcome
    }

    /// Writes all three collections now, ignoring the gate.
    pub fn save(&self) -> Result<(), CoreError> {
        self.storage.save(&self.store.snapshot())
    }

    pub fn add_student(&mut self, student: Student) {
        self.store.add_student(student);
        self.persist();
    }

    pub fn update_student(&mut self, student: Student) -> bool {
        let found = self.store.update_student(student);
        self.persist_if(found);
        found
    }

    pub fn patch_student(&mut self, id: &str, patch: StudentPatch) -> bool {
        let found = self.store.patch_student(id, patch);
        self.persist_if(found);
        found
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Reconciliation {
        let outcome = self.store.add_transaction(transaction);
        self.persist();
        outcome
    }

    pub fn add_event(&mut self, event: CalendarEvent) {
        self.store.add_event(event);
        self.persist();
    }

    pub fn update_event(&mut self, event: CalendarEvent) -> bool {
        let found = self.store.update_event(event);
        self.persist_if(found);
        found
    }

    pub fn patch_event(&mut self, id: &str, patch: EventPatch) -> bool {
        let found = self.store.patch_event(id, patch);
        self.persist_if(found);
        found
    }

    pub fn delete_event(&mut self, id: &str) -> bool {
        let found = self.store.delete_event(id);
        self.persist_if(found);
        found
    }

    pub fn add_employee(&mut self, employee: Employee) {
        self.store.add_employee(employee);
        self.persist();
    }

    pub fn add_payroll_entry(&mut self, entry: PayrollEntry) {
        self.store.add_payroll_entry(entry);
        self.persist();
    }

    pub fn set_payroll_status(&mut self, id: &str, status: PayrollStatus) -> bool {
        let found = self.store.set_payroll_status(id, status);
        self.persist_if(found);
        found
    }

    /// Swaps in every collection, e.g. from a backup, and persists the result.
    pub fn replace_all(&mut self, snapshot: SchoolSnapshot) {
        self.store.replace_all(snapshot);
        self.persist();
    }

    /// Re-derives statuses for today and persists when any changed.
    pub fn refresh_financial_statuses(&mut self) -> usize {
        let changed = self.store.refresh_financial_statuses();
        self.persist_if(changed > 0);
        changed
    }

    fn persist_if(&self, changed: bool) {
        if changed {
            self.persist();
        }
    }

    fn persist(&self) {
        if !self.loaded {
            return;
        }
        if let Err(err) = self.save() {
            error!(error = %err, "failed to persist school data");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::NaiveDate;
    use seiva_domain::{FinancialStatus, Grade};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryState {
        stored: Option<SchoolSnapshot>,
        saves: usize,
        fail_load: bool,
    }

    #[derive(Clone, Default)]
    struct MemoryStorage(Arc<Mutex<MemoryState>>);

    impl SchoolStorage for MemoryStorage {
        fn load(&self) -> Result<Option<SchoolSnapshot>, CoreError> {
            let state = self.0.lock().unwrap();
            if state.fail_load {
                return Err(CoreError::Storage("corrupt students.json".into()));
            }
            Ok(state.stored.clone())
        }

        fn save(&self, snapshot: &SchoolSnapshot) -> Result<(), CoreError> {
            let mut state = self.0.lock().unwrap();
            state.stored = Some(snapshot.clone());
            state.saves += 1;
            Ok(())
        }
    }

    fn session_with(storage: &MemoryStorage) -> SchoolSession {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 10, 20).unwrap());
        SchoolSession::new(SchoolStore::seeded(Box::new(clock)), Box::new(storage.clone()))
    }

    #[test]
    fn mutations_before_load_are_not_persisted() {
        let storage = MemoryStorage::default();
        let mut session = session_with(&storage);
        session.add_student(Student::new("9", "Lia", Grade::First));
        assert_eq!(storage.0.lock().unwrap().saves, 0);

        assert_eq!(session.load(), LoadOutcome::Empty);
        session.add_student(Student::new("10", "Rui", Grade::First));
        let state = storage.0.lock().unwrap();
        assert_eq!(state.saves, 1);
        assert_eq!(state.stored.as_ref().unwrap().students.len(), 5);
    }

    #[test]
    fn load_replaces_seed_with_persisted_snapshot() {
        let storage = MemoryStorage::default();
        storage.0.lock().unwrap().stored = Some(SchoolSnapshot {
            students: vec![Student::new("x", "Ana", Grade::Second).with_paid_months(["outubro"])],
            ..SchoolSnapshot::default()
        });
        let mut session = session_with(&storage);
        assert!(matches!(session.load(), LoadOutcome::Restored { ref warnings } if warnings.is_empty()));
        assert_eq!(session.store().students().len(), 1);
        assert!(session.store().transactions().is_empty());
        assert_eq!(
            session.store().students()[0].financial_status,
            FinancialStatus::Paid
        );
    }

    #[test]
    fn failed_load_keeps_seed_and_opens_gate() {
        let storage = MemoryStorage::default();
        storage.0.lock().unwrap().fail_load = true;
        let mut session = session_with(&storage);
        let outcome = session.load();
        assert!(matches!(outcome, LoadOutcome::Fallback { ref reason } if reason.contains("corrupt")));
        assert!(session.is_loaded());
        assert_eq!(session.store().students().len(), 3);
        assert_eq!(session.store().transactions().len(), 9);
    }

    #[test]
    fn missing_ids_do_not_trigger_saves() {
        let storage = MemoryStorage::default();
        let mut session = session_with(&storage);
        session.load();
        assert!(!session.delete_event("nope"));
        assert!(!session.update_student(Student::new("nope", "Ghost", Grade::First)));
        assert_eq!(storage.0.lock().unwrap().saves, 0);
        assert!(session.delete_event("1"));
        assert_eq!(storage.0.lock().unwrap().saves, 1);
    }
}
