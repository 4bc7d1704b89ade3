use crate::errors::StoreError;
use crate::ledger::Ledger;
use crate::models::{Calories, Record, RecordId, RecordKind, Snapshot};
use crate::storage::Store;
use tracing::{debug, info, warn};

/// A [`Ledger`] bound to the [`Store`] that persists it.
///
/// Every mutation is staged on a copy of the ledger, written to the store,
/// and only then swapped in. When the store refuses a write the in-memory
/// state is left exactly as it was and the error is returned.
#[derive(Debug)]
pub struct Tracker<S> {
    ledger: Ledger,
    store: S,
}

impl<S: Store> Tracker<S> {
    pub fn load(store: S) -> Self {
        let ledger = Ledger::restore(
            store.calorie_limit(),
            store.total_calories(0),
            store.meals(),
            store.workouts(),
        );
        info!(
            calorie_limit = ledger.calorie_limit(),
            total_calories = ledger.total_calories(),
            meals = ledger.meals().len(),
            workouts = ledger.workouts().len(),
            "tracker loaded"
        );
        Self { ledger, store }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.ledger)
    }

    pub fn add_meal(
        &mut self,
        name: impl Into<String>,
        calories: Calories,
    ) -> Result<Record, StoreError> {
        self.add(Record::meal(name, calories))
    }

    pub fn add_workout(
        &mut self,
        name: impl Into<String>,
        calories: Calories,
    ) -> Result<Record, StoreError> {
        self.add(Record::workout(name, calories))
    }

    /// Returns `Ok(None)` without touching the store when no meal has `id`.
    pub fn remove_meal(&mut self, id: RecordId) -> Result<Option<Record>, StoreError> {
        self.remove(RecordKind::Meal, id)
    }

    /// Returns `Ok(None)` without touching the store when no workout has `id`.
    pub fn remove_workout(&mut self, id: RecordId) -> Result<Option<Record>, StoreError> {
        self.remove(RecordKind::Workout, id)
    }

    pub fn set_limit(&mut self, calorie_limit: Calories) -> Result<(), StoreError> {
        self.store.set_calorie_limit(calorie_limit)?;
        self.ledger.set_limit(calorie_limit);
        info!(calorie_limit, "calorie limit updated");
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.clear_all()?;
        self.ledger.reset();
        info!("tracker reset");
        Ok(())
    }

    fn add(&mut self, record: Record) -> Result<Record, StoreError> {
        let mut next = self.ledger.clone();
        match record.kind {
            RecordKind::Meal => {
                next.add_meal(record.clone());
                self.store.save_meal(&record)?;
            }
            RecordKind::Workout => {
                next.add_workout(record.clone());
                self.store.save_workout(&record)?;
            }
        }

        if let Err(err) = self.store.set_total_calories(next.total_calories()) {
            self.undo_save(&record);
            return Err(err);
        }

        self.ledger = next;
        info!(
            kind = %record.kind,
            id = %record.id,
            calories = record.calories,
            total_calories = self.ledger.total_calories(),
            "record added"
        );
        Ok(record)
    }

    fn remove(&mut self, kind: RecordKind, id: RecordId) -> Result<Option<Record>, StoreError> {
        let mut next = self.ledger.clone();
        let removed = match kind {
            RecordKind::Meal => next.remove_meal(id),
            RecordKind::Workout => next.remove_workout(id),
        };
        let Some(record) = removed else {
            debug!(%kind, %id, "nothing to remove");
            return Ok(None);
        };

        self.store.set_total_calories(next.total_calories())?;
        let removed_from_store = match kind {
            RecordKind::Meal => self.store.remove_meal(id),
            RecordKind::Workout => self.store.remove_workout(id),
        };
        if let Err(err) = removed_from_store {
            if let Err(undo) = self.store.set_total_calories(self.ledger.total_calories()) {
                warn!(%kind, %id, "failed to restore stored total: {undo}");
            }
            return Err(err);
        }

        self.ledger = next;
        info!(
            %kind,
            %id,
            calories = record.calories,
            total_calories = self.ledger.total_calories(),
            "record removed"
        );
        Ok(Some(record))
    }

    fn undo_save(&mut self, record: &Record) {
        let undone = match record.kind {
            RecordKind::Meal => self.store.remove_meal(record.id),
            RecordKind::Workout => self.store.remove_workout(record.id),
        };
        if let Err(err) = undone {
            warn!(kind = %record.kind, id = %record.id, "failed to roll back stored record: {err}");
        }
    }
}
