use crate::models::{Calories, Record, RecordId};
use tracing::warn;

/// Running calorie account for the day.
///
/// `total_calories` is kept up to date by every mutation rather than summed
/// on read, and always equals `consumed() - burned()`. Arithmetic saturates at
/// the `Calories` bounds instead of overflowing.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    calorie_limit: Calories,
    total_calories: Calories,
    meals: Vec<Record>,
    workouts: Vec<Record>,
}

impl Ledger {
    pub fn new(calorie_limit: Calories) -> Self {
        Self {
            calorie_limit,
            total_calories: 0,
            meals: Vec::new(),
            workouts: Vec::new(),
        }
    }

    /// Rebuild a ledger from persisted values. A stored total that does not
    /// match the stored records is replaced by the recomputed one.
    pub fn restore(
        calorie_limit: Calories,
        total_calories: Calories,
        meals: Vec<Record>,
        workouts: Vec<Record>,
    ) -> Self {
        let mut ledger = Self {
            calorie_limit,
            total_calories: 0,
            meals,
            workouts,
        };
        let expected = ledger.consumed().saturating_sub(ledger.burned());
        if expected != total_calories {
            warn!(
                stored = total_calories,
                expected, "stored calorie total does not match records, using recomputed total"
            );
        }
        ledger.total_calories = expected;
        ledger
    }

    pub fn calorie_limit(&self) -> Calories {
        self.calorie_limit
    }

    pub fn total_calories(&self) -> Calories {
        self.total_calories
    }

    pub fn meals(&self) -> &[Record] {
        &self.meals
    }

    pub fn workouts(&self) -> &[Record] {
        &self.workouts
    }

    pub fn add_meal(&mut self, meal: Record) {
        self.total_calories = self.total_calories.saturating_add(meal.calories);
        self.meals.push(meal);
    }

    pub fn add_workout(&mut self, workout: Record) {
        self.total_calories = self.total_calories.saturating_sub(workout.calories);
        self.workouts.push(workout);
    }

    /// Removes the meal with `id`. A missing id is a no-op and returns `None`.
    pub fn remove_meal(&mut self, id: RecordId) -> Option<Record> {
        let index = self.meals.iter().position(|meal| meal.id == id)?;
        let meal = self.meals.remove(index);
        self.total_calories = self.total_calories.saturating_sub(meal.calories);
        Some(meal)
    }

    /// Removes the workout with `id`. A missing id is a no-op and returns `None`.
    pub fn remove_workout(&mut self, id: RecordId) -> Option<Record> {
        let index = self.workouts.iter().position(|workout| workout.id == id)?;
        let workout = self.workouts.remove(index);
        self.total_calories = self.total_calories.saturating_add(workout.calories);
        Some(workout)
    }

    pub fn set_limit(&mut self, calorie_limit: Calories) {
        self.calorie_limit = calorie_limit;
    }

    /// Back to the zero state. The limit is kept.
    pub fn reset(&mut self) {
        self.total_calories = 0;
        self.meals.clear();
        self.workouts.clear();
    }

    pub fn consumed(&self) -> Calories {
        self.meals
            .iter()
            .fold(0, |total: Calories, meal| total.saturating_add(meal.calories))
    }

    pub fn burned(&self) -> Calories {
        self.workouts
            .iter()
            .fold(0, |total: Calories, workout| total.saturating_add(workout.calories))
    }

    pub fn remaining(&self) -> Calories {
        self.calorie_limit.saturating_sub(self.total_calories)
    }

    /// Share of the limit used so far, clamped to `0..=100`.
    ///
    /// A non-positive limit has no meaningful ratio: any positive total
    /// counts as 100%, anything else as 0%.
    pub fn progress_percentage(&self) -> f64 {
        if self.calorie_limit <= 0 {
            return if self.total_calories > 0 { 100.0 } else { 0.0 };
        }
        let percentage = self.total_calories as f64 / self.calorie_limit as f64 * 100.0;
        percentage.clamp(0.0, 100.0)
    }
}
