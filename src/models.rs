use crate::ledger::Ledger;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Calories are whole numbers; a meal adds them, a workout takes them away.
pub type Calories = i64;

/// Largest calorie count accepted for a single meal or workout.
pub const MAX_RECORD_CALORIES: Calories = 100_000;

/// Largest daily limit accepted from a request.
pub const MAX_CALORIE_LIMIT: Calories = 1_000_000;

pub type RecordId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Meal,
    Workout,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Meal => "meal",
            RecordKind::Workout => "workout",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single meal or workout entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub calories: Calories,
    pub kind: RecordKind,
}

impl Record {
    pub fn new(kind: RecordKind, name: impl Into<String>, calories: Calories) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            calories,
            kind,
        }
    }

    pub fn meal(name: impl Into<String>, calories: Calories) -> Self {
        Self::new(RecordKind::Meal, name, calories)
    }

    pub fn workout(name: impl Into<String>, calories: Calories) -> Self {
        Self::new(RecordKind::Workout, name, calories)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewRecordRequest {
    pub name: String,
    pub calories: Calories,
}

/// Form body for the HTML add forms. Fields stay strings so empty inputs
/// reach validation instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct NewRecordForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub calories: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitRequest {
    pub calorie_limit: Calories,
}

#[derive(Debug, Deserialize)]
pub struct LimitForm {
    #[serde(default)]
    pub limit: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitStatus {
    Under,
    Over,
}

impl LimitStatus {
    pub fn from_remaining(remaining: Calories) -> Self {
        if remaining < 0 {
            LimitStatus::Over
        } else {
            LimitStatus::Under
        }
    }
}

/// Read-only view of the ledger handed to the presentation layer after
/// every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub calorie_limit: Calories,
    pub total_calories: Calories,
    pub consumed: Calories,
    pub burned: Calories,
    pub remaining: Calories,
    pub progress_percentage: f64,
    pub status: LimitStatus,
    pub meals: Vec<Record>,
    pub workouts: Vec<Record>,
}

impl From<&Ledger> for Snapshot {
    fn from(ledger: &Ledger) -> Self {
        let remaining = ledger.remaining();
        Self {
            calorie_limit: ledger.calorie_limit(),
            total_calories: ledger.total_calories(),
            consumed: ledger.consumed(),
            burned: ledger.burned(),
            remaining,
            progress_percentage: ledger.progress_percentage(),
            status: LimitStatus::from_remaining(remaining),
            meals: ledger.meals().to_vec(),
            workouts: ledger.workouts().to_vec(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub record: Record,
    pub summary: Snapshot,
}

/// Case-insensitive substring match on record names. An empty query keeps
/// everything.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
        .collect()
}
