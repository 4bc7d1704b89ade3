use crate::errors::StoreError;
use crate::models::{Calories, Record, RecordId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;
use tracing::error;

/// Persistence collaborator for the tracker. Reads never fail; writes report
/// a [`StoreError`] and leave previously stored values in place.
pub trait Store {
    /// Stored limit, or the store's default when none was saved.
    fn calorie_limit(&self) -> Calories;
    fn set_calorie_limit(&mut self, limit: Calories) -> Result<(), StoreError>;

    fn total_calories(&self, default: Calories) -> Calories;
    fn set_total_calories(&mut self, total: Calories) -> Result<(), StoreError>;

    fn meals(&self) -> Vec<Record>;
    fn save_meal(&mut self, meal: &Record) -> Result<(), StoreError>;
    fn remove_meal(&mut self, id: RecordId) -> Result<(), StoreError>;

    fn workouts(&self) -> Vec<Record>;
    fn save_workout(&mut self, workout: &Record) -> Result<(), StoreError>;
    fn remove_workout(&mut self, id: RecordId) -> Result<(), StoreError>;

    /// Drops the total and all meals and workouts. The limit survives.
    fn clear_all(&mut self) -> Result<(), StoreError>;
}

/// On-disk document layout.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StoredData {
    pub calorie_limit: Option<Calories>,
    pub total_calories: Option<Calories>,
    pub meals: Vec<Record>,
    pub workouts: Vec<Record>,
}

impl StoredData {
    fn clear(&mut self) {
        self.total_calories = None;
        self.meals.clear();
        self.workouts.clear();
    }
}

pub async fn load_data(path: &Path) -> StoredData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                StoredData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoredData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            StoredData::default()
        }
    }
}

fn persist_data(path: &Path, data: &StoredData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    blocking_write(path, &payload)?;
    Ok(())
}

/// Writes from inside a multi-threaded runtime hand the worker's other tasks
/// off first. `block_in_place` panics on a current-thread runtime, so there
/// and outside any runtime the write just runs inline.
fn blocking_write(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            task::block_in_place(|| std::fs::write(path, payload))
        }
        _ => std::fs::write(path, payload),
    }
}

/// Store backed by a single JSON file that is rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    default_limit: Calories,
    data: StoredData,
}

impl JsonFileStore {
    pub fn new(path: PathBuf, data: StoredData, default_limit: Calories) -> Self {
        Self {
            path,
            default_limit,
            data,
        }
    }

    pub async fn open(path: PathBuf, default_limit: Calories) -> Self {
        let data = load_data(&path).await;
        Self::new(path, data, default_limit)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the document and keeps it only if the
    /// file write succeeds.
    fn update(&mut self, change: impl FnOnce(&mut StoredData)) -> Result<(), StoreError> {
        let mut next = self.data.clone();
        change(&mut next);
        persist_data(&self.path, &next)?;
        self.data = next;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn calorie_limit(&self) -> Calories {
        self.data.calorie_limit.unwrap_or(self.default_limit)
    }

    fn set_calorie_limit(&mut self, limit: Calories) -> Result<(), StoreError> {
        self.update(|data| data.calorie_limit = Some(limit))
    }

    fn total_calories(&self, default: Calories) -> Calories {
        self.data.total_calories.unwrap_or(default)
    }

    fn set_total_calories(&mut self, total: Calories) -> Result<(), StoreError> {
        self.update(|data| data.total_calories = Some(total))
    }

    fn meals(&self) -> Vec<Record> {
        self.data.meals.clone()
    }

    fn save_meal(&mut self, meal: &Record) -> Result<(), StoreError> {
        self.update(|data| data.meals.push(meal.clone()))
    }

    fn remove_meal(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.update(|data| data.meals.retain(|meal| meal.id != id))
    }

    fn workouts(&self) -> Vec<Record> {
        self.data.workouts.clone()
    }

    fn save_workout(&mut self, workout: &Record) -> Result<(), StoreError> {
        self.update(|data| data.workouts.push(workout.clone()))
    }

    fn remove_workout(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.update(|data| data.workouts.retain(|workout| workout.id != id))
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.update(StoredData::clear)
    }
}

/// Store that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    default_limit: Calories,
    data: StoredData,
}

impl MemoryStore {
    pub fn new(default_limit: Calories) -> Self {
        Self {
            default_limit,
            data: StoredData::default(),
        }
    }

    pub fn data(&self) -> &StoredData {
        &self.data
    }
}

impl Store for MemoryStore {
    fn calorie_limit(&self) -> Calories {
        self.data.calorie_limit.unwrap_or(self.default_limit)
    }

    fn set_calorie_limit(&mut self, limit: Calories) -> Result<(), StoreError> {
        self.data.calorie_limit = Some(limit);
        Ok(())
    }

    fn total_calories(&self, default: Calories) -> Calories {
        self.data.total_calories.unwrap_or(default)
    }

    fn set_total_calories(&mut self, total: Calories) -> Result<(), StoreError> {
        self.data.total_calories = Some(total);
        Ok(())
    }

    fn meals(&self) -> Vec<Record> {
        self.data.meals.clone()
    }

    fn save_meal(&mut self, meal: &Record) -> Result<(), StoreError> {
        self.data.meals.push(meal.clone());
        Ok(())
    }

    fn remove_meal(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.data.meals.retain(|meal| meal.id != id);
        Ok(())
    }

    fn workouts(&self) -> Vec<Record> {
        self.data.workouts.clone()
    }

    fn save_workout(&mut self, workout: &Record) -> Result<(), StoreError> {
        self.data.workouts.push(workout.clone());
        Ok(())
    }

    fn remove_workout(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.data.workouts.retain(|workout| workout.id != id);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.data.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("tracker.json"), StoredData::default(), 2000)
    }

    #[test]
    fn limit_falls_back_to_default() {
        let store = MemoryStore::new(1800);
        assert_eq!(store.calorie_limit(), 1800);
        assert_eq!(store.total_calories(0), 0);
    }

    #[test]
    fn clear_all_keeps_limit() {
        let mut store = MemoryStore::new(2000);
        store.set_calorie_limit(2400).unwrap();
        store.set_total_calories(350).unwrap();
        store.save_meal(&Record::meal("Bagel", 350)).unwrap();
        store.save_workout(&Record::workout("Yoga", 0)).unwrap();

        store.clear_all().unwrap();

        assert_eq!(store.calorie_limit(), 2400);
        assert_eq!(store.total_calories(-1), -1);
        assert!(store.meals().is_empty());
        assert!(store.workouts().is_empty());
    }

    #[test]
    fn file_store_writes_every_change() {
        let dir = TempDir::new().unwrap();
        let mut store = file_store(&dir);
        let meal = Record::meal("Burrito", 800);

        store.save_meal(&meal).unwrap();
        store.set_total_calories(800).unwrap();

        let on_disk: StoredData =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk.meals, vec![meal.clone()]);
        assert_eq!(on_disk.total_calories, Some(800));
        assert_eq!(on_disk.calorie_limit, None);

        store.remove_meal(meal.id).unwrap();
        let on_disk: StoredData =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert!(on_disk.meals.is_empty());
    }

    #[test]
    fn failed_write_leaves_document_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("tracker.json");
        let mut store = JsonFileStore::new(path, StoredData::default(), 2000);

        let result = store.save_workout(&Record::workout("Spin", 400));

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(store.workouts().is_empty());
    }

    #[tokio::test]
    async fn open_reads_what_was_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");
        let workout = Record::workout("Boxing", 600);
        {
            let mut store = JsonFileStore::new(path.clone(), StoredData::default(), 2000);
            store.set_calorie_limit(2200).unwrap();
            store.save_workout(&workout).unwrap();
            store.set_total_calories(-600).unwrap();
        }

        let reopened = JsonFileStore::open(path, 2000).await;
        assert_eq!(reopened.calorie_limit(), 2200);
        assert_eq!(reopened.total_calories(0), -600);
        assert_eq!(reopened.workouts(), vec![workout]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn writes_from_a_multi_thread_runtime() {
        let dir = TempDir::new().unwrap();
        let mut store = file_store(&dir);
        let meal = Record::meal("Ramen", 650);

        store.save_meal(&meal).unwrap();
        store.set_total_calories(650).unwrap();

        let reopened = JsonFileStore::open(store.path().to_path_buf(), 2000).await;
        assert_eq!(reopened.meals(), vec![meal]);
        assert_eq!(reopened.total_calories(0), 650);
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let data = load_data(&path).await;
        assert_eq!(data, StoredData::default());
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let data = load_data(&dir.path().join("nope.json")).await;
        assert_eq!(data, StoredData::default());
    }
}
