// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side state stores.
//!
//! Each store is an owned value with a mutation API. Persistence is explicit:
//! callers load a store from a [`StoreDir`] at startup and save it after
//! mutating. A store is saved as `<dir>/<name>.json`.

pub mod bmi;
pub mod food;
pub mod macros;

pub use bmi::BmiStore;
pub use food::FoodStore;
pub use macros::MacroStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Store persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("store {name} is corrupt: {source}")]
    Serde {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A store with a fixed persistence name.
pub trait PersistedStore: Serialize + DeserializeOwned + Default {
    const NAME: &'static str;
}

/// Directory holding persisted stores.
#[derive(Debug, Clone)]
pub struct StoreDir {
    root: PathBuf,
}

impl StoreDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for<S: PersistedStore>(&self) -> PathBuf {
        self.root.join(format!("{}.json", S::NAME))
    }

    /// Load a store, or its defaults when nothing was saved yet.
    pub fn load<S: PersistedStore>(&self) -> Result<S, StoreError> {
        let path = self.path_for::<S>();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(store = S::NAME, "No saved state, using defaults");
                return Ok(S::default());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Serde {
            name: S::NAME,
            source,
        })
    }

    /// Save a store, replacing any previous state.
    ///
    /// Written to a temporary file and renamed into place, so a crash never
    /// leaves a half-written store behind.
    pub fn save<S: PersistedStore>(&self, store: &S) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let json = serde_json::to_vec_pretty(store).map_err(|source| StoreError::Serde {
            name: S::NAME,
            source,
        })?;

        let path = self.path_for::<S>();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(store = S::NAME, "Saved store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crate::models::{FoodItem, MealType};

    fn apple() -> FoodItem {
        FoodItem {
            name: "apple".to_string(),
            serving_qty: 1.0,
            serving_unit: "medium".to_string(),
            calories: 95.0,
            protein: 0.5,
            carbs: 25.0,
            fat: 0.3,
            brand_name: None,
        }
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let stores = StoreDir::new(dir.path());

        let food: FoodStore = stores.load().unwrap();
        assert!(food.tracked_foods().is_empty());
        assert_eq!(food.nutrition_goals().calories, 2000.0);

        let bmi: BmiStore = stores.load().unwrap();
        assert_eq!(bmi.record().result, None);
    }

    #[test]
    fn test_store_names() {
        let stores = StoreDir::new("/data");
        assert_eq!(
            stores.path_for::<BmiStore>(),
            Path::new("/data/bmi-storage.json")
        );
        assert_eq!(
            stores.path_for::<MacroStore>(),
            Path::new("/data/macro-calculator-storage.json")
        );
        assert_eq!(
            stores.path_for::<FoodStore>(),
            Path::new("/data/food-storage.json")
        );
    }

    #[test]
    fn test_save_then_reload_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let stores = StoreDir::new(dir.path().join("nested"));

        let mut food = FoodStore::default();
        food.add_food(apple(), MealType::Lunch);
        food.add_to_favorites(apple());
        stores.save(&food).unwrap();

        let reloaded: FoodStore = stores.load().unwrap();
        assert_eq!(reloaded.tracked_foods().len(), 1);
        assert_eq!(reloaded.tracked_foods()[0].meal_type, MealType::Lunch);
        assert_eq!(reloaded.favorites().len(), 1);
        assert!(!stores.path_for::<FoodStore>().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let stores = StoreDir::new(dir.path());
        fs::write(stores.path_for::<MacroStore>(), b"{not json").unwrap();

        let err = stores.load::<MacroStore>().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Serde {
                name: "macro-calculator-storage",
                ..
            }
        ));
    }
}
