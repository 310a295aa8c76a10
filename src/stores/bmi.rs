// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BMI calculator state.

use super::PersistedStore;
use crate::services::nutrition::{self, Bmi, Height, Weight};
use crate::time_utils::now_rfc3339;
use serde::{Deserialize, Serialize};

/// Last BMI calculation with the imperial inputs that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiRecord {
    pub feet: f64,
    pub inches: f64,
    pub weight_lbs: f64,
    /// Value and category, always set together.
    pub result: Option<Bmi>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiStore {
    bmi_data: BmiRecord,
}

impl PersistedStore for BmiStore {
    const NAME: &'static str = "bmi-storage";
}

impl BmiStore {
    pub fn record(&self) -> &BmiRecord {
        &self.bmi_data
    }

    /// Compute BMI and replace the whole record.
    pub fn calculate(&mut self, feet: f64, inches: f64, weight_lbs: f64) -> Bmi {
        let result = nutrition::bmi(
            Height::FeetInches { feet, inches },
            Weight::Lbs(weight_lbs),
        );
        self.bmi_data = BmiRecord {
            feet,
            inches,
            weight_lbs,
            result: Some(result),
            last_updated: Some(now_rfc3339()),
        };
        result
    }

    pub fn clear(&mut self) {
        self.bmi_data = BmiRecord::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::nutrition::BmiCategory;

    #[test]
    fn test_calculate_replaces_record() {
        let mut store = BmiStore::default();

        let bmi = store.calculate(5.0, 10.0, 160.0);
        assert_eq!(bmi.value, 23.0);
        assert_eq!(bmi.category, BmiCategory::Normal);

        let record = store.record();
        assert_eq!(record.feet, 5.0);
        assert_eq!(record.weight_lbs, 160.0);
        assert_eq!(record.result, Some(bmi));
        assert!(record.last_updated.is_some());

        store.calculate(5.0, 0.0, 200.0);
        let record = store.record();
        assert_eq!(record.inches, 0.0);
        assert_eq!(record.result.map(|b| b.category), Some(BmiCategory::Obese));
    }

    #[test]
    fn test_clear_resets_defaults() {
        let mut store = BmiStore::default();
        store.calculate(6.0, 1.0, 180.0);
        store.clear();
        assert_eq!(store, BmiStore::default());
    }

    #[test]
    fn test_category_serialized_as_label() {
        let mut store = BmiStore::default();
        store.calculate(5.0, 10.0, 160.0);
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["bmiData"]["result"]["category"], "Normal weight");
    }
}
