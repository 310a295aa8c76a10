// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food log, favorites and nutrition goals.

use super::macros::MacroGoals;
use super::PersistedStore;
use crate::models::{FoodItem, MealType, NutrientTotals, NutritionGoals};
use crate::time_utils::now_rfc3339;
use serde::{Deserialize, Serialize};

/// A logged food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedFood {
    #[serde(flatten)]
    pub food: FoodItem,
    pub meal_type: MealType,
    pub timestamp: String,
}

/// Partial goals update; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GoalsUpdate {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodStore {
    tracked_foods: Vec<TrackedFood>,
    favorite_items: Vec<FoodItem>,
    nutrition_goals: NutritionGoals,
}

impl PersistedStore for FoodStore {
    const NAME: &'static str = "food-storage";
}

impl FoodStore {
    pub fn tracked_foods(&self) -> &[TrackedFood] {
        &self.tracked_foods
    }

    pub fn favorites(&self) -> &[FoodItem] {
        &self.favorite_items
    }

    pub fn nutrition_goals(&self) -> &NutritionGoals {
        &self.nutrition_goals
    }

    /// Append a food to the log, stamped with the current time.
    pub fn add_food(&mut self, food: FoodItem, meal_type: MealType) {
        self.tracked_foods.push(TrackedFood {
            food,
            meal_type,
            timestamp: now_rfc3339(),
        });
    }

    /// Remove the log entry at `index`; later entries shift down by one.
    /// Out-of-range indices are ignored.
    pub fn remove_food(&mut self, index: usize) -> Option<TrackedFood> {
        (index < self.tracked_foods.len()).then(|| self.tracked_foods.remove(index))
    }

    /// Empty the log. Favorites and goals are kept.
    pub fn clear_foods(&mut self) {
        self.tracked_foods.clear();
    }

    pub fn foods_by_meal_type(&self, meal_type: MealType) -> impl Iterator<Item = &TrackedFood> {
        self.tracked_foods
            .iter()
            .filter(move |entry| entry.meal_type == meal_type)
    }

    pub fn add_to_favorites(&mut self, food: FoodItem) {
        self.favorite_items.push(food);
    }

    pub fn remove_from_favorites(&mut self, index: usize) -> Option<FoodItem> {
        (index < self.favorite_items.len()).then(|| self.favorite_items.remove(index))
    }

    /// Merge `update` into the goals and mark them as calculator-derived.
    pub fn update_nutrition_goals(&mut self, update: GoalsUpdate) {
        let goals = &mut self.nutrition_goals;
        if let Some(calories) = update.calories {
            goals.calories = calories;
        }
        if let Some(protein) = update.protein {
            goals.protein = protein;
        }
        if let Some(carbs) = update.carbs {
            goals.carbs = carbs;
        }
        if let Some(fat) = update.fat {
            goals.fat = fat;
        }
        goals.is_from_calculator = true;
    }

    /// Overwrite the goals with a macro calculator result.
    pub fn apply_macro_goals(&mut self, macros: &MacroGoals) {
        self.nutrition_goals = NutritionGoals {
            calories: macros.calories as f64,
            protein: macros.protein as f64,
            carbs: macros.carbs as f64,
            fat: macros.fat as f64,
            is_from_calculator: true,
        };
    }

    /// Nutrients summed over the whole log.
    pub fn totals(&self) -> NutrientTotals {
        let mut totals = NutrientTotals::default();
        for entry in &self.tracked_foods {
            totals.add(&entry.food);
        }
        totals
    }
}
