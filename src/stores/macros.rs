// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Macro calculator state.

use super::PersistedStore;
use crate::models::{ActivityLevel, Gender};
use crate::services::nutrition::{self, CalcError, Height, Weight};
use crate::time_utils::now_rfc3339;
use serde::{Deserialize, Serialize};

/// Calculator inputs in imperial units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroInputs {
    pub weight_lbs: f64,
    pub feet: f64,
    pub inches: f64,
    pub age: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
}

impl Default for MacroInputs {
    fn default() -> Self {
        Self {
            weight_lbs: 0.0,
            feet: 0.0,
            inches: 0.0,
            age: 0.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroGoals {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
    pub last_calculated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroCalculatorData {
    #[serde(flatten)]
    pub inputs: MacroInputs,
    /// None until a calculation has run.
    pub macro_goals: Option<MacroGoals>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroStore {
    calculator_data: MacroCalculatorData,
}

impl PersistedStore for MacroStore {
    const NAME: &'static str = "macro-calculator-storage";
}

impl MacroStore {
    pub fn data(&self) -> &MacroCalculatorData {
        &self.calculator_data
    }

    pub fn macro_goals(&self) -> Option<&MacroGoals> {
        self.calculator_data.macro_goals.as_ref()
    }

    /// Compute goals from `inputs` and replace the calculator data wholesale.
    ///
    /// On error the stored data is left untouched.
    pub fn calculate(&mut self, inputs: MacroInputs) -> Result<&MacroGoals, CalcError> {
        let targets = nutrition::daily_targets(
            Weight::Lbs(inputs.weight_lbs),
            Height::FeetInches {
                feet: inputs.feet,
                inches: inputs.inches,
            },
            inputs.age,
            inputs.gender,
            inputs.activity_level,
        )?;

        let goals = MacroGoals {
            calories: targets.macros.calories,
            protein: targets.macros.protein,
            carbs: targets.macros.carbs,
            fat: targets.macros.fat,
            last_calculated: now_rfc3339(),
        };
        self.calculator_data.inputs = inputs;
        Ok(&*self.calculator_data.macro_goals.insert(goals))
    }

    pub fn clear(&mut self) {
        self.calculator_data = MacroCalculatorData::default();
    }
}
