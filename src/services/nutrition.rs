// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body-composition and energy calculations.
//!
//! - BMI with imperial or metric inputs, rounded to one decimal
//! - BMR via Mifflin-St Jeor (1990)
//! - TDEE as BMR times an activity multiplier
//! - A fixed 30/40/30 protein/carbs/fat calorie split
//!
//! All functions are pure. Inputs are not range-checked; callers validate.
//! Rounding is `f64::round` (half away from zero) throughout.

use crate::error::AppError;
use crate::models::{ActivityLevel, Gender};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CM_PER_INCH: f64 = 2.54;
pub const INCHES_PER_FOOT: f64 = 12.0;
pub const KG_PER_LB: f64 = 0.453592;
pub const LBS_PER_KG: f64 = 2.20462;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

pub const PROTEIN_SHARE: f64 = 0.30;
pub const CARBS_SHARE: f64 = 0.40;
pub const FAT_SHARE: f64 = 0.30;

/// Calculation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    /// Mifflin-St Jeor only defines male and female offsets.
    #[error("BMR is not defined for gender {0:?}")]
    UnsupportedGender(Gender),
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        AppError::Unsupported(err.to_string())
    }
}

/// Height in either unit system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Height {
    Cm(f64),
    FeetInches { feet: f64, inches: f64 },
}

impl Height {
    pub fn to_cm(self) -> f64 {
        match self {
            Height::Cm(cm) => cm,
            Height::FeetInches { feet, inches } => (feet * INCHES_PER_FOOT + inches) * CM_PER_INCH,
        }
    }
}

/// Weight in either unit system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    Kg(f64),
    Lbs(f64),
}

impl Weight {
    pub fn to_kg(self) -> f64 {
        match self {
            Weight::Kg(kg) => kg,
            Weight::Lbs(lbs) => lbs * KG_PER_LB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    Normal,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obese")]
    Obese,
}

impl BmiCategory {
    /// Classify a BMI value. Lower bounds are inclusive.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A BMI value with the category derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

/// Body Mass Index, rounded to one decimal place.
///
/// The category is derived from the rounded value.
pub fn bmi(height: Height, weight: Weight) -> Bmi {
    let height_m = height.to_cm() / 100.0;
    let value = round_to(weight.to_kg() / (height_m * height_m), 1);
    Bmi {
        value,
        category: BmiCategory::from_bmi(value),
    }
}

/// Basal Metabolic Rate (kcal/day) via Mifflin-St Jeor.
///
/// BMR = 10 x kg + 6.25 x cm - 5 x age + offset, where the offset is +5 for
/// men and -161 for women.
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> Result<f64, CalcError> {
    let offset = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
        Gender::Other => return Err(CalcError::UnsupportedGender(gender)),
    };
    Ok(10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + offset)
}

/// Total Daily Energy Expenditure (kcal/day).
pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

/// Daily calorie and macronutrient targets, each independently rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroSplit {
    /// kcal
    pub calories: i64,
    /// grams
    pub protein: i64,
    /// grams
    pub carbs: i64,
    /// grams
    pub fat: i64,
}

/// Split a TDEE 30/40/30 across protein, carbs and fat.
pub fn macro_split(tdee: f64) -> MacroSplit {
    MacroSplit {
        calories: tdee.round() as i64,
        protein: (tdee * PROTEIN_SHARE / KCAL_PER_G_PROTEIN).round() as i64,
        carbs: (tdee * CARBS_SHARE / KCAL_PER_G_CARBS).round() as i64,
        fat: (tdee * FAT_SHARE / KCAL_PER_G_FAT).round() as i64,
    }
}

/// BMR, TDEE and the resulting macro split for one person.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTargets {
    pub bmr: f64,
    pub tdee: f64,
    pub macros: MacroSplit,
}

/// Run BMR, TDEE and macro split in sequence.
pub fn daily_targets(
    weight: Weight,
    height: Height,
    age_years: f64,
    gender: Gender,
    activity: ActivityLevel,
) -> Result<DailyTargets, CalcError> {
    let bmr = bmr(weight.to_kg(), height.to_cm(), age_years, gender)?;
    let tdee = tdee(bmr, activity);
    Ok(DailyTargets {
        bmr,
        tdee,
        macros: macro_split(tdee),
    })
}

/// Kilograms to pounds, one decimal.
pub fn kg_to_lbs(kg: f64) -> f64 {
    round_to(kg * LBS_PER_KG, 1)
}

/// Centimetres to whole feet and rounded inches.
pub fn cm_to_feet_inches(cm: f64) -> (u32, u32) {
    let total_inches = cm / CM_PER_INCH;
    let mut feet = (total_inches / INCHES_PER_FOOT).floor() as u32;
    let mut inches = (total_inches % INCHES_PER_FOOT).round() as u32;
    if inches == 12 {
        feet += 1;
        inches = 0;
    }
    (feet, inches)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_metric() {
        let result = bmi(Height::Cm(175.0), Weight::Kg(70.0));
        assert_eq!(result.value, 22.9);
        assert_eq!(result.category, BmiCategory::Normal);
    }

    #[test]
    fn test_bmi_imperial_matches_metric() {
        let imperial = bmi(
            Height::FeetInches {
                feet: 5.0,
                inches: 7.0,
            },
            Weight::Lbs(150.0),
        );
        let metric = bmi(Height::Cm(170.18), Weight::Kg(68.04));

        assert_eq!(imperial.value, 23.5);
        assert_eq!(imperial.category, BmiCategory::Normal);
        assert!((imperial.value - metric.value).abs() <= 0.1);
        assert_eq!(imperial.category.to_string(), "Normal weight");
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(0.0), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.9), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
        assert_eq!(BmiCategory::from_bmi(55.0), BmiCategory::Obese);
    }

    #[test]
    fn test_bmi_formula_over_grid() {
        for height_cm in [150.0, 162.5, 175.0, 190.0] {
            for weight_kg in [45.0, 60.5, 82.0, 120.0] {
                let height_m: f64 = height_cm / 100.0;
                let expected = (weight_kg / (height_m * height_m) * 10.0).round() / 10.0;
                let result = bmi(Height::Cm(height_cm), Weight::Kg(weight_kg));
                assert_eq!(result.value, expected);
                assert_eq!(result.category, BmiCategory::from_bmi(expected));
            }
        }
    }

    #[test]
    fn test_bmr_mifflin_st_jeor() {
        // 700 + 1093.75 - 150 = 1643.75 before the gender offset
        assert_eq!(bmr(70.0, 175.0, 30.0, Gender::Male).unwrap(), 1648.75);
        assert_eq!(bmr(70.0, 175.0, 30.0, Gender::Female).unwrap(), 1482.75);
    }

    #[test]
    fn test_bmr_other_gender_unsupported() {
        assert_eq!(
            bmr(70.0, 175.0, 30.0, Gender::Other),
            Err(CalcError::UnsupportedGender(Gender::Other))
        );
    }

    #[test]
    fn test_tdee_and_macros_reference_case() {
        let targets = daily_targets(
            Weight::Kg(70.0),
            Height::Cm(175.0),
            30.0,
            Gender::Male,
            ActivityLevel::Sedentary,
        )
        .unwrap();

        assert_eq!(targets.bmr, 1648.75);
        assert_eq!(targets.tdee, 1978.5);
        // 1978.5 rounds half away from zero
        assert_eq!(
            targets.macros,
            MacroSplit {
                calories: 1979,
                protein: 148,
                carbs: 198,
                fat: 66,
            }
        );
    }

    #[test]
    fn test_macro_kcal_close_to_total() {
        for tdee in [1200.0, 1850.3, 2450.0, 3333.3, 4100.9] {
            let split = macro_split(tdee);
            let kcal = 4 * split.protein + 4 * split.carbs + 9 * split.fat;
            // Each gram count is off by at most 0.5 g.
            assert!((kcal - split.calories).abs() as f64 <= 0.5 * (4.0 + 4.0 + 9.0) + 0.5);
        }
    }

    #[test]
    fn test_unit_helpers() {
        assert_eq!(kg_to_lbs(70.0), 154.3);
        assert_eq!(cm_to_feet_inches(170.18), (5, 7));
        assert_eq!(cm_to_feet_inches(182.0), (6, 0));
        // 5'11.8" rounds up into the next foot
        assert_eq!(cm_to_feet_inches(182.3), (6, 0));
    }
}
