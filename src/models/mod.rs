// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod food;
pub mod recipe;
pub mod user;

pub use food::{FoodItem, MealType, NutrientTotals, NutritionGoals};
pub use recipe::{Recipe, RecipePage};
pub use user::{ActivityLevel, Gender, ProfileView, PublicUser, User};
