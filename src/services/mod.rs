// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod auth;
pub mod nutrition;
pub mod nutritionix;
pub mod password;
pub mod profile;
pub mod spoonacular;
pub mod upstream;

pub use auth::AuthService;
pub use nutritionix::NutritionixClient;
pub use password::PasswordHasher;
pub use spoonacular::SpoonacularClient;
