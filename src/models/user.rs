// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Gender as recorded on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Activity level, stored as its 1-5 ordinal.
///
/// Deserializes from either the ordinal or the TDEE multiplier (`1.55`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    LightlyActive,
    /// Exercise 3-5 days/week
    ModeratelyActive,
    /// Exercise 6-7 days/week
    VeryActive,
    /// Hard exercise daily or a physical job
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// TDEE multiplier applied to BMR.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            ActivityLevel::Sedentary => 1,
            ActivityLevel::LightlyActive => 2,
            ActivityLevel::ModeratelyActive => 3,
            ActivityLevel::VeryActive => 4,
            ActivityLevel::ExtraActive => 5,
        }
    }

    pub fn from_ordinal(level: u8) -> Option<Self> {
        Self::ALL.get(usize::from(level).checked_sub(1)?).copied()
    }

    /// Match a multiplier such as `1.55` back to its level.
    pub fn from_multiplier(multiplier: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.multiplier() - multiplier).abs() < 1e-9)
    }
}

struct ActivityLevelVisitor;

impl Visitor<'_> for ActivityLevelVisitor {
    type Value = ActivityLevel;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an activity level 1..=5 or a multiplier such as 1.55")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u8::try_from(v)
            .ok()
            .and_then(ActivityLevel::from_ordinal)
            .ok_or_else(|| E::custom(format!("activity level {v} is not in 1..=5")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::custom(format!("activity level {v} is not in 1..=5"))),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && (1.0..=5.0).contains(&v) {
            return self.visit_u64(v as u64);
        }
        ActivityLevel::from_multiplier(v)
            .ok_or_else(|| E::custom(format!("{v} is not an activity multiplier")))
    }
}

impl<'de> Deserialize<'de> for ActivityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ActivityLevelVisitor)
    }
}

impl From<ActivityLevel> for u8 {
    fn from(level: ActivityLevel) -> Self {
        level.ordinal()
    }
}

/// User record stored in the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier (also the document ID)
    pub id: String,
    /// Normalized (trimmed, lower-case) email, unique
    pub email: String,
    pub name: String,
    /// bcrypt hash; absent for accounts without a password
    #[serde(default)]
    pub password_hash: Option<String>,
    /// Weight in kg
    #[serde(default)]
    pub weight: Option<f64>,
    /// Height in cm
    #[serde(default)]
    pub height: Option<f64>,
    /// Age in years
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    pub created_at: String,
    pub updated_at: String,
}

/// Public identity returned from sign-up and sign-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Profile as exposed to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub activity_level: Option<ActivityLevel>,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: Some(user.name.clone()),
            email: user.email.clone(),
            weight: user.weight,
            height: user.height,
            age: user.age,
            gender: user.gender,
            activity_level: user.activity_level,
        }
    }
}

/// Trim and lower-case an email for lookup and uniqueness.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
