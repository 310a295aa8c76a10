// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile updates and profile-derived targets.

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{ActivityLevel, Gender, ProfileView, User};
use crate::services::nutrition::{self, Bmi, DailyTargets, Height, Weight};
use crate::time_utils::now_rfc3339;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile update body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    /// kg
    #[validate(range(exclusive_min = 0.0, max = 700.0, message = "Weight must be positive"))]
    pub weight: Option<f64>,
    /// cm
    #[validate(range(exclusive_min = 0.0, max = 300.0, message = "Height must be positive"))]
    pub height: Option<f64>,
    #[validate(range(min = 1, max = 150, message = "Age must be positive"))]
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    #[validate(range(min = 1, max = 5, message = "Activity level must be between 1 and 5"))]
    pub activity_level: Option<u8>,
}

impl ProfileUpdate {
    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if self.weight.is_some() {
            user.weight = self.weight;
        }
        if self.height.is_some() {
            user.height = self.height;
        }
        if self.age.is_some() {
            user.age = self.age;
        }
        if self.gender.is_some() {
            user.gender = self.gender;
        }
        if let Some(level) = self.activity_level.and_then(ActivityLevel::from_ordinal) {
            user.activity_level = Some(level);
        }
    }
}

/// Apply a validated update to the stored user and return the new profile.
pub async fn update_profile(
    store: &UserStore,
    user_id: &str,
    mut update: ProfileUpdate,
) -> Result<ProfileView, AppError> {
    update.name = update.name.map(|n| n.trim().to_string());
    update.validate().map_err(|e| {
        AppError::Validation(
            e.field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_else(|| "Invalid profile update".to_string()),
        )
    })?;

    let mut user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    update.apply(&mut user);
    user.updated_at = now_rfc3339();
    store.update_user(&user).await?;

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(ProfileView::from(&user))
}

/// BMI and energy targets derived from a stored profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTargets {
    pub bmi: Bmi,
    pub daily: DailyTargets,
}

/// Compute targets from the metric profile fields.
pub fn profile_targets(user: &User) -> Result<ProfileTargets, AppError> {
    let missing: Vec<&str> = [
        ("weight", user.weight.is_none()),
        ("height", user.height.is_none()),
        ("age", user.age.is_none()),
        ("gender", user.gender.is_none()),
        ("activityLevel", user.activity_level.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(weight), Some(height), Some(age), Some(gender), Some(activity)) = (
        user.weight,
        user.height,
        user.age,
        user.gender,
        user.activity_level,
    ) else {
        return Err(AppError::Validation(format!(
            "Profile is incomplete: missing {}",
            missing.join(", ")
        )));
    };

    let weight = Weight::Kg(weight);
    let height = Height::Cm(height);
    Ok(ProfileTargets {
        bmi: nutrition::bmi(height, weight),
        daily: nutrition::daily_targets(weight, height, f64::from(age), gender, activity)?,
    })
}
