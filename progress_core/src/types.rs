//! Core domain types for the progress tracker.
//!
//! This module defines:
//! - Daily habit/intake records (the persisted unit)
//! - The personal profile used for energy-balance calculations
//! - Input range validation

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Input Ranges
// ============================================================================

/// Inclusive range accepted for a numeric input
#[derive(Clone, Copy, Debug)]
pub struct InputRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl InputRange {
    /// Check that `value` lies within the range
    pub fn check(&self, value: f64) -> Result<()> {
        if value.is_finite() && value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "{} must be between {} and {}, got {}",
                self.name, self.min, self.max, value
            )))
        }
    }
}

pub const AGE_RANGE: InputRange = InputRange { name: "age", min: 10.0, max: 100.0 };
pub const HEIGHT_RANGE: InputRange = InputRange { name: "height (cm)", min: 100.0, max: 250.0 };
pub const BODY_WEIGHT_RANGE: InputRange = InputRange { name: "current weight (kg)", min: 30.0, max: 300.0 };
pub const DEFICIT_GOAL_RANGE: InputRange = InputRange { name: "deficit goal (kcal)", min: 0.0, max: 2000.0 };
pub const CALORIES_RANGE: InputRange = InputRange { name: "calories", min: 0.0, max: 6000.0 };
pub const PROTEIN_RANGE: InputRange = InputRange { name: "protein (g)", min: 0.0, max: 300.0 };
pub const LOGGED_WEIGHT_RANGE: InputRange = InputRange { name: "weight (kg)", min: 0.0, max: 300.0 };

// ============================================================================
// Daily Records
// ============================================================================

/// One day of tracked habits and intake, keyed by date
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub breakfast: bool,
    pub snack: bool,
    pub lunch: bool,
    pub dinner: bool,
    pub shake: bool,
    pub water: bool,
    pub exercise: bool,
    pub calories: f64,
    pub protein: f64,
    /// Body weight in kg; 0 when not measured that day
    pub weight: f64,
}

impl DailyRecord {
    /// An empty record for `date` (no habits ticked, nothing eaten)
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            breakfast: false,
            snack: false,
            lunch: false,
            dinner: false,
            shake: false,
            water: false,
            exercise: false,
            calories: 0.0,
            protein: 0.0,
            weight: 0.0,
        }
    }

    /// Number of the four main meal slots that were eaten
    pub fn meals_eaten(&self) -> usize {
        [self.breakfast, self.snack, self.lunch, self.dinner]
            .iter()
            .filter(|&&m| m)
            .count()
    }

    /// Weight if it was measured that day
    pub fn weight_measured(&self) -> Option<f64> {
        (self.weight > 0.0).then_some(self.weight)
    }

    /// Check the numeric fields against the accepted input ranges
    pub fn validate(&self) -> Result<()> {
        CALORIES_RANGE.check(self.calories)?;
        PROTEIN_RANGE.check(self.protein)?;
        LOGGED_WEIGHT_RANGE.check(self.weight)?;
        Ok(())
    }
}

// ============================================================================
// Personal Profile
// ============================================================================

/// Biological sex, as used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(Error::Config(format!(
                "Unknown sex '{}', expected male or female",
                other
            ))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

/// How active the person is outside of tracked exercise
///
/// - Sedentary: little or no exercise
/// - Light: 1-3 days/week light activity
/// - Moderate: 3-5 days/week moderate activity
/// - Active: 5-7 days/week intense activity or a physical job
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
}

impl ActivityLevel {
    /// Multiplier applied to BMR to estimate daily energy expenditure
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.4,
            ActivityLevel::Moderate => 1.6,
            ActivityLevel::Active => 1.8,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            other => Err(Error::Config(format!(
                "Unknown activity level '{}', expected sedentary, light, moderate or active",
                other
            ))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Light => "Light",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::Active => "Active",
        };
        write!(f, "{}", name)
    }
}

/// Personal parameters for a single computation (never persisted by the tracker)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersonalProfile {
    pub age: u32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

impl Default for PersonalProfile {
    fn default() -> Self {
        Self {
            age: 27,
            sex: Sex::Male,
            height_cm: 181.0,
            weight_kg: 96.0,
            activity_level: ActivityLevel::Sedentary,
        }
    }
}

impl PersonalProfile {
    /// Check the profile against the accepted input ranges
    pub fn validate(&self) -> Result<()> {
        AGE_RANGE.check(f64::from(self.age))?;
        HEIGHT_RANGE.check(self.height_cm)?;
        BODY_WEIGHT_RANGE.check(self.weight_kg)?;
        Ok(())
    }
}
