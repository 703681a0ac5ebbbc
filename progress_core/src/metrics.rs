//! Energy-balance metrics computed from a profile and the record history.
//!
//! Everything here is a pure function of its arguments: the profile and
//! the records are passed in on every call and nothing is cached.

use crate::{ActivityLevel, DailyRecord, PersonalProfile, Sex};
use chrono::NaiveDate;
use serde::Serialize;

/// Energy content of one kilogram of body fat, in kcal
pub const KCAL_PER_KG_FAT: f64 = 7700.0;

/// Meal slots (out of breakfast, snack, lunch, dinner) needed for a full-meal day
pub const FULL_MEAL_THRESHOLD: usize = 4;

/// Basal metabolic rate via the Mifflin-St Jeor equation, in kcal/day
pub fn compute_bmr(profile: &PersonalProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// BMR scaled by the activity factor, rounded half-to-even
pub fn compute_maintenance_calories(bmr: f64, activity_level: ActivityLevel) -> i64 {
    (bmr * activity_level.factor()).round_ties_even() as i64
}

/// Maintenance minus consumed; negative means a surplus
pub fn compute_deficit(maintenance_calories: i64, calories_consumed: f64) -> f64 {
    maintenance_calories as f64 - calories_consumed
}

pub fn goal_met(deficit: f64, deficit_goal: f64) -> bool {
    deficit >= deficit_goal
}

/// Mean deficit over all records
///
/// Yields NaN for an empty slice; callers check `is_empty` first.
pub fn average_deficit(maintenance_calories: i64, records: &[DailyRecord]) -> f64 {
    let total: f64 = records
        .iter()
        .map(|r| compute_deficit(maintenance_calories, r.calories))
        .sum();
    total / records.len() as f64
}

/// Expected fat loss per week at the given average daily deficit
///
/// A surplus (or an undefined average) projects no loss.
pub fn projected_weekly_loss_kg(avg_deficit: f64) -> f64 {
    if avg_deficit > 0.0 {
        avg_deficit * 7.0 / KCAL_PER_KG_FAT
    } else {
        0.0
    }
}

pub fn full_meal_day_count(records: &[DailyRecord]) -> usize {
    records
        .iter()
        .filter(|r| r.meals_eaten() >= FULL_MEAL_THRESHOLD)
        .count()
}

pub fn exercise_day_count(records: &[DailyRecord]) -> usize {
    records.iter().filter(|r| r.exercise).count()
}

pub fn water_goal_day_count(records: &[DailyRecord]) -> usize {
    records.iter().filter(|r| r.water).count()
}

/// Trailing mean of calories over the last `window` records, per record
///
/// Early records average over however many records exist so far.
pub fn rolling_average_calories(records: &[DailyRecord], window: usize) -> Vec<(NaiveDate, f64)> {
    if window == 0 {
        return Vec::new();
    }

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let start = (i + 1).saturating_sub(window);
            let slice = &records[start..=i];
            let mean = slice.iter().map(|r| r.calories).sum::<f64>() / slice.len() as f64;
            (record.date, mean)
        })
        .collect()
}

// ============================================================================
// Dashboard Summary
// ============================================================================

/// Today's intake measured against the deficit goal
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TodayDeficit {
    pub calories_consumed: f64,
    pub deficit: f64,
    pub deficit_goal: f64,
    pub goal_met: bool,
    /// How far below the goal the deficit is; 0 when the goal is met
    pub shortfall: f64,
}

/// Aggregates over the whole record history
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HistoryStats {
    pub total_days: usize,
    pub average_deficit: f64,
    pub projected_weekly_loss_kg: f64,
    pub full_meal_days: usize,
    pub water_days: usize,
    pub exercise_days: usize,
}

/// Everything the dashboard displays, computed in one pass
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub bmr: f64,
    pub activity_level: ActivityLevel,
    pub activity_factor: f64,
    pub maintenance_calories: i64,
    pub today: TodayDeficit,
    /// Absent when there are no records
    pub history: Option<HistoryStats>,
}

/// Compute the dashboard values for a profile and record history
pub fn summarize(
    profile: &PersonalProfile,
    records: &[DailyRecord],
    today_calories: f64,
    deficit_goal: f64,
) -> ProgressSummary {
    let bmr = compute_bmr(profile);
    let maintenance_calories = compute_maintenance_calories(bmr, profile.activity_level);

    let deficit = compute_deficit(maintenance_calories, today_calories);
    let met = goal_met(deficit, deficit_goal);
    let today = TodayDeficit {
        calories_consumed: today_calories,
        deficit,
        deficit_goal,
        goal_met: met,
        shortfall: if met { 0.0 } else { deficit_goal - deficit },
    };

    let history = (!records.is_empty()).then(|| {
        let avg = average_deficit(maintenance_calories, records);
        HistoryStats {
            total_days: records.len(),
            average_deficit: avg,
            projected_weekly_loss_kg: projected_weekly_loss_kg(avg),
            full_meal_days: full_meal_day_count(records),
            water_days: water_goal_day_count(records),
            exercise_days: exercise_day_count(records),
        }
    });

    tracing::debug!(
        "Summarized {} records: BMR {:.2}, maintenance {}",
        records.len(),
        bmr,
        maintenance_calories
    );

    ProgressSummary {
        bmr,
        activity_level: profile.activity_level,
        activity_factor: profile.activity_level.factor(),
        maintenance_calories,
        today,
        history,
    }
}
