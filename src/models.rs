// Wire types exchanged with the Fit4Ever API. Field names follow the
// backend's camelCase JSON; dates are plain `YYYY-MM-DD` strings on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClientError, Result};

/// Login request payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload. Same as login plus a display name.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response of both auth endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub token: String,
}

/// Profile returned by `GET /users/me`. Older servers only send the email,
/// so `id` and `name` are optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Authenticated user context.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets_count: u32,
    pub reps_per_set: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets_count: u32, reps_per_set: u32) -> Self {
        Exercise {
            name: name.into(),
            sets_count,
            reps_per_set,
            weight: None,
            min_reps: None,
            max_reps: None,
            min_weight: None,
            max_weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} sets x {} reps", self.name, self.sets_count, self.reps_per_set)?;
        if let Some(w) = self.weight.filter(|w| *w > 0.0) {
            write!(f, " @ {}kg", w)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Payload for creating or updating a workout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDraft {
    /// Checks run before the draft is sent anywhere.
    pub fn validate(&self) -> Result<()> {
        if self.exercises.is_empty() {
            return Err(ClientError::validation("Please add at least one exercise"));
        }
        if self.title.trim().is_empty() {
            return Err(ClientError::validation("Workout title is required"));
        }
        if let Some(e) = self.exercises.iter().find(|e| e.name.trim().is_empty()) {
            return Err(ClientError::validation(format!(
                "Exercise with {} sets has no name",
                e.sets_count
            )));
        }
        if self.exercises.iter().any(|e| e.sets_count == 0 || e.reps_per_set == 0) {
            return Err(ClientError::validation("Sets and reps must be at least 1"));
        }
        Ok(())
    }
}

impl From<&Workout> for WorkoutDraft {
    fn from(w: &Workout) -> Self {
        WorkoutDraft {
            title: w.title.clone(),
            date: w.date,
            notes: w.notes.clone(),
            exercises: w.exercises.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLog {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub item_name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Payload for `POST /nutrition/logs`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEntry {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub item_name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Upper bounds the server accepts for one food log.
pub const MAX_CALORIES: u32 = 10_000;
pub const MAX_MACRO_GRAMS: f64 = 1_000.0;

impl NutritionEntry {
    pub fn validate(&self) -> Result<()> {
        let len = self.item_name.trim().chars().count();
        if !(2..=100).contains(&len) {
            return Err(ClientError::validation(
                "Item name must be between 2 and 100 characters",
            ));
        }
        if [self.protein, self.carbs, self.fat]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ClientError::validation("Macros must be zero or positive"));
        }
        if self.calories > MAX_CALORIES {
            return Err(ClientError::validation(format!(
                "Calories must be at most {}",
                MAX_CALORIES
            )));
        }
        if [self.protein, self.carbs, self.fat]
            .iter()
            .any(|v| *v > MAX_MACRO_GRAMS)
        {
            return Err(ClientError::validation(format!(
                "Macros must be at most {}g each",
                MAX_MACRO_GRAMS
            )));
        }
        Ok(())
    }
}

/// Client-side aggregate of the logs of one date.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub total_calories: u32,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

impl NutritionTotals {
    /// Sums the logs dated `date`. Logs for other dates are ignored.
    pub fn for_date(logs: &[NutritionLog], date: NaiveDate) -> Self {
        logs.iter()
            .filter(|log| log.date == date)
            .fold(NutritionTotals::default(), |mut totals, log| {
                totals.total_calories += log.calories;
                totals.total_protein += log.protein;
                totals.total_carbs += log.carbs;
                totals.total_fat += log.fat;
                totals
            })
    }
}

/// Server-side summary over a date range (`GET /nutrition/summary`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: DayTotals,
    #[serde(default)]
    pub by_day: Vec<DayTotals>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayTotals {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Goal category. Unknown values from newer servers are kept as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum GoalType {
    Weight,
    WorkoutsPerWeek,
    Calories,
    Other(String),
}

impl GoalType {
    pub const KNOWN: [GoalType; 3] = [GoalType::Weight, GoalType::WorkoutsPerWeek, GoalType::Calories];

    pub fn as_str(&self) -> &str {
        match self {
            GoalType::Weight => "WEIGHT",
            GoalType::WorkoutsPerWeek => "WORKOUTS_PER_WEEK",
            GoalType::Calories => "CALORIES",
            GoalType::Other(s) => s,
        }
    }
}

impl From<String> for GoalType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "WEIGHT" => GoalType::Weight,
            "WORKOUTS_PER_WEEK" => GoalType::WorkoutsPerWeek,
            "CALORIES" => GoalType::Calories,
            _ => GoalType::Other(s),
        }
    }
}

impl From<GoalType> for String {
    fn from(t: GoalType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().replace('_', " "))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
    Other(String),
}

impl GoalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GoalStatus::Active => "ACTIVE",
            GoalStatus::Completed => "COMPLETED",
            GoalStatus::Cancelled => "CANCELLED",
            GoalStatus::Other(s) => s,
        }
    }
}

impl From<String> for GoalStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACTIVE" => GoalStatus::Active,
            "COMPLETED" => GoalStatus::Completed,
            "CANCELLED" => GoalStatus::Cancelled,
            _ => GoalStatus::Other(s),
        }
    }
}

impl From<GoalStatus> for String {
    fn from(s: GoalStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: GoalStatus,
}

impl Goal {
    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

/// Payload for `POST /goals`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl GoalDraft {
    pub fn validate(&self) -> Result<()> {
        if !self.target_value.is_finite() || self.target_value < 0.0 {
            return Err(ClientError::validation("Target value must be zero or positive"));
        }
        if self.end_date < self.start_date {
            return Err(ClientError::validation("End date must not be before start date"));
        }
        Ok(())
    }
}

/// Partial update for `PUT /goals/{id}`; unset fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<GoalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
}

impl GoalUpdate {
    pub fn status(status: GoalStatus) -> Self {
        GoalUpdate {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Response of `GET /goals/{id}/progress`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressResponse {
    pub id: i64,
    #[serde(default)]
    pub progress: Option<f64>,
}

/// Fraction of a goal reached, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ProgressRatio(f64);

impl ProgressRatio {
    /// Clamps into `[0, 1]`; NaN is rejected.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        Some(ProgressRatio(value.clamp(0.0, 1.0)))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl fmt::Display for ProgressRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn log(id: i64, day: &str, calories: u32, protein: f64, carbs: f64, fat: f64) -> NutritionLog {
        NutritionLog {
            id,
            date: date(day),
            meal_type: MealType::Lunch,
            item_name: format!("item {}", id),
            calories,
            protein,
            carbs,
            fat,
        }
    }

    #[test]
    fn totals_sum_every_macro_for_the_date() {
        let logs = vec![
            log(1, "2026-10-19", 500, 30.0, 50.0, 10.0),
            log(2, "2026-10-19", 300, 20.5, 10.0, 5.5),
        ];
        let totals = NutritionTotals::for_date(&logs, date("2026-10-19"));
        assert_eq!(totals.total_calories, 800);
        assert_eq!(totals.total_protein, 50.5);
        assert_eq!(totals.total_carbs, 60.0);
        assert_eq!(totals.total_fat, 15.5);
    }

    #[test]
    fn totals_ignore_logs_from_other_dates() {
        let logs = vec![
            log(1, "2026-10-19", 500, 1.0, 1.0, 1.0),
            log(2, "2026-10-18", 900, 9.0, 9.0, 9.0),
        ];
        let totals = NutritionTotals::for_date(&logs, date("2026-10-19"));
        assert_eq!(totals.total_calories, 500);
        assert_eq!(totals.total_fat, 1.0);
    }

    #[test]
    fn totals_of_no_logs_are_zero() {
        let totals = NutritionTotals::for_date(&[], date("2026-10-19"));
        assert_eq!(totals, NutritionTotals::default());
    }

    #[test]
    fn workout_draft_without_exercises_is_rejected() {
        let draft = WorkoutDraft {
            title: "Leg day".into(),
            date: date("2026-10-19"),
            notes: None,
            exercises: vec![],
        };
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn workout_draft_with_blank_title_is_rejected() {
        let draft = WorkoutDraft {
            title: "   ".into(),
            date: date("2026-10-19"),
            notes: None,
            exercises: vec![Exercise::new("Squat", 3, 5)],
        };
        match draft.validate().unwrap_err() {
            ClientError::Validation(msg) => assert_eq!(msg, "Workout title is required"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    fn entry(calories: u32, protein: f64) -> NutritionEntry {
        NutritionEntry {
            date: date("2026-10-19"),
            meal_type: MealType::Dinner,
            item_name: "Steak".into(),
            calories,
            protein,
            carbs: 0.0,
            fat: 20.0,
        }
    }

    #[test]
    fn nutrition_entry_limits() {
        assert!(entry(MAX_CALORIES, MAX_MACRO_GRAMS).validate().is_ok());
        assert!(entry(MAX_CALORIES + 1, 50.0).validate().is_err());
        assert!(entry(600, 1000.5).validate().is_err());
        assert!(entry(600, -1.0).validate().is_err());
        assert!(entry(600, f64::INFINITY).validate().is_err());
    }

    fn goal_draft(target: f64, start: &str, end: &str) -> GoalDraft {
        GoalDraft {
            goal_type: GoalType::Weight,
            target_value: target,
            start_date: date(start),
            end_date: date(end),
        }
    }

    #[test]
    fn goal_draft_validation() {
        assert!(goal_draft(75.0, "2026-10-01", "2026-12-01").validate().is_ok());
        assert!(goal_draft(0.0, "2026-10-01", "2026-10-01").validate().is_ok());
        assert!(goal_draft(-1.0, "2026-10-01", "2026-12-01").validate().is_err());
        assert!(goal_draft(f64::NAN, "2026-10-01", "2026-12-01").validate().is_err());
        assert!(goal_draft(f64::INFINITY, "2026-10-01", "2026-12-01").validate().is_err());

        let err = goal_draft(75.0, "2026-12-01", "2026-10-01").validate().unwrap_err();
        match err {
            ClientError::Validation(msg) => assert_eq!(msg, "End date must not be before start date"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn workout_deserializes_from_backend_json() {
        let w: Workout = serde_json::from_value(json!({
            "id": 7,
            "title": "Push",
            "date": "2026-10-12",
            "notes": null,
            "exercises": [
                {"id": 1, "name": "Bench", "setsCount": 3, "repsPerSet": 8, "weight": 60.0}
            ]
        }))
        .unwrap();
        assert_eq!(w.exercises[0].weight, Some(60.0));
        assert_eq!(w.exercises[0].to_string(), "Bench: 3 sets x 8 reps @ 60kg");
    }

    #[test]
    fn goal_keeps_unknown_status_values() {
        let g: Goal = serde_json::from_value(json!({
            "id": 1,
            "type": "STEPS",
            "targetValue": 10000.0,
            "startDate": "2026-10-01",
            "endDate": "2026-10-31",
            "status": "PAUSED"
        }))
        .unwrap();
        assert_eq!(g.goal_type, GoalType::Other("STEPS".into()));
        assert_eq!(g.status, GoalStatus::Other("PAUSED".into()));
        assert!(!g.is_active());
        assert_eq!(serde_json::to_value(&g).unwrap()["status"], "PAUSED");
    }

    #[test]
    fn goal_update_only_sends_set_fields() {
        let body = serde_json::to_value(GoalUpdate::status(GoalStatus::Completed)).unwrap();
        assert_eq!(body, json!({"status": "COMPLETED"}));
    }

    #[test]
    fn progress_ratio_is_clamped() {
        assert_eq!(ProgressRatio::new(1.4).unwrap().value(), 1.0);
        assert_eq!(ProgressRatio::new(-0.2).unwrap().value(), 0.0);
        assert_eq!(ProgressRatio::new(0.456).unwrap().to_string(), "46%");
        assert!(ProgressRatio::new(f64::NAN).is_none());
    }

    #[test]
    fn user_profile_may_only_carry_email() {
        let u: User = serde_json::from_value(json!({"email": "a@b.c"})).unwrap();
        assert_eq!(u.display_name(), "a@b.c");
    }
}
