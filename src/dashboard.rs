// Dashboard aggregation: three independent fetches joined into one view.

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::api::ApiClient;
use crate::goals::GoalManager;
use crate::models::{Goal, Workout};
use crate::nutrition::NutritionManager;
use crate::view::{DashboardView, GoalView};
use crate::workouts::WorkoutManager;

const PREVIEW_LEN: usize = 3;
const STREAK_WINDOW_DAYS: i64 = 7;

#[derive(Clone, Debug)]
pub struct DashboardAggregator {
    workouts: WorkoutManager,
    nutrition: NutritionManager,
    goals: GoalManager,
}

impl DashboardAggregator {
    pub fn new(api: ApiClient) -> Self {
        DashboardAggregator {
            workouts: WorkoutManager::new(api.clone()),
            nutrition: NutritionManager::new(api.clone()),
            goals: GoalManager::new(api),
        }
    }

    /// Fetch workouts, today's nutrition and goals concurrently. A failing
    /// fetch degrades to an empty list or zero totals without affecting the
    /// other two.
    pub async fn load(&self, today: NaiveDate) -> DashboardView {
        let (workouts, totals, goals) = tokio::join!(
            self.workouts.list(),
            self.nutrition.totals_for_date(today),
            self.goals.list(),
        );

        let workouts = workouts.unwrap_or_else(|e| {
            warn!(error = %e, "dashboard: workouts unavailable");
            Vec::new()
        });
        let goals = goals.unwrap_or_else(|e| {
            warn!(error = %e, "dashboard: goals unavailable");
            Vec::new()
        });

        DashboardView {
            total_workouts: workouts.len(),
            today_calories: totals.total_calories,
            active_goals: active_goals(&goals),
            week_streak: week_streak(&workouts, today),
            recent_workouts: workouts.into_iter().take(PREVIEW_LEN).collect(),
            goal_previews: goals.into_iter().take(PREVIEW_LEN).map(GoalView::from).collect(),
        }
    }
}

/// Workouts dated on or after `today - 7 days`.
pub fn week_streak(workouts: &[Workout], today: NaiveDate) -> usize {
    let since = today - Duration::days(STREAK_WINDOW_DAYS);
    workouts.iter().filter(|w| w.date >= since).count()
}

pub fn active_goals(goals: &[Goal]) -> usize {
    goals.iter().filter(|g| g.is_active()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalStatus, GoalType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn workout_days_ago(id: i64, days: i64) -> Workout {
        Workout {
            id,
            title: format!("w{}", id),
            date: today() - Duration::days(days),
            notes: None,
            exercises: vec![],
        }
    }

    fn goal(id: i64, status: GoalStatus) -> Goal {
        Goal {
            id,
            goal_type: GoalType::Weight,
            target_value: 75.0,
            start_date: today(),
            end_date: today() + Duration::days(30),
            status,
        }
    }

    #[test]
    fn streak_counts_the_trailing_week() {
        let workouts = vec![
            workout_days_ago(1, 0),
            workout_days_ago(2, 6),
            workout_days_ago(3, 8),
        ];
        assert_eq!(week_streak(&workouts, today()), 2);
    }

    #[test]
    fn streak_boundary_is_inclusive() {
        let workouts = vec![workout_days_ago(1, 7)];
        assert_eq!(week_streak(&workouts, today()), 1);
    }

    #[test]
    fn streak_of_nothing_is_zero() {
        assert_eq!(week_streak(&[], today()), 0);
    }

    #[test]
    fn only_active_goals_are_counted() {
        let goals = vec![
            goal(1, GoalStatus::Active),
            goal(2, GoalStatus::Completed),
            goal(3, GoalStatus::Active),
            goal(4, GoalStatus::Cancelled),
        ];
        assert_eq!(active_goals(&goals), 2);
    }
}
