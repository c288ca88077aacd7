// Presentation seam. The controller never touches the terminal directly; it
// hands finished view models and notifications to a `Presenter`.

use std::time::Duration;

use chrono::NaiveDate;

use crate::models::{Goal, NutritionLog, NutritionTotals, ProgressRatio, User, Workout, WorkoutDraft};
use crate::router::Section;
use crate::workouts::EditMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
}

/// Transient message shown to the user, dismissed after `dismiss_after`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub dismiss_after: Duration,
}

/// A goal with its progress; `None` means "not yet computed".
#[derive(Debug, Clone, PartialEq)]
pub struct GoalView {
    pub goal: Goal,
    pub progress: Option<ProgressRatio>,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        GoalView { goal, progress: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_workouts: usize,
    pub today_calories: u32,
    pub active_goals: usize,
    pub week_streak: usize,
    pub recent_workouts: Vec<Workout>,
    pub goal_previews: Vec<GoalView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionView {
    pub date: NaiveDate,
    pub totals: NutritionTotals,
    pub logs: Vec<NutritionLog>,
}

/// Everything one section needs to draw itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionView {
    Dashboard(DashboardView),
    Workouts(Vec<Workout>),
    Nutrition(NutritionView),
    Goals(Vec<GoalView>),
}

impl SectionView {
    pub fn section(&self) -> Section {
        match self {
            SectionView::Dashboard(_) => Section::Dashboard,
            SectionView::Workouts(_) => Section::Workouts,
            SectionView::Nutrition(_) => Section::Nutrition,
            SectionView::Goals(_) => Section::Goals,
        }
    }
}

/// Output side of the client. Implemented by the terminal UI and by test
/// doubles.
pub trait Presenter {
    /// Show the login/register screen, with an inline error if any.
    fn show_auth(&mut self, error: Option<&str>);

    /// Show the main application for `user`.
    fn show_main(&mut self, user: &User);

    fn render(&mut self, view: &SectionView);

    fn notify(&mut self, notification: Notification);

    fn set_loading(&mut self, loading: bool);

    /// Open the workout form, pre-filled when editing.
    fn show_workout_form(&mut self, mode: EditMode, draft: Option<&WorkoutDraft>);
}
