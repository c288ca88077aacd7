// Workout CRUD plus the create/edit state used by the workout form.

use reqwest::StatusCode;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{Workout, WorkoutDraft};

#[derive(Clone, Debug)]
pub struct WorkoutManager {
    api: ApiClient,
}

impl WorkoutManager {
    pub fn new(api: ApiClient) -> Self {
        WorkoutManager { api }
    }

    pub async fn list(&self) -> Result<Vec<Workout>> {
        self.api.get("/workouts").await
    }

    pub async fn get(&self, id: i64) -> Result<Workout> {
        match self.api.get(&format!("/workouts/{}", id)).await {
            Err(ClientError::Http { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(ClientError::NotFound(format!("workout {}", id)))
            }
            other => other,
        }
    }

    /// Validates before sending; an invalid draft never reaches the API.
    pub async fn create(&self, draft: &WorkoutDraft) -> Result<Workout> {
        draft.validate()?;
        self.api.post("/workouts", draft).await
    }

    pub async fn update(&self, id: i64, draft: &WorkoutDraft) -> Result<Workout> {
        draft.validate()?;
        self.api.put(&format!("/workouts/{}", id), draft).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("/workouts/{}", id)).await
    }
}

/// Whether the workout form creates a new workout or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Creating,
    Editing(i64),
}

/// Holds the edit mode of the workout form between user actions.
#[derive(Debug, Default)]
pub struct WorkoutEditor {
    mode: EditMode,
}

impl WorkoutEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn editing_id(&self) -> Option<i64> {
        match self.mode {
            EditMode::Editing(id) => Some(id),
            EditMode::Creating => None,
        }
    }

    /// Reset to "new workout".
    pub fn begin_create(&mut self) {
        self.mode = EditMode::Creating;
    }

    /// Switch to editing `workout` and return the draft to pre-fill the form.
    pub fn begin_edit(&mut self, workout: &Workout) -> WorkoutDraft {
        self.mode = EditMode::Editing(workout.id);
        WorkoutDraft::from(workout)
    }

    /// Create or update depending on the mode. The mode goes back to
    /// `Creating` only when the API call succeeded.
    pub async fn submit(&mut self, manager: &WorkoutManager, draft: &WorkoutDraft) -> Result<Workout> {
        draft.validate()?;
        let saved = match self.mode {
            EditMode::Editing(id) => {
                debug!(id, "updating workout");
                manager.update(id, draft).await?
            }
            EditMode::Creating => {
                debug!("creating workout");
                manager.create(draft).await?
            }
        };
        self.mode = EditMode::Creating;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Exercise;
    use chrono::NaiveDate;

    fn workout(id: i64) -> Workout {
        Workout {
            id,
            title: "Pull".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            notes: Some("felt strong".into()),
            exercises: vec![Exercise::new("Row", 4, 10).with_weight(50.0)],
        }
    }

    #[test]
    fn begin_edit_populates_form_and_sets_mode() {
        let mut editor = WorkoutEditor::new();
        let draft = editor.begin_edit(&workout(12));
        assert_eq!(editor.mode(), EditMode::Editing(12));
        assert_eq!(draft.title, "Pull");
        assert_eq!(draft.notes.as_deref(), Some("felt strong"));
        assert_eq!(draft.exercises.len(), 1);
    }

    #[test]
    fn begin_create_leaves_edit_mode() {
        let mut editor = WorkoutEditor::new();
        editor.begin_edit(&workout(3));
        editor.begin_create();
        assert_eq!(editor.editing_id(), None);
    }
}
