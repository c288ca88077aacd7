// Goal CRUD and the server-computed progress of each goal.

use tracing::debug;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Goal, GoalDraft, GoalProgressResponse, GoalStatus, GoalUpdate, ProgressRatio};

#[derive(Clone, Debug)]
pub struct GoalManager {
    api: ApiClient,
}

impl GoalManager {
    pub fn new(api: ApiClient) -> Self {
        GoalManager { api }
    }

    pub async fn list(&self) -> Result<Vec<Goal>> {
        self.api.get("/goals").await
    }

    pub async fn create(&self, draft: &GoalDraft) -> Result<Goal> {
        draft.validate()?;
        self.api.post("/goals", draft).await
    }

    pub async fn update(&self, id: i64, update: &GoalUpdate) -> Result<Goal> {
        self.api.put(&format!("/goals/{}", id), update).await
    }

    pub async fn set_status(&self, id: i64, status: GoalStatus) -> Result<Goal> {
        self.update(id, &GoalUpdate::status(status)).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("/goals/{}", id)).await
    }

    /// Progress reported by the server, or `None` when it has not been
    /// computed (endpoint missing, failing, or returning no value).
    pub async fn progress(&self, id: i64) -> Option<ProgressRatio> {
        match self
            .api
            .get::<GoalProgressResponse>(&format!("/goals/{}/progress", id))
            .await
        {
            Ok(resp) => resp.progress.and_then(ProgressRatio::new),
            Err(e) => {
                debug!(id, error = %e, "goal progress not available");
                None
            }
        }
    }
}
