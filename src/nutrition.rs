// Nutrition logs and the per-day totals derived from them.

use chrono::NaiveDate;
use tracing::warn;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{NutritionEntry, NutritionLog, NutritionSummary, NutritionTotals};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug)]
pub struct NutritionManager {
    api: ApiClient,
}

impl NutritionManager {
    pub fn new(api: ApiClient) -> Self {
        NutritionManager { api }
    }

    pub async fn logs_for_date(&self, date: NaiveDate) -> Result<Vec<NutritionLog>> {
        let date = date.format(DATE_FORMAT).to_string();
        self.api
            .get_with_query("/nutrition/logs", &[("date", date.as_str())])
            .await
    }

    pub async fn add_log(&self, entry: &NutritionEntry) -> Result<NutritionLog> {
        entry.validate()?;
        self.api.post("/nutrition/logs", entry).await
    }

    pub async fn delete_log(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("/nutrition/logs/{}", id)).await
    }

    /// Totals for `date`, recomputed from the full log list every time.
    /// A failed fetch yields zeroed totals instead of an error.
    pub async fn totals_for_date(&self, date: NaiveDate) -> NutritionTotals {
        match self.logs_for_date(date).await {
            Ok(logs) => NutritionTotals::for_date(&logs, date),
            Err(e) => {
                warn!(%date, error = %e, "nutrition logs unavailable, using zero totals");
                NutritionTotals::default()
            }
        }
    }

    /// Server-side totals over `[from, to]`, broken down by day.
    pub async fn summary(&self, from: NaiveDate, to: NaiveDate) -> Result<NutritionSummary> {
        let from = from.format(DATE_FORMAT).to_string();
        let to = to.format(DATE_FORMAT).to_string();
        self.api
            .get_with_query(
                "/nutrition/summary",
                &[("from", from.as_str()), ("to", to.as_str())],
            )
            .await
    }
}
