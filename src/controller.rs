// The client controller. Every user action enters here; every failure is
// caught here and turned into a notification, so nothing above this layer
// deals with `ClientError`.

use std::future::Future;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use futures_util::future::join_all;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::dashboard::DashboardAggregator;
use crate::error::{ClientError, Result};
use crate::goals::GoalManager;
use crate::models::{
    GoalDraft, GoalStatus, NutritionEntry, NutritionSummary, NutritionTotals, Session, WorkoutDraft,
};
use crate::nutrition::NutritionManager;
use crate::router::{Router, Section};
use crate::session::{SessionManager, TokenStore};
use crate::view::{GoalView, Notification, NutritionView, Presenter, SectionView, Severity};
use crate::workouts::{EditMode, WorkoutEditor, WorkoutManager};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Owns all client state: the gateway, the session, the active section and
/// the workout form mode.
pub struct Controller<P: Presenter, S: TokenStore> {
    api: ApiClient,
    session: SessionManager<S>,
    router: Router,
    editor: WorkoutEditor,
    presenter: P,
    nutrition_date: NaiveDate,
    notification_ttl: Duration,
}

impl<P: Presenter, S: TokenStore> Controller<P, S> {
    pub fn new(config: &ClientConfig, store: S, presenter: P) -> Result<Self> {
        Ok(Controller {
            api: ApiClient::new(config)?,
            session: SessionManager::new(store),
            router: Router::new(),
            editor: WorkoutEditor::new(),
            presenter,
            nutrition_date: today(),
            notification_ttl: config.notification_ttl,
        })
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    pub fn current_section(&self) -> Option<Section> {
        self.router.current()
    }

    pub fn edit_mode(&self) -> EditMode {
        self.editor.mode()
    }

    pub fn nutrition_date(&self) -> NaiveDate {
        self.nutrition_date
    }

    /// Startup: reuse a persisted token if the server still accepts it.
    /// A rejected token silently leads to the sign-in screen.
    pub async fn start(&mut self) -> bool {
        match self.session.restore_session(&mut self.api).await {
            Some(session) => {
                self.presenter.show_main(&session.user);
                self.show_section(Section::Dashboard).await;
                true
            }
            None => {
                self.router.reset();
                self.presenter.show_auth(None);
                false
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.presenter.set_loading(true);
        let outcome = self.session.login(&mut self.api, email, password).await;
        self.presenter.set_loading(false);
        self.after_auth(outcome).await
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> bool {
        self.presenter.set_loading(true);
        let outcome = self.session.register(&mut self.api, name, email, password).await;
        self.presenter.set_loading(false);
        self.after_auth(outcome).await
    }

    async fn after_auth(&mut self, outcome: Result<Session>) -> bool {
        match outcome {
            Ok(session) => {
                self.presenter.show_main(&session.user);
                self.notify(Severity::Success, "Authentication successful!");
                self.show_section(Section::Dashboard).await;
                true
            }
            Err(e) => {
                warn!(error = %e, "authentication failed");
                self.presenter.show_auth(Some(&e.to_string()));
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.sign_out();
        self.presenter.show_auth(None);
        self.notify(Severity::Success, "Logged out successfully");
    }

    fn sign_out(&mut self) {
        self.session.logout(&mut self.api);
        self.router.reset();
        self.editor.begin_create();
    }

    /// Switch section and start loading it without waiting for the data.
    /// A later `navigate` aborts this load.
    pub fn navigate(&mut self, section: Section) {
        if !self.session.is_authenticated() {
            self.presenter.show_auth(None);
            return;
        }
        let load = self.section_load(section);
        self.router.navigate(section, load);
    }

    /// Wait for the pending section load and render it if it is still
    /// the active section.
    pub async fn settle(&mut self) {
        if !self.router.is_loading() {
            return;
        }
        self.presenter.set_loading(true);
        let outcome = self.router.settle().await;
        self.presenter.set_loading(false);
        match outcome {
            Some(Ok(view)) => self.presenter.render(&view),
            Some(Err(e)) => {
                let action = match self.router.current() {
                    Some(Section::Workouts) => "Failed to load workouts",
                    Some(Section::Nutrition) => "Failed to load nutrition",
                    Some(Section::Goals) => "Failed to load goals",
                    _ => "Failed to load dashboard",
                };
                self.fail(action, e);
            }
            None => {}
        }
    }

    pub async fn show_section(&mut self, section: Section) {
        self.navigate(section);
        self.settle().await;
    }

    /// Reload whatever section is active.
    pub async fn refresh(&mut self) {
        if let Some(section) = self.router.current() {
            self.show_section(section).await;
        }
    }

    fn section_load(&self, section: Section) -> impl Future<Output = Result<SectionView>> + Send + 'static {
        let api = self.api.clone();
        let date = self.nutrition_date;
        async move {
            match section {
                Section::Dashboard => Ok(SectionView::Dashboard(
                    DashboardAggregator::new(api).load(today()).await,
                )),
                Section::Workouts => Ok(SectionView::Workouts(WorkoutManager::new(api).list().await?)),
                Section::Nutrition => {
                    let logs = NutritionManager::new(api).logs_for_date(date).await?;
                    Ok(SectionView::Nutrition(NutritionView {
                        date,
                        totals: NutritionTotals::for_date(&logs, date),
                        logs,
                    }))
                }
                Section::Goals => {
                    let manager = GoalManager::new(api);
                    let goals = manager.list().await?;
                    let progress = join_all(goals.iter().map(|g| manager.progress(g.id))).await;
                    let views = goals
                        .into_iter()
                        .zip(progress)
                        .map(|(goal, progress)| GoalView { goal, progress })
                        .collect();
                    Ok(SectionView::Goals(views))
                }
            }
        }
    }

    fn workouts(&self) -> WorkoutManager {
        WorkoutManager::new(self.api.clone())
    }

    fn nutrition(&self) -> NutritionManager {
        NutritionManager::new(self.api.clone())
    }

    fn goals(&self) -> GoalManager {
        GoalManager::new(self.api.clone())
    }

    /// Open an empty workout form.
    pub fn new_workout(&mut self) {
        self.editor.begin_create();
        self.presenter.show_workout_form(EditMode::Creating, None);
    }

    /// Load workout `id` into the form and enter edit mode.
    pub async fn edit_workout(&mut self, id: i64) -> Option<WorkoutDraft> {
        match self.workouts().get(id).await {
            Ok(workout) => {
                let draft = self.editor.begin_edit(&workout);
                self.presenter.show_workout_form(self.editor.mode(), Some(&draft));
                Some(draft)
            }
            Err(e) => {
                self.fail("Failed to load workout details", e);
                None
            }
        }
    }

    /// Save the workout form: update when editing, create otherwise.
    pub async fn submit_workout(&mut self, draft: &WorkoutDraft) -> bool {
        if let Err(e) = draft.validate() {
            self.fail("Invalid workout", e);
            return false;
        }
        let updating = self.editor.editing_id().is_some();
        self.presenter.set_loading(true);
        let manager = self.workouts();
        let outcome = self.editor.submit(&manager, draft).await;
        self.presenter.set_loading(false);
        match outcome {
            Ok(saved) => {
                info!(id = saved.id, updating, "workout saved");
                let msg = if updating {
                    "Workout updated successfully!"
                } else {
                    "Workout created successfully!"
                };
                self.notify(Severity::Success, msg);
                self.show_section(Section::Workouts).await;
                true
            }
            Err(e) => {
                let action = if updating {
                    "Failed to update workout"
                } else {
                    "Failed to create workout"
                };
                self.fail(action, e);
                false
            }
        }
    }

    pub async fn delete_workout(&mut self, id: i64) -> bool {
        match self.workouts().delete(id).await {
            Ok(()) => {
                if self.editor.editing_id() == Some(id) {
                    self.editor.begin_create();
                }
                self.notify(Severity::Success, "Workout deleted successfully");
                self.show_section(Section::Workouts).await;
                true
            }
            Err(e) => {
                self.fail("Failed to delete workout", e);
                false
            }
        }
    }

    /// Pick the day shown in the nutrition section and load it.
    pub async fn select_nutrition_date(&mut self, date: NaiveDate) {
        self.nutrition_date = date;
        self.show_section(Section::Nutrition).await;
    }

    pub async fn add_nutrition_log(&mut self, entry: &NutritionEntry) -> bool {
        if let Err(e) = entry.validate() {
            self.fail("Invalid food log", e);
            return false;
        }
        self.presenter.set_loading(true);
        let outcome = self.nutrition().add_log(entry).await;
        self.presenter.set_loading(false);
        match outcome {
            Ok(_) => {
                self.notify(Severity::Success, "Food logged successfully!");
                self.show_section(Section::Nutrition).await;
                true
            }
            Err(e) => {
                self.fail("Failed to log food", e);
                false
            }
        }
    }

    pub async fn delete_nutrition_log(&mut self, id: i64) -> bool {
        match self.nutrition().delete_log(id).await {
            Ok(()) => {
                self.notify(Severity::Success, "Food log deleted successfully");
                self.show_section(Section::Nutrition).await;
                true
            }
            Err(e) => {
                self.fail("Failed to delete food log", e);
                false
            }
        }
    }

    pub async fn nutrition_summary(&mut self, from: NaiveDate, to: NaiveDate) -> Option<NutritionSummary> {
        match self.nutrition().summary(from, to).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                self.fail("Failed to load nutrition summary", e);
                None
            }
        }
    }

    pub async fn create_goal(&mut self, draft: &GoalDraft) -> bool {
        if let Err(e) = draft.validate() {
            self.fail("Invalid goal", e);
            return false;
        }
        self.presenter.set_loading(true);
        let outcome = self.goals().create(draft).await;
        self.presenter.set_loading(false);
        match outcome {
            Ok(_) => {
                self.notify(Severity::Success, "Goal created successfully!");
                self.show_section(Section::Goals).await;
                true
            }
            Err(e) => {
                self.fail("Failed to create goal", e);
                false
            }
        }
    }

    pub async fn set_goal_status(&mut self, id: i64, status: GoalStatus) -> bool {
        match self.goals().set_status(id, status).await {
            Ok(goal) => {
                self.notify(Severity::Success, &format!("Goal marked {}", goal.status));
                self.show_section(Section::Goals).await;
                true
            }
            Err(e) => {
                self.fail("Failed to update goal", e);
                false
            }
        }
    }

    pub async fn delete_goal(&mut self, id: i64) -> bool {
        match self.goals().delete(id).await {
            Ok(()) => {
                self.notify(Severity::Success, "Goal deleted successfully");
                self.show_section(Section::Goals).await;
                true
            }
            Err(e) => {
                self.fail("Failed to delete goal", e);
                false
            }
        }
    }

    fn notify(&mut self, severity: Severity, message: &str) {
        self.presenter.notify(Notification {
            severity,
            message: message.to_string(),
            dismiss_after: self.notification_ttl,
        });
    }

    /// Single exit point for failed actions.
    fn fail(&mut self, action: &str, err: ClientError) {
        warn!(action, error = %err, "action failed");
        match err {
            ClientError::Auth(_) if self.session.is_authenticated() => {
                self.sign_out();
                self.presenter.show_auth(Some("Your session has expired, please log in again"));
                self.notify(Severity::Warning, "Session expired");
            }
            ClientError::Validation(msg) => self.notify(Severity::Error, &msg),
            ClientError::Http { detail, .. } => {
                self.notify(Severity::Error, &format!("{} ({})", action, detail))
            }
            _ => self.notify(Severity::Error, action),
        }
    }
}
