// UI layer: a terminal presenter plus the interactive menu built on
// `dialoguer`. The menu only collects input and calls the controller; all
// output goes through `TerminalPresenter`.

use anyhow::Result;
use chrono::{Duration as Days, NaiveDate};
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::controller::{today, Controller};
use crate::models::{
    Exercise, Goal, GoalDraft, GoalStatus, GoalType, MealType, NutritionEntry, NutritionLog,
    NutritionSummary, User, Workout, WorkoutDraft,
};
use crate::router::Section;
use crate::session::TokenStore;
use crate::view::{DashboardView, GoalView, Notification, NutritionView, Presenter, SectionView, Severity};
use crate::workouts::EditMode;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Presenter that prints to stdout and keeps the last rendered section so
/// the menu can offer its items for edit/delete.
#[derive(Default)]
pub struct TerminalPresenter {
    spinner: Option<ProgressBar>,
    last_view: Option<SectionView>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn workouts(&self) -> &[Workout] {
        match &self.last_view {
            Some(SectionView::Workouts(w)) => w,
            _ => &[],
        }
    }

    fn nutrition_logs(&self) -> &[NutritionLog] {
        match &self.last_view {
            Some(SectionView::Nutrition(n)) => &n.logs,
            _ => &[],
        }
    }

    fn goals(&self) -> Vec<&Goal> {
        match &self.last_view {
            Some(SectionView::Goals(g)) => g.iter().map(|v| &v.goal).collect(),
            _ => Vec::new(),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn show_auth(&mut self, error: Option<&str>) {
        self.last_view = None;
        println!("\n{}", "Fit4Ever - sign in".bold());
        if let Some(e) = error {
            println!("{}", e.red());
        }
    }

    fn show_main(&mut self, user: &User) {
        println!("\n{} {} <{}>", "Signed in as".bold(), user.display_name(), user.email);
    }

    fn render(&mut self, view: &SectionView) {
        println!("\n{}", format!("== {} ==", view.section()).bold());
        match view {
            SectionView::Dashboard(d) => print_dashboard(d),
            SectionView::Workouts(w) => print_workouts(w),
            SectionView::Nutrition(n) => print_nutrition(n),
            SectionView::Goals(g) => print_goals(g),
        }
        self.last_view = Some(view.clone());
    }

    fn notify(&mut self, notification: Notification) {
        let msg = notification.message;
        match notification.severity {
            Severity::Success => println!("{} {}", "[ok]".green(), msg),
            Severity::Error => println!("{} {}", "[error]".red(), msg),
            Severity::Warning => println!("{} {}", "[warn]".yellow(), msg),
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            if self.spinner.is_none() {
                let spinner = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                    spinner.set_style(style);
                }
                spinner.set_message("Loading...");
                spinner.enable_steady_tick(Duration::from_millis(100));
                self.spinner = Some(spinner);
            }
        } else if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn show_workout_form(&mut self, mode: EditMode, _draft: Option<&WorkoutDraft>) {
        let title = match mode {
            EditMode::Editing(_) => "Edit Workout",
            EditMode::Creating => "Add New Workout",
        };
        println!("\n{}", title.bold());
    }
}

fn print_dashboard(d: &DashboardView) {
    println!(
        "Workouts: {}   Calories today: {}   Active goals: {}   This week: {}",
        d.total_workouts, d.today_calories, d.active_goals, d.week_streak
    );
    println!("\n{}", "Recent workouts".bold());
    if d.recent_workouts.is_empty() {
        println!("  No workouts yet. Start your fitness journey!");
    }
    for w in &d.recent_workouts {
        println!("  {}  {}", w.date, w.title);
    }
    println!("\n{}", "Goals".bold());
    if d.goal_previews.is_empty() {
        println!("  Set your first goal to track progress!");
    }
    for g in &d.goal_previews {
        print_goal_line(g);
    }
}

fn print_workouts(workouts: &[Workout]) {
    if workouts.is_empty() {
        println!("No workouts found. Create your first workout!");
        return;
    }
    for w in workouts {
        println!("{} {}  {}", format!("#{}", w.id).dim(), w.date, w.title.clone().bold());
        println!("    {}", w.notes.as_deref().unwrap_or("No notes"));
        for e in w.exercises.iter().take(3) {
            println!("    - {}", e);
        }
        if w.exercises.len() > 3 {
            println!("    +{} more exercises", w.exercises.len() - 3);
        }
    }
}

fn print_nutrition(n: &NutritionView) {
    let t = &n.totals;
    println!(
        "{}: {} kcal  {}g protein  {}g carbs  {}g fat",
        n.date,
        t.total_calories,
        t.total_protein.round(),
        t.total_carbs.round(),
        t.total_fat.round()
    );
    if n.logs.is_empty() {
        println!("No food logged for this date");
    }
    for log in &n.logs {
        println!(
            "  {} {} ({})  {} cal  {}g protein",
            format!("#{}", log.id).dim(),
            log.item_name,
            log.meal_type,
            log.calories,
            log.protein
        );
    }
}

fn print_goals(goals: &[GoalView]) {
    if goals.is_empty() {
        println!("No goals set. Create your first goal!");
        return;
    }
    for g in goals {
        print_goal_line(g);
        println!("      {} - {}", g.goal.start_date, g.goal.end_date);
    }
}

fn print_goal_line(g: &GoalView) {
    let progress = g
        .progress
        .map(|p| format!("{} (server estimate)", p))
        .unwrap_or_else(|| "not yet computed".to_string());
    println!(
        "  {} {}  [{}]  target {}  progress: {}",
        format!("#{}", g.goal.id).dim(),
        g.goal.goal_type,
        g.goal.status,
        g.goal.target_value,
        progress
    );
}

/// Main interactive loop. Runs until the user chooses "Exit".
pub async fn main_menu<S: TokenStore>(mut app: Controller<TerminalPresenter, S>) -> Result<()> {
    app.start().await;
    loop {
        if app.session().is_none() {
            let items = vec!["Login", "Register", "Exit"];
            match Select::new().items(&items).default(0).interact()? {
                0 => handle_login(&mut app).await?,
                1 => handle_register(&mut app).await?,
                _ => break,
            }
            continue;
        }

        let items = vec!["Dashboard", "Workouts", "Nutrition", "Goals", "Logout", "Exit"];
        match Select::new().items(&items).default(0).interact()? {
            0 => app.show_section(Section::Dashboard).await,
            1 => {
                app.show_section(Section::Workouts).await;
                workouts_menu(&mut app).await?;
            }
            2 => {
                app.show_section(Section::Nutrition).await;
                nutrition_menu(&mut app).await?;
            }
            3 => {
                app.show_section(Section::Goals).await;
                goals_menu(&mut app).await?;
            }
            4 => app.logout(),
            _ => break,
        }
    }
    Ok(())
}

async fn handle_login<S: TokenStore>(app: &mut Controller<TerminalPresenter, S>) -> Result<()> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    // `Password` hides input in terminal for passwords.
    let password: String = Password::new().with_prompt("Password").interact()?;
    app.login(&email, &password).await;
    Ok(())
}

async fn handle_register<S: TokenStore>(app: &mut Controller<TerminalPresenter, S>) -> Result<()> {
    let name: String = Input::new().with_prompt("Full name").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password: String = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;
    app.register(&name, &email, &password).await;
    Ok(())
}

async fn workouts_menu<S: TokenStore>(app: &mut Controller<TerminalPresenter, S>) -> Result<()> {
    while app.current_section() == Some(Section::Workouts) {
        let items = vec!["Add workout", "Edit workout", "Delete workout", "Back"];
        match Select::new().items(&items).default(0).interact()? {
            0 => {
                app.new_workout();
                let draft = prompt_workout(None)?;
                app.submit_workout(&draft).await;
            }
            1 => {
                let Some(id) = pick_workout(app.presenter().workouts())? else { continue };
                if let Some(current) = app.edit_workout(id).await {
                    let draft = prompt_workout(Some(&current))?;
                    app.submit_workout(&draft).await;
                }
            }
            2 => {
                let Some(id) = pick_workout(app.presenter().workouts())? else { continue };
                if confirm("Are you sure you want to delete this workout?")? {
                    app.delete_workout(id).await;
                }
            }
            _ => break,
        }
    }
    Ok(())
}

async fn nutrition_menu<S: TokenStore>(app: &mut Controller<TerminalPresenter, S>) -> Result<()> {
    while app.current_section() == Some(Section::Nutrition) {
        let items = vec!["Log food", "Delete food log", "Change date", "Weekly summary", "Back"];
        match Select::new().items(&items).default(0).interact()? {
            0 => {
                let entry = prompt_food(app.nutrition_date())?;
                app.add_nutrition_log(&entry).await;
            }
            1 => {
                let logs = app.presenter().nutrition_logs();
                if logs.is_empty() {
                    println!("Nothing to delete.");
                    continue;
                }
                let labels: Vec<String> = logs
                    .iter()
                    .map(|l| format!("{} ({}, {} cal)", l.item_name, l.meal_type, l.calories))
                    .collect();
                let id = logs[Select::new().items(&labels).default(0).interact()?].id;
                if confirm("Are you sure you want to delete this food log?")? {
                    app.delete_nutrition_log(id).await;
                }
            }
            2 => {
                let date = prompt_date("Date", app.nutrition_date())?;
                app.select_nutrition_date(date).await;
            }
            3 => {
                let to = app.nutrition_date();
                if let Some(summary) = app.nutrition_summary(to - Days::days(6), to).await {
                    print_summary(&summary);
                }
            }
            _ => break,
        }
    }
    Ok(())
}

async fn goals_menu<S: TokenStore>(app: &mut Controller<TerminalPresenter, S>) -> Result<()> {
    while app.current_section() == Some(Section::Goals) {
        let items = vec!["Add goal", "Mark goal completed", "Cancel goal", "Delete goal", "Back"];
        let choice = Select::new().items(&items).default(0).interact()?;
        match choice {
            0 => {
                let draft = prompt_goal()?;
                app.create_goal(&draft).await;
            }
            1 | 2 | 3 => {
                let goals = app.presenter().goals();
                if goals.is_empty() {
                    println!("No goals yet.");
                    continue;
                }
                let labels: Vec<String> = goals
                    .iter()
                    .map(|g| format!("{} target {} [{}]", g.goal_type, g.target_value, g.status))
                    .collect();
                let id = goals[Select::new().items(&labels).default(0).interact()?].id;
                match choice {
                    1 => {
                        app.set_goal_status(id, GoalStatus::Completed).await;
                    }
                    2 => {
                        app.set_goal_status(id, GoalStatus::Cancelled).await;
                    }
                    _ => {
                        if confirm("Are you sure you want to delete this goal?")? {
                            app.delete_goal(id).await;
                        }
                    }
                }
            }
            _ => break,
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn pick_workout(workouts: &[Workout]) -> Result<Option<i64>> {
    if workouts.is_empty() {
        println!("No workouts yet.");
        return Ok(None);
    }
    let labels: Vec<String> = workouts.iter().map(|w| format!("{}  {}", w.date, w.title)).collect();
    let idx = Select::new().items(&labels).default(0).interact()?;
    Ok(Some(workouts[idx].id))
}

fn prompt_date(prompt: &str, default: NaiveDate) -> Result<NaiveDate> {
    let raw: String = Input::new()
        .with_prompt(format!("{} (YYYY-MM-DD)", prompt))
        .default(default.format(DATE_FORMAT).to_string())
        .validate_with(|s: &String| -> Result<(), &str> {
            NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(|_| ())
                .map_err(|_| "expected a date like 2024-05-31")
        })
        .interact_text()?;
    Ok(NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)?)
}

fn prompt_f64(prompt: &str, default: Option<f64>) -> Result<f64> {
    let mut input = Input::<f64>::new();
    input.with_prompt(prompt);
    if let Some(d) = default {
        input.default(d);
    }
    Ok(input.interact_text()?)
}

/// Collect a workout, starting from `current` when editing.
fn prompt_workout(current: Option<&WorkoutDraft>) -> Result<WorkoutDraft> {
    let mut title = Input::<String>::new();
    title.with_prompt("Title");
    if let Some(c) = current {
        title.default(c.title.clone());
    }
    let title = title.interact_text()?;
    let date = prompt_date("Date", current.map(|c| c.date).unwrap_or_else(today))?;
    let notes: String = Input::new()
        .with_prompt("Notes")
        .allow_empty(true)
        .default(current.and_then(|c| c.notes.clone()).unwrap_or_default())
        .interact_text()?;

    let mut exercises: Vec<Exercise> = Vec::new();
    if let Some(c) = current {
        for e in &c.exercises {
            if Confirm::new().with_prompt(format!("Keep {}?", e)).default(true).interact()? {
                exercises.push(e.clone());
            }
        }
    }
    loop {
        let more = Confirm::new()
            .with_prompt("Add an exercise?")
            .default(exercises.is_empty())
            .interact()?;
        if !more {
            break;
        }
        let name: String = Input::new().with_prompt("Exercise name").interact_text()?;
        let sets: u32 = Input::new().with_prompt("Sets").interact_text()?;
        let reps: u32 = Input::new().with_prompt("Reps").interact_text()?;
        let weight: String = Input::new()
            .with_prompt("Weight (kg, empty for none)")
            .allow_empty(true)
            .interact_text()?;
        let mut exercise = Exercise::new(name, sets, reps);
        exercise.weight = weight.trim().parse::<f64>().ok();
        exercises.push(exercise);
    }

    Ok(WorkoutDraft {
        title,
        date,
        notes: (!notes.trim().is_empty()).then_some(notes),
        exercises,
    })
}

fn prompt_food(date: NaiveDate) -> Result<NutritionEntry> {
    let date = prompt_date("Date", date)?;
    let meal_idx = Select::new()
        .with_prompt("Meal")
        .items(&MealType::ALL)
        .default(0)
        .interact()?;
    let item_name: String = Input::new().with_prompt("Food").interact_text()?;
    let calories: u32 = Input::new().with_prompt("Calories").interact_text()?;
    Ok(NutritionEntry {
        date,
        meal_type: MealType::ALL[meal_idx],
        item_name,
        calories,
        protein: prompt_f64("Protein (g)", Some(0.0))?,
        carbs: prompt_f64("Carbs (g)", Some(0.0))?,
        fat: prompt_f64("Fat (g)", Some(0.0))?,
    })
}

fn prompt_goal() -> Result<GoalDraft> {
    let type_idx = Select::new()
        .with_prompt("Goal type")
        .items(&GoalType::KNOWN)
        .default(0)
        .interact()?;
    let target_value = prompt_f64("Target value", None)?;
    let start_date = prompt_date("Start date", today())?;
    let end_date = prompt_date("End date", start_date + Days::days(30))?;
    Ok(GoalDraft {
        goal_type: GoalType::KNOWN[type_idx].clone(),
        target_value,
        start_date,
        end_date,
    })
}

fn print_summary(summary: &NutritionSummary) {
    println!("\n{}", format!("Nutrition {} to {}", summary.from, summary.to).bold());
    for day in &summary.by_day {
        let label = day
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {}  {} kcal  {}g protein", label, day.calories, day.protein.round());
    }
    println!(
        "  total  {} kcal  {}g protein  {}g carbs  {}g fat",
        summary.totals.calories,
        summary.totals.protein.round(),
        summary.totals.carbs.round(),
        summary.totals.fat.round()
    );
}
