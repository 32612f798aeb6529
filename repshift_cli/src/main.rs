use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use repshift_core::*;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "repshift")]
#[command(about = "Rolling workout schedule tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and persist a workout plan
    Plan(PlanArgs),

    /// Show the session scheduled for the current date
    Today,

    /// Mark a day's entries complete
    Complete {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Only the entry for this exercise
        #[arg(long)]
        exercise: Option<String>,
    },

    /// Set the current date (time travel) and shift missed workouts forward
    SetDate {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Reconcile the timeline with the current date
    Sync,

    /// List the full timeline
    Timeline,

    /// Export the timeline to CSV
    Export {
        /// Output file path
        path: PathBuf,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Training goal (weight_loss, muscle_gain, strength, endurance, flexibility)
    #[arg(long)]
    goal: String,

    /// Experience level (beginner, intermediate, expert)
    #[arg(long)]
    level: String,

    /// Training days per week (3, 4, or 5)
    #[arg(long)]
    days: u8,

    /// Available equipment (repeatable)
    #[arg(long)]
    equipment: Vec<String>,

    /// Plan start date (YYYY-MM-DD); defaults to the current date
    #[arg(long)]
    start: Option<String>,

    /// Seed for reproducible exercise selection
    #[arg(long)]
    seed: Option<u64>,

    /// Load the exercise catalog from a JSON file instead of the built-in set
    #[arg(long)]
    catalog: Option<PathBuf>,
}

/// Application wiring: one store handle constructed at startup and shared by
/// every component.
struct App {
    config: Config,
    store: Arc<dyn DocumentStore>,
    cache: Arc<SessionCache>,
    refresh: Arc<RefreshBus>,
    engine: Arc<SyncEngine>,
}

impl App {
    fn build(data_dir: PathBuf, config: Config) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(FileStore::new(data_dir));
        let cache = Arc::new(SessionCache::new());
        let refresh = Arc::new(RefreshBus::new(cache.clone()));
        let repo = TimelineRepository::new(store.clone(), config.user.id.clone());
        let engine = Arc::new(SyncEngine::new(repo, Arc::new(LogNotifier), cache.clone()));

        Self {
            config,
            store,
            cache,
            refresh,
            engine,
        }
    }

    fn repo(&self) -> &TimelineRepository {
        self.engine.repo()
    }

    /// The persisted current date, seeded from the wall clock on first use
    fn current_date(&self) -> NaiveDate {
        self.store
            .get_document("app", "state")
            .ok()
            .flatten()
            .and_then(|doc| {
                doc.get("current_date")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(DateContext::today)
    }

    fn store_current_date(&self, date: NaiveDate) -> Result<()> {
        self.store.set_document(
            "app",
            "state",
            json!({ "current_date": date.to_string() }),
            true,
        )
    }
}

fn main() -> Result<()> {
    repshift_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let app = App::build(data_dir, config);

    match cli.command {
        Commands::Plan(args) => cmd_plan(&app, args),
        Commands::Today => cmd_today(&app),
        Commands::Complete { date, exercise } => cmd_complete(&app, &date, exercise.as_deref()),
        Commands::SetDate { date } => cmd_set_date(&app, &date),
        Commands::Sync => cmd_sync(&app),
        Commands::Timeline => cmd_timeline(&app),
        Commands::Export { path } => cmd_export(&app, &path),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse()
        .map_err(|_| Error::Other(format!("Invalid date '{}': expected YYYY-MM-DD", s)))
}

fn cmd_plan(app: &App, args: PlanArgs) -> Result<()> {
    let goal = Goal::parse(&args.goal).ok_or_else(|| {
        Error::Config(format!(
            "Unknown goal '{}'. Expected one of: weight_loss, muscle_gain, strength, endurance, flexibility",
            args.goal
        ))
    })?;
    let level = ExperienceLevel::parse(&args.level).ok_or_else(|| {
        Error::Config(format!(
            "Unknown level '{}'. Expected one of: beginner, intermediate, expert",
            args.level
        ))
    })?;

    let catalog = match args.catalog {
        Some(path) => load_catalog(&path)?,
        None => get_default_catalog().clone(),
    };
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let start_date = match args.start {
        Some(s) => parse_date(&s)?,
        None => app.current_date(),
    };

    let prefs = UserPreferences {
        goal,
        level,
        days_per_week: args.days,
        equipment: args.equipment,
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let policy = PlanPolicy::from_config(&app.config);
    let plan = generate_plan(&prefs, start_date, &catalog, &policy, &mut rng)?;

    for warning in &plan.warnings {
        eprintln!("⚠ {}", warning);
    }

    persist_plan(&plan, app.repo())?;
    app.refresh.trigger_refetch();

    println!("✓ {}", plan.plan_name);
    println!("  {} weeks, starting {}", plan.duration_weeks, start_date);
    for day in &plan.days {
        println!(
            "  {:?}: {} ({} exercises, first on {})",
            day.day_of_week,
            day.title,
            day.exercises.len(),
            day.dates.first().map_or_else(String::new, |d| d.to_string()),
        );
    }

    Ok(())
}

/// Build the cacheable today-session value for a date
fn today_value(entries: &[DatedExerciseEntry], date: NaiveDate) -> Value {
    let todays: Vec<&DatedExerciseEntry> = entries.iter().filter(|e| e.date == date).collect();

    let workout = todays
        .first()
        .map(|e| e.workout_title.clone())
        .unwrap_or_default();
    let exercises: Vec<Value> = todays
        .iter()
        .map(|e| {
            json!({
                "name": e.exercise_name,
                "sets": e.instructions.sets,
                "reps": e.instructions.reps,
                "complete": e.completion_status.is_complete(),
            })
        })
        .collect();

    json!({
        "date": date.to_string(),
        "workout": workout,
        "exercises": exercises,
    })
}

fn print_today(value: &Value) {
    let date = value["date"].as_str().unwrap_or("?");
    let exercises = value["exercises"].as_array().cloned().unwrap_or_default();

    if exercises.is_empty() {
        println!("Rest day - no session scheduled for {}", date);
        return;
    }

    println!(
        "{} - {}",
        date,
        value["workout"].as_str().unwrap_or("Workout")
    );
    for exercise in &exercises {
        let mark = if exercise["complete"].as_bool().unwrap_or(false) {
            "✓"
        } else {
            "·"
        };
        println!(
            "  {} {} ({} x {})",
            mark,
            exercise["name"].as_str().unwrap_or("?"),
            exercise["sets"],
            exercise["reps"].as_str().unwrap_or("?"),
        );
    }
}

fn cmd_today(app: &App) -> Result<()> {
    let max_age = Duration::from_secs(app.config.cache.max_age_secs);
    if let Some(cached) = app.cache.read(TODAY_SESSION_KEY, max_age) {
        print_today(&cached);
        return Ok(());
    }

    let date = app.current_date();
    let entries = match app.repo().load_entries() {
        Ok(entries) => entries,
        Err(e) => {
            // Read failures surface as a neutral empty session
            tracing::warn!("Failed to load timeline: {}", e);
            Vec::new()
        }
    };

    let value = today_value(&entries, date);
    app.cache.write(TODAY_SESSION_KEY, value.clone());
    print_today(&value);
    Ok(())
}

fn cmd_complete(app: &App, date: &str, exercise: Option<&str>) -> Result<()> {
    let date = parse_date(date)?;
    let entries = app.repo().load_entries()?;

    let mut completed = 0;
    for entry in entries {
        if entry.date != date || entry.completion_status.is_complete() {
            continue;
        }
        if let Some(name) = exercise {
            if !entry.exercise_name.eq_ignore_ascii_case(name) {
                continue;
            }
        }

        let mut done = entry;
        done.completion_status = CompletionStatus::Complete;
        app.repo().write_entry(&done)?;
        completed += 1;
    }

    if completed == 0 {
        println!("No matching incomplete entries on {}", date);
    } else {
        app.cache.invalidate(TODAY_SESSION_KEY);
        println!("✓ Marked {} entries complete on {}", completed, date);
    }
    Ok(())
}

fn cmd_set_date(app: &App, date: &str) -> Result<()> {
    let new_date = parse_date(date)?;

    let ctx = DateContext::new(app.current_date(), app.engine.clone(), app.refresh.clone());
    ctx.set_current_date(new_date);
    app.store_current_date(ctx.current_date())?;

    println!("✓ Current date set to {}", new_date);
    Ok(())
}

fn cmd_sync(app: &App) -> Result<()> {
    let current = app.current_date();
    let report = app.engine.sync(current, current);

    if report.success {
        println!("✓ {}", report.message);
    } else {
        println!("✗ {}", report.message);
    }
    Ok(())
}

fn cmd_timeline(app: &App) -> Result<()> {
    let sessions = app.repo().load_sessions()?;
    if !sessions.is_empty() {
        println!("Plan days:");
        for session in &sessions {
            println!(
                "  {:?}: {} ({} exercises)",
                session.day_of_week,
                session.session_name,
                session.exercise_names.len()
            );
        }
        println!();
    }

    let mut entries = app.repo().load_entries()?;
    if entries.is_empty() {
        println!("Timeline is empty - generate a plan first");
        return Ok(());
    }
    entries.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.exercise_name.cmp(&b.exercise_name))
    });

    for entry in &entries {
        let mark = if entry.completion_status.is_complete() {
            "✓"
        } else {
            "·"
        };
        println!(
            "{} {} {}: {} ({} x {})",
            entry.date,
            mark,
            entry.workout_title,
            entry.exercise_name,
            entry.instructions.sets,
            entry.instructions.reps,
        );
    }

    let streak = app.repo().load_streak()?;
    println!();
    println!("Streak: {}", streak.count);
    if let Some(reset) = streak.reset_date {
        println!("Last reset: week of {}", reset);
    }
    Ok(())
}

fn cmd_export(app: &App, path: &std::path::Path) -> Result<()> {
    let entries = app.repo().load_entries()?;
    let count = export_timeline_csv(&entries, path)?;
    println!("✓ Exported {} rows to {}", count, path.display());
    Ok(())
}
