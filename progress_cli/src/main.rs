use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use progress_core::chart::render_line_chart;
use progress_core::config::DataConfig;
use progress_core::metrics::{compute_bmr, compute_maintenance_calories, rolling_average_calories};
use progress_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "progress")]
#[command(about = "Daily diet and exercise progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save an entry for today (or --date), replacing any existing one
    Log(LogArgs),

    /// Show maintenance calories, recent days and goal progress (default)
    Dashboard(DashboardArgs),

    /// Export the records
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },
}

#[derive(Args)]
struct LogArgs {
    /// Date of the entry (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long)]
    breakfast: bool,

    #[arg(long)]
    snack: bool,

    #[arg(long)]
    lunch: bool,

    #[arg(long)]
    dinner: bool,

    /// Had a protein shake
    #[arg(long)]
    shake: bool,

    /// Drank 2L of water
    #[arg(long)]
    water: bool,

    #[arg(long)]
    exercise: bool,

    /// Calories eaten (kcal)
    #[arg(long, default_value_t = 0.0)]
    calories: f64,

    /// Protein eaten (g)
    #[arg(long, default_value_t = 0.0)]
    protein: f64,

    /// Body weight (kg), 0 if not measured
    #[arg(long, default_value_t = 0.0)]
    weight: f64,
}

/// Overrides for the configured personal profile
#[derive(Args, Default)]
struct ProfileArgs {
    #[arg(long)]
    age: Option<u32>,

    /// male or female
    #[arg(long)]
    sex: Option<Sex>,

    /// Height (cm)
    #[arg(long)]
    height: Option<f64>,

    /// Current body weight (kg)
    #[arg(long)]
    weight: Option<f64>,

    /// sedentary, light, moderate or active
    #[arg(long)]
    activity: Option<ActivityLevel>,
}

impl ProfileArgs {
    fn apply(&self, base: &PersonalProfile) -> Result<PersonalProfile> {
        let profile = PersonalProfile {
            age: self.age.unwrap_or(base.age),
            sex: self.sex.unwrap_or(base.sex),
            height_cm: self.height.unwrap_or(base.height_cm),
            weight_kg: self.weight.unwrap_or(base.weight_kg),
            activity_level: self.activity.unwrap_or(base.activity_level),
        };
        profile.validate()?;
        Ok(profile)
    }
}

#[derive(Args, Default)]
struct DashboardArgs {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Daily calorie deficit goal (kcal)
    #[arg(long)]
    deficit_goal: Option<f64>,

    /// Calories eaten today; defaults to today's saved entry
    #[arg(long)]
    calories: Option<f64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ExportFormat {
    /// Write the records as CSV
    Csv {
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Write the printable progress report
    Report {
        #[arg(long, short)]
        output: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    progress_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let record_path = DataConfig::record_path(&data_dir);
    tracing::debug!("Using record file {:?}", record_path);

    match cli.command {
        Some(Commands::Log(args)) => cmd_log(&record_path, args),
        Some(Commands::Dashboard(args)) => cmd_dashboard(&record_path, args, &config),
        Some(Commands::Export { format }) => cmd_export(&record_path, format, &config),
        None => {
            // Default to "dashboard" command
            cmd_dashboard(&record_path, DashboardArgs::default(), &config)
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn cmd_log(record_path: &Path, args: LogArgs) -> Result<()> {
    let record = DailyRecord {
        date: args.date.unwrap_or_else(today),
        breakfast: args.breakfast,
        snack: args.snack,
        lunch: args.lunch,
        dinner: args.dinner,
        shake: args.shake,
        water: args.water,
        exercise: args.exercise,
        calories: args.calories,
        protein: args.protein,
        weight: args.weight,
    };
    record.validate()?;

    let date = record.date;
    let store = RecordStore::update(record_path, |store| {
        store.upsert(record);
        Ok(())
    })?;

    println!("✓ Saved entry for {}", date);
    println!("  {} days tracked in {}", store.len(), record_path.display());
    Ok(())
}

fn cmd_dashboard(record_path: &Path, args: DashboardArgs, config: &Config) -> Result<()> {
    let profile = args.profile.apply(&config.profile)?;
    let deficit_goal = args.deficit_goal.unwrap_or(config.goals.deficit_kcal);
    DEFICIT_GOAL_RANGE.check(deficit_goal)?;
    if let Some(calories) = args.calories {
        CALORIES_RANGE.check(calories)?;
    }

    let store = RecordStore::load(record_path)?;
    let today_calories = args
        .calories
        .or_else(|| store.get(today()).map(|r| r.calories))
        .unwrap_or(0.0);

    let summary = summarize(&profile, store.records(), today_calories, deficit_goal);

    if args.json {
        let output = serde_json::json!({
            "summary": &summary,
            "recent": store.last_n(7),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Maintenance Calories Calculation");
    println!(
        "  Profile: {}, {} years, {} cm, {} kg",
        profile.sex, profile.age, profile.height_cm, profile.weight_kg
    );
    println!("  BMR: {:.0} kcal/day", summary.bmr);
    println!(
        "  Activity Level: {} (Factor {})",
        summary.activity_level, summary.activity_factor
    );
    println!(
        "  Maintenance Calories: {} kcal/day",
        summary.maintenance_calories
    );
    println!();

    let Some(history) = &summary.history else {
        println!("No data yet. Use `progress log` to add today's entry.");
        return Ok(());
    };

    display_recent_days(&store);
    display_charts(&store);

    let today_deficit = &summary.today;
    println!("Today's Calorie Deficit");
    println!("  Calories Consumed: {} kcal", today_deficit.calories_consumed);
    println!("  Deficit: {} kcal", today_deficit.deficit);
    if today_deficit.goal_met {
        println!(
            "  ✓ You met your calorie deficit goal of {} kcal!",
            today_deficit.deficit_goal
        );
    } else {
        println!(
            "  ⚠ You are below your target deficit by {} kcal.",
            today_deficit.shortfall
        );
    }
    println!();

    println!("Projected Weight Loss");
    println!("  Average daily deficit: {:.0} kcal", history.average_deficit);
    println!(
        "  Projected weight loss: {:.2} kg/week",
        history.projected_weekly_loss_kg
    );
    println!();

    let total = history.total_days;
    println!("% Days goals were hit");
    println!("  Full meals: {}/{} days", history.full_meal_days, total);
    println!("  Water goal: {}/{} days", history.water_days, total);
    println!("  Exercise done: {}/{} days", history.exercise_days, total);

    Ok(())
}

fn display_recent_days(store: &RecordStore) {
    const DAYS: usize = 7;

    let rolling = rolling_average_calories(store.records(), DAYS);
    let start = rolling.len().saturating_sub(DAYS);

    println!("Last {} Days", DAYS);
    println!(
        "  {:<10}  {:^5} {:^5} {:^5} {:^5} {:^5} {:^5} {:^5} {:>8} {:>7} {:>6} {:>8}",
        "Date", "Bkfst", "Snack", "Lunch", "Dinr", "Shake", "Water", "Exer",
        "Calories", "Protein", "Weight", "7d avg"
    );

    let mark = |b: bool| if b { "✓" } else { "·" };
    for (record, (_, avg)) in store.last_n(DAYS).iter().zip(&rolling[start..]) {
        println!(
            "  {:<10}  {:^5} {:^5} {:^5} {:^5} {:^5} {:^5} {:^5} {:>8} {:>7} {:>6} {:>8.0}",
            record.date.format("%Y-%m-%d").to_string(),
            mark(record.breakfast),
            mark(record.snack),
            mark(record.lunch),
            mark(record.dinner),
            mark(record.shake),
            mark(record.water),
            mark(record.exercise),
            record.calories,
            record.protein,
            record.weight,
            avg
        );
    }
    println!();
}

fn display_charts(store: &RecordStore) {
    const CHART_HEIGHT: usize = 6;

    let calories: Vec<_> = store.records().iter().map(|r| (r.date, r.calories)).collect();
    print!(
        "{}",
        render_line_chart("Calories over time", "kcal", &calories, CHART_HEIGHT)
    );
    println!();

    // Unmeasured days are left off the weight chart
    let weights: Vec<_> = store
        .records()
        .iter()
        .filter_map(|r| r.weight_measured().map(|w| (r.date, w)))
        .collect();
    print!(
        "{}",
        render_line_chart("Weight over time", "kg", &weights, CHART_HEIGHT)
    );
    println!();
}

fn cmd_export(record_path: &Path, format: ExportFormat, config: &Config) -> Result<()> {
    let store = RecordStore::load(record_path)?;
    if store.is_empty() {
        eprintln!("No records to export. Use `progress log` to add an entry first.");
        std::process::exit(2);
    }

    match format {
        ExportFormat::Csv { output } => {
            export_csv(&store, &output)?;
            println!("✓ Exported {} records to {}", store.len(), output.display());
        }
        ExportFormat::Report { output, profile } => {
            let profile = profile.apply(&config.profile)?;
            let maintenance =
                compute_maintenance_calories(compute_bmr(&profile), profile.activity_level);
            write_report(store.records(), maintenance, &output)?;
            println!("✓ Wrote progress report to {}", output.display());
        }
    }

    Ok(())
}
