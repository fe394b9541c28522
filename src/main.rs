mod app;
mod domain;
mod input;
mod persistence;
mod report;
mod store;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::{AppState, AppStore};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{
    annotate, calendar_month, flat_list, now_millis, task_to_calendar_event, to_ical,
    DeadlineSpec, Quadrant, SortKey, StatusFilter, TaskFields, ValidationError,
};
use persistence::{
    ensure_data_dir, init_local_data_dir, load_or_init_settings, log_file, meta_file, tasks_file,
    JsonBackend, MemoryBackend, Settings, TaskBackend, UserProfile,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use report::{calculate_focus_stats, render_report, write_report, StatsRange};
use std::io;
use std::path::{Path, PathBuf};
use store::TaskStore;

#[derive(Parser)]
#[command(name = "tickdone")]
#[command(about = "A terminal Eisenhower-matrix task board with deadlines and focus timing", long_about = None)]
struct Cli {
    /// Data directory to use instead of ./.tickdone or ~/.tickdone
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep tasks in memory only; nothing is written to disk
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tickdone directory in the current directory
    Init,
    /// Add a task
    Add {
        text: String,
        /// Quadrant: q1 (urgent & important) to q4
        #[arg(short, long, default_value = "q1")]
        quadrant: String,
        /// Deadline date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "days")]
        date: Option<String>,
        /// Deadline in days from now
        #[arg(long)]
        days: Option<String>,
    },
    /// Print all tasks
    List {
        /// all, pending or completed
        #[arg(short, long, default_value = "all")]
        filter: String,
        /// deadline, created, text or progress
        #[arg(short, long, default_value = "deadline")]
        sort: String,
    },
    /// Print tasks by deadline day for a month
    Calendar {
        /// Month to show (YYYY-MM). Defaults to the current month.
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Generate a focus time report
    Stats {
        /// Cover the current week instead of today
        #[arg(short, long)]
        week: bool,
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export tasks with a deadline as an iCalendar file
    Export {
        /// Output file path. Defaults to <data dir>/tickdone.ics
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Store and settings for one run
struct Session {
    data_dir: Option<PathBuf>,
    settings: Settings,
    store: AppStore,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_tui(open_session(cli.data_dir.as_deref(), cli.memory)?),
        Some(Commands::Init) => cmd_init(),
        Some(command) => {
            let mut session = open_session(cli.data_dir.as_deref(), cli.memory)?;
            run_command(&mut session, command)
        }
    }
}

fn run_command(session: &mut Session, command: Commands) -> Result<()> {
    match command {
        Commands::Init => cmd_init(),
        Commands::Add {
            text,
            quadrant,
            date,
            days,
        } => cmd_add(session, &text, &quadrant, date, days),
        Commands::List { filter, sort } => cmd_list(session, &filter, &sort),
        Commands::Calendar { month } => cmd_calendar(session, month.as_deref()),
        Commands::Stats { week, output } => cmd_stats(session, week, output),
        Commands::Export { output } => cmd_export(session, output),
    }
}

fn cmd_init() -> Result<()> {
    let current_dir = std::env::current_dir().context("Could not determine current directory")?;
    let data_dir = init_local_data_dir(&current_dir)?;
    println!("Initialized tickdone directory: {}", data_dir.display());
    println!();
    println!("tickdone will now use this local directory for task storage.");
    Ok(())
}

/// Send log records to `<data dir>/tickdone.log`; the terminal belongs to
/// the UI. Level comes from RUST_LOG, default info.
fn init_logging(data_dir: &Path) -> Result<()> {
    let path = log_file(data_dir);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    // Only the first session of a process installs the logger
    if result.is_err() {
        log::debug!("logger already installed, keeping it");
    }
    Ok(())
}

fn open_session(data_dir: Option<&Path>, memory: bool) -> Result<Session> {
    let (data_dir, settings, backend) = if memory {
        let settings = Settings {
            user: Some(UserProfile::generate()),
            ..Settings::default()
        };
        let backend: Box<dyn TaskBackend> = Box::new(MemoryBackend::new());
        (None, settings, backend)
    } else {
        let dir = ensure_data_dir(data_dir)?;
        init_logging(&dir)?;
        let settings = load_or_init_settings(meta_file(&dir))?;
        let json = JsonBackend::new(tasks_file(&dir));
        log::info!("reading tasks from {}", json.path().display());
        let backend: Box<dyn TaskBackend> = Box::new(json);
        (Some(dir), settings, backend)
    };

    let owner_id = settings.owner_id().to_string();
    let mut store = TaskStore::new(backend, owner_id.as_str(), settings.delete_mode);
    store.load(&owner_id).context("Failed to load tasks")?;

    Ok(Session {
        data_dir,
        settings,
        store,
    })
}

fn parse_deadline(date: Option<String>, days: Option<String>) -> Result<Option<DeadlineSpec>, ValidationError> {
    match (date, days) {
        (Some(date), _) => DeadlineSpec::parse_date(&date).map(Some),
        (None, Some(days)) => DeadlineSpec::parse_days(&days).map(Some),
        (None, None) => Ok(None),
    }
}

fn cmd_add(
    session: &mut Session,
    text: &str,
    quadrant: &str,
    date: Option<String>,
    days: Option<String>,
) -> Result<()> {
    let quadrant = Quadrant::from_tag(quadrant)
        .ok_or_else(|| ValidationError::UnknownQuadrant(quadrant.to_string()))?;
    let fields = TaskFields {
        deadline: parse_deadline(date, days)?,
        ..TaskFields::default()
    };

    let task = session
        .store
        .add(quadrant, text, fields, now_millis())
        .context("Failed to add task")?;
    println!(
        "Added \"{}\" to {}",
        task.text,
        session.settings.quadrant_labels.get(quadrant)
    );
    Ok(())
}

fn cmd_list(session: &Session, filter: &str, sort: &str) -> Result<()> {
    let filter = StatusFilter::from_tag(filter)
        .with_context(|| format!("Unknown filter '{}' (expected all, pending or completed)", filter))?;
    let sort = SortKey::from_tag(sort).with_context(|| {
        format!("Unknown sort '{}' (expected deadline, created, text or progress)", sort)
    })?;

    let now = now_millis();
    let policy = session.settings.deadline_policy();
    for task in flat_list(session.store.tasks(), filter, sort, &Local) {
        let check = if task.completed { "x" } else { " " };
        let deadline = match annotate(&Local, task, now, policy) {
            Some(state) if !task.completed => format!("  {}d left", state.days_left),
            _ => String::new(),
        };
        println!(
            "[{}] {}  {}  {}%{}",
            check,
            task.quadrant,
            task.text,
            task.progress,
            deadline
        );
    }
    Ok(())
}

fn parse_month(month: Option<&str>) -> Result<(i32, u32)> {
    let Some(month) = month else {
        let today = Local::now().date_naive();
        return Ok((today.year(), today.month()));
    };
    let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", month))?;
    Ok((first.year(), first.month()))
}

fn cmd_calendar(session: &Session, month: Option<&str>) -> Result<()> {
    let (year, month) = parse_month(month)?;
    let grid = calendar_month(session.store.tasks(), year, month, &Local)
        .with_context(|| format!("Invalid month {}-{:02}", year, month))?;

    println!("{}-{:02}", year, month);
    for day in grid.days.iter().filter(|d| d.in_month && !d.tasks.is_empty()) {
        for task in &day.tasks {
            let check = if task.completed { "x" } else { " " };
            println!("{}  [{}] {}  {}", day.date, check, task.quadrant, task.text);
        }
    }
    Ok(())
}

fn cmd_stats(session: &Session, week: bool, output: Option<PathBuf>) -> Result<()> {
    let range = if week {
        StatsRange::ThisWeek
    } else {
        StatsRange::Today
    };
    let stats = calculate_focus_stats(
        session.store.tasks(),
        &session.settings.quadrant_labels,
        range,
        now_millis(),
        &Local,
    );

    match (&session.data_dir, output) {
        (Some(dir), output) => {
            let path = write_report(&stats, dir, output)?;
            println!("Report generated: {}", path.display());
        }
        (None, Some(output)) => {
            let path = write_report(&stats, Path::new("."), Some(output))?;
            println!("Report generated: {}", path.display());
        }
        (None, None) => print!("{}", render_report(&stats)),
    }
    Ok(())
}

fn cmd_export(session: &Session, output: Option<PathBuf>) -> Result<()> {
    let now = now_millis();
    let events: Vec<_> = session
        .store
        .tasks()
        .filter(|task| task.deadline_spec().is_some())
        .map(|task| task_to_calendar_event(task, &session.settings.quadrant_labels, &Local, now))
        .collect();
    let ical = to_ical(&events, now);

    let output = match (output, &session.data_dir) {
        (Some(output), _) => output,
        (None, Some(dir)) => dir.join("tickdone.ics"),
        (None, None) => {
            print!("{}", ical);
            return Ok(());
        }
    };
    persistence::atomic_write(&output, &ical)
        .with_context(|| format!("Failed to write calendar: {}", output.display()))?;
    println!("Exported {} tasks to {}", events.len(), output.display());
    Ok(())
}

fn run_tui(session: Session) -> Result<()> {
    if let Some(dir) = &session.data_dir {
        eprintln!("Using tickdone directory: {}", dir.display());
    }
    log::info!("starting terminal UI with {} tasks", session.store.len());

    let meta_path = session.data_dir.as_deref().map(meta_file);
    let mut app = AppState::new(session.store, session.settings, meta_path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Release the focus tick; running sessions stay recorded
    app.shutdown();

    if let Err(err) = result {
        log::error!("terminal UI failed: {:#}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.tick();
    }
}
