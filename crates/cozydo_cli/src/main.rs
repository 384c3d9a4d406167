mod cli;

use clap::{CommandFactory, Parser};
use cli::{Cli, Command};
use cozydo_core::config::{self, Config};
use cozydo_core::error::AppError;
use cozydo_core::model::{Store, Task};
use cozydo_core::notify;
use cozydo_core::reminder::{self, ReminderOutcome};
use cozydo_core::rewards;
use cozydo_core::storage::json_store;
use cozydo_core::task_api::{self, Completion, Summary};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tabled::settings::Style;
use tabled::{Table, Tabled};

fn status_label(task: &Task) -> &'static str {
    if task.completed { "done" } else { "pending" }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DEADLINE")]
    deadline: String,
    #[tabled(rename = "HOURS")]
    hours: String,
    #[tabled(rename = "PRIORITY")]
    priority: u8,
    #[tabled(rename = "STATUS")]
    status: &'static str,
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id,
        name: task.name.clone(),
        deadline: task.deadline.clone(),
        hours: format!("{}", task.duration_hours),
        priority: task.priority,
        status: status_label(task),
    }
}

fn print_tasks_table(tasks: &[Task]) {
    let rows: Vec<TaskRow> = tasks.iter().map(task_row).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
}

fn print_tasks_json(tasks: &[Task]) {
    println!("{}", serde_json::json!(tasks));
}

fn print_task_json(task: &Task) {
    println!("{}", serde_json::json!(task));
}

fn print_completion_json(completion: &Completion) {
    let json = serde_json::json!({
        "task": completion.task,
        "gained": completion.gained,
        "points": completion.points,
    });
    println!("{json}");
}

fn print_summary_json(summary: &Summary) {
    let json = serde_json::json!({
        "total": summary.total,
        "done": summary.done,
        "pending": summary.pending,
        "points": summary.points,
    });
    println!("{json}");
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::validation("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn report_reminders(outcome: &ReminderOutcome, json: bool, announce_empty: bool) {
    if json {
        if announce_empty || !outcome.tasks.is_empty() {
            println!("{}", serde_json::json!(outcome.tasks));
        }
    } else if outcome.tasks.is_empty() {
        if announce_empty {
            println!("No tasks due soon.");
        }
    } else {
        for task in &outcome.tasks {
            println!("Reminder: {} at {}", task.name, task.deadline);
        }
    }

    for failure in &outcome.failures {
        eprintln!(
            "WARNING: could not notify for task {}: {}",
            failure.task_id, failure.error
        );
    }
}

fn deliver_reward(message: &str) {
    let notifier = notify::notifier_from_env();
    if let Err(err) = notifier.notify("Rewards", message) {
        eprintln!("WARNING: could not deliver reward notification: {err}");
    }
}

fn resolve_window(minutes: Option<i64>, config: &Config) -> i64 {
    match minutes {
        Some(minutes) if minutes > 0 => minutes,
        _ => config.window_minutes(),
    }
}

fn resolve_interval(seconds: Option<u64>, config: &Config) -> u64 {
    match seconds {
        Some(seconds) if seconds > 0 => seconds,
        _ => config.interval_secs(),
    }
}

fn run_remind(
    watch: bool,
    window: Option<i64>,
    interval: Option<u64>,
    json: bool,
    config: &Config,
) -> Result<(), AppError> {
    let path = json_store::store_path()?;
    let window_minutes = resolve_window(window, config);
    let notifier = notify::notifier_from_env();

    let mut store = json_store::load_store(&path)?;
    let outcome = reminder::check_reminders(&path, &mut store, window_minutes, notifier.as_ref())?;
    report_reminders(&outcome, json, true);

    if !watch {
        return Ok(());
    }

    let interval_secs = resolve_interval(interval, config);
    loop {
        std::thread::sleep(std::time::Duration::from_secs(interval_secs));
        // Another process may have edited the file while we slept.
        let mut store = json_store::load_store(&path)?;
        let outcome =
            reminder::check_reminders(&path, &mut store, window_minutes, notifier.as_ref())?;
        report_reminders(&outcome, json, false);
    }
}

fn run_with_store(
    cli: &Cli,
    path: &Path,
    store: &mut Store,
    config: &Config,
) -> Result<(), AppError> {
    let palette = config::palette_for_theme(config.theme.as_deref());

    match &cli.command {
        Command::Add {
            name,
            deadline,
            duration_hours,
            priority,
        } => {
            let task = task_api::add_task(path, store, name, deadline, *duration_hours, *priority)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} (id {})", task.name, task.id);
            }
        }
        Command::List => {
            if cli.json {
                print_tasks_json(&store.tasks);
            } else if store.tasks.is_empty() {
                println!("No tasks yet. Add one!");
            } else {
                print_tasks_table(&store.tasks);
            }
        }
        Command::Done { id } => {
            let completion = task_api::mark_complete(path, store, *id)?;
            let message =
                rewards::reward_message(&completion.task.name, completion.gained, completion.points);
            if completion.gained > 0 {
                deliver_reward(&message);
            }

            if cli.json {
                print_completion_json(&completion);
            } else if completion.gained == 0 {
                println!("Task '{}' is already completed.", completion.task.name);
            } else {
                println!("{}", palette.accentize(&message));
                println!("{}", palette.mutedize(rewards::motivation(completion.points)));
            }
        }
        Command::Delete { id } => {
            let task = task_api::delete_task(path, store, *id)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Deleted task: {} (id {})", task.name, task.id);
            }
        }
        Command::Edf => {
            let ordered = task_api::suggest_edf(store);
            if cli.json {
                print_tasks_json(&ordered);
            } else if ordered.is_empty() {
                println!("No pending tasks to schedule.");
            } else {
                print_tasks_table(&ordered);
                let total: f64 = ordered.iter().map(|task| task.duration_hours).sum();
                println!("Estimated total time to finish pending tasks: {total} hours");
            }
        }
        Command::Summary => {
            let summary = task_api::summary(store);
            if cli.json {
                print_summary_json(&summary);
            } else {
                println!(
                    "Total tasks: {} | Done: {} | Pending: {} | Points: {}",
                    summary.total, summary.done, summary.pending, summary.points
                );
            }
        }
        Command::Remind { window, .. } => {
            // One sweep on demand; interactive sessions already watch in the background.
            let window_minutes = resolve_window(*window, config);
            let notifier = notify::notifier_from_env();
            let outcome = reminder::check_reminders(path, store, window_minutes, notifier.as_ref())?;
            report_reminders(&outcome, cli.json, true);
        }
    }

    Ok(())
}

fn run_command(cli: Cli, config: &Config) -> Result<(), AppError> {
    if let Command::Remind {
        watch,
        window,
        interval,
    } = &cli.command
    {
        return run_remind(*watch, *window, *interval, cli.json, config);
    }

    let path = json_store::store_path()?;
    let mut store = json_store::load_store(&path)?;
    run_with_store(&cli, &path, &mut store, config)
}

fn spawn_reminder_thread(
    store: Arc<Mutex<Store>>,
    path: PathBuf,
    window_minutes: i64,
    interval_secs: u64,
) {
    std::thread::spawn(move || {
        let notifier = notify::notifier_from_env();
        loop {
            {
                let mut guard = store.lock().unwrap_or_else(|err| err.into_inner());
                match reminder::check_reminders(&path, &mut guard, window_minutes, notifier.as_ref())
                {
                    Ok(outcome) => report_reminders(&outcome, false, false),
                    Err(err) => eprintln!("WARNING: reminder sweep failed: {err}"),
                }
            }
            std::thread::sleep(std::time::Duration::from_secs(interval_secs));
        }
    });
}

fn run_interactive(config: &Config) -> Result<(), AppError> {
    let path = json_store::store_path()?;
    let store = Arc::new(Mutex::new(json_store::load_store(&path)?));
    spawn_reminder_thread(
        Arc::clone(&store),
        path.clone(),
        config.window_minutes(),
        config.interval_secs(),
    );

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("cozydo".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        let mut guard = store.lock().unwrap_or_else(|err| err.into_inner());
        if let Err(err) = run_with_store(&cli, &path, &mut guard, config) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = &loaded.error {
        eprintln!("WARNING: {err}");
    }
    let config = loaded.config;

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            err.exit();
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
