mod api;
mod cli;
mod config;
mod db;
mod planner;
mod scheduler;

use crate::cli::{Cli, Commands, ConfigCommands, LogCommands, RoutineCommands, VariableCommands};
use crate::config::Config;
use crate::db::{ApplySummary, Database, NewLog, NewRoutine, VariableKind};
use crate::planner::{PlannedRoutineLog, Routine};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { command } => handle_config_command(command),
        Commands::Status => handle_status(),
        Commands::Variable { command } => handle_variable_command(command),
        Commands::Routine { command } => handle_routine_command(command),
        Commands::Plan {
            from,
            to,
            routines,
            json,
        } => handle_plan(from, to, &routines, json),
        Commands::Apply {
            from,
            to,
            routines,
            user,
            skip,
        } => handle_apply(from, to, &routines, user, &skip),
        Commands::Log { command } => handle_log_command(command),
        Commands::Serve => {
            let config = load_config()?;
            run_service(config).await
        }
    }
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = load_config()?;
            config.set_value(&key, &value)?;
            config.ensure_bootstrap_files()?;
            config.save()?;

            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_config()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn handle_status() -> Result<()> {
    let config = load_config()?;
    let database = Database::open(&config.db_path)?;

    println!("routinelog status");
    println!("- db_path: {}", config.db_path.display());
    println!("- variables: {}", database.count_variables()?);
    println!("- routines: {}", database.count_routines()?);
    println!("- default_user_id: {}", config.default_user_id);
    println!(
        "- latest_log_date: {}",
        database
            .latest_log_date(&config.default_user_id)?
            .unwrap_or_else(|| "none".to_string())
    );
    match (config.auto_log_enabled, config.parse_auto_log_time()) {
        (false, _) => println!("- auto_log: disabled"),
        (true, Ok(time)) => println!("- auto_log: daily at {}", time.format("%H:%M")),
        (true, Err(error)) => println!("- auto_log: [WARN] {error}"),
    }

    Ok(())
}

fn handle_variable_command(command: VariableCommands) -> Result<()> {
    let config = load_config()?;
    let database = Database::open(&config.db_path)?;

    match command {
        VariableCommands::Add { name, kind, unit } => {
            let kind = kind.parse::<VariableKind>()?;
            let variable = database.create_variable(&name, kind, unit.as_deref())?;
            println!(
                "Variable created: #{} {} ({})",
                variable.id, variable.name, variable.kind
            );
        }
        VariableCommands::List => {
            let variables = database.list_variables()?;
            if variables.is_empty() {
                println!("No variables yet. Add one with `routinelog variable add <name>`.");
            }
            for variable in variables {
                println!(
                    "#{:<4} {:<24} {:<12} {}",
                    variable.id,
                    variable.name,
                    variable.kind,
                    variable.unit.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

fn handle_routine_command(command: RoutineCommands) -> Result<()> {
    let config = load_config()?;
    let mut database = Database::open(&config.db_path)?;

    match command {
        RoutineCommands::Add { file } => {
            let routine = database.create_routine(&load_routine_file(&file)?)?;
            println!("Routine created: #{} {}", routine.id, routine.name);
        }
        RoutineCommands::List => {
            let routines = database.list_routines()?;
            if routines.is_empty() {
                println!("No routines yet. Add one with `routinelog routine add --file <json>`.");
            }
            for routine in routines {
                println!(
                    "#{:<4} {} ({} variable(s))",
                    routine.id,
                    routine.name,
                    routine.variables.len()
                );
            }
        }
        RoutineCommands::Show { id } => {
            let routine = database
                .routine(id)?
                .with_context(|| format!("No routine found with id: {id}"))?;
            print_routine(&routine);
        }
        RoutineCommands::Remove { id } => {
            if database.delete_routine(id)? {
                println!("Routine removed: #{id}");
            } else {
                println!("No routine found with id: {id}");
            }
        }
    }

    Ok(())
}

fn handle_plan(from: Option<String>, to: Option<String>, routine_ids: &[i64], json: bool) -> Result<()> {
    let config = load_config()?;
    let (start, end) = parse_range(from, to)?;
    let logs = plan_range(&config, start, end, routine_ids)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&logs).context("Failed to serialize planned logs")?
        );
    } else {
        print_planned_logs(&logs);
    }

    Ok(())
}

fn handle_apply(
    from: Option<String>,
    to: Option<String>,
    routine_ids: &[i64],
    user: Option<String>,
    skip: &[String],
) -> Result<()> {
    let config = load_config()?;
    let (start, end) = parse_range(from, to)?;
    let mut logs = plan_range(&config, start, end, routine_ids)?;

    for id in skip {
        if !planner::set_enabled(&mut logs, id, false) {
            warn!(id = %id, "skip id does not match any planned entry");
        }
    }

    let user_id = user.unwrap_or_else(|| config.default_user_id.clone());
    let mut database = Database::open(&config.db_path)?;
    let summary = database.apply_planned_logs(&user_id, &logs)?;

    println!("Applied planned logs for {user_id}: {start} ~ {end}");
    println!("- planned: {}", logs.len());
    println!("- disabled: {}", logs.len() - planner::enabled_count(&logs));
    println!("- created: {}", summary.created);
    println!("- skipped (already logged): {}", summary.skipped);
    if summary.failed > 0 {
        println!("- failed (see log output): {}", summary.failed);
    }

    Ok(())
}

fn handle_log_command(command: LogCommands) -> Result<()> {
    let config = load_config()?;
    let database = Database::open(&config.db_path)?;

    match command {
        LogCommands::Add {
            variable,
            value,
            date,
            time,
            unit,
            user,
        } => {
            let target = database
                .variable_by_name(&variable)?
                .with_context(|| format!("Unknown variable: {variable}"))?;
            let date = parse_optional_date(date)?;
            let time = time.unwrap_or_else(|| Local::now().format("%H:%M").to_string());
            let user_id = user.unwrap_or_else(|| config.default_user_id.clone());
            let unit = unit.or(target.unit.clone());

            let created = database.record_log(&NewLog {
                user_id: &user_id,
                variable_id: target.id,
                date,
                time_of_day: &time,
                value: &value,
                unit: unit.as_deref(),
                routine_id: None,
            })?;

            if created {
                println!("Logged {} = {value} on {date} {time}", target.name);
            } else {
                println!("{} already has a log on {date} {time}", target.name);
            }
        }
        LogCommands::List { from, to, user } => {
            let (start, end) = parse_range(from, to)?;
            let user_id = user.unwrap_or_else(|| config.default_user_id.clone());
            let logs = database.logs_between(&user_id, start, end)?;

            println!("Logs for {user_id}: {start} ~ {end} ({} entries)", logs.len());
            for log in logs {
                println!(
                    "{} {} {:<24} {} {}",
                    log.date,
                    log.time_of_day,
                    log.variable_name,
                    log.value,
                    log.unit.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

async fn run_service(config: Config) -> Result<()> {
    config.ensure_bootstrap_files()?;
    let _ = Database::open(&config.db_path)?;

    let shared_config = Arc::new(config);
    let scheduler_config = Arc::clone(&shared_config);
    let scheduler_schedule_fallback = Arc::clone(&shared_config);
    let api_config = Arc::clone(&shared_config);

    info!("routinelog service started");

    tokio::select! {
        scheduler_result = scheduler::run_daily_scheduler(move || {
            let runtime = Config::load().unwrap_or_else(|_| (*scheduler_schedule_fallback).clone());
            if !runtime.auto_log_enabled {
                return Ok(None);
            }

            runtime.parse_auto_log_time().map(Some)
        }, move |date| {
            let config = Arc::clone(&scheduler_config);
            async move {
                let runtime_config = Config::load().unwrap_or_else(|_| (*config).clone());
                run_auto_log(&runtime_config, date).map(|_| ())
            }
        }) => {
            scheduler_result?;
        }
        api_result = api::run_server(api_config) => {
            api_result?;
        }
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

fn run_auto_log(config: &Config, date: NaiveDate) -> Result<ApplySummary> {
    let logs = plan_range(config, date, date, &[])?;
    let mut database = Database::open(&config.db_path)?;
    let summary = database.apply_planned_logs(&config.default_user_id, &logs)?;

    info!(
        date = %date,
        user_id = %config.default_user_id,
        created = summary.created,
        skipped = summary.skipped,
        "auto-log run finished"
    );

    Ok(summary)
}

fn plan_range(
    config: &Config,
    start: NaiveDate,
    end: NaiveDate,
    routine_ids: &[i64],
) -> Result<Vec<PlannedRoutineLog>> {
    planner::validate_range(start, end, config.plan_max_days)?;

    let database = Database::open(&config.db_path)?;
    let routines = planner::select_routines(database.list_routines()?, routine_ids);

    let unplannable = routines
        .iter()
        .flat_map(|routine| routine.variables.iter())
        .filter(|variable| !variable.is_plannable())
        .count();
    if unplannable > 0 {
        warn!(
            count = unplannable,
            "routine variables without weekdays or times are ignored"
        );
    }

    Ok(planner::generate_planned_routine_logs(&routines, start, end))
}

fn print_planned_logs(logs: &[PlannedRoutineLog]) {
    if logs.is_empty() {
        println!("No planned logs in this range.");
        return;
    }

    for (date, entries) in planner::group_by_date(logs) {
        println!("{} ({})", date, date.format("%a"));
        for entry in entries {
            println!(
                "  [{}] {} {:<10} {} = {} {} ({})  id={}",
                if entry.enabled { "x" } else { " " },
                entry.time_of_day,
                entry.time_name.as_deref().unwrap_or(""),
                entry.variable_name,
                entry.default_value,
                entry.default_unit.as_deref().unwrap_or(""),
                entry.routine_name,
                entry.id
            );
        }
    }

    println!(
        "{} planned log(s), {} enabled",
        logs.len(),
        planner::enabled_count(logs)
    );
}

fn print_routine(routine: &Routine) {
    println!("Routine #{} {}", routine.id, routine.name);
    for variable in &routine.variables {
        let weekdays = variable
            .weekdays
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let times = variable
            .times
            .iter()
            .map(|time| match &time.label {
                Some(label) => format!("{} ({label})", time.time_of_day),
                None => time.time_of_day.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "- {} = {} {} | weekdays [{}] | times [{}]",
            variable.variable_name,
            variable.default_value,
            variable.default_unit.as_deref().unwrap_or(""),
            weekdays,
            times
        );
    }
}

fn load_routine_file(path: &Path) -> Result<NewRoutine> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read routine file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse routine file: {}", path.display()))
}

fn parse_range(from: Option<String>, to: Option<String>) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_optional_date(from)?;
    let end = to.map(|raw| parse_date(&raw)).transpose()?.unwrap_or(start);

    Ok((start, end))
}

fn parse_optional_date(input: Option<String>) -> Result<NaiveDate> {
    input
        .as_deref()
        .map(parse_date)
        .transpose()?
        .map_or_else(|| Ok(Local::now().date_naive()), Ok)
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {input}. Example: 2024-01-01"))
}

fn load_config() -> Result<Config> {
    Config::load_or_init()
}
