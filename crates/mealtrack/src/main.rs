//! `mealtrack` - CLI for the meal journal
//!
//! This binary opens the configured database, runs one command against the
//! journal and prints the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;

use mealtrack::cli::{
    Cli, Command, ConfigCommand, EditCommand, ExportCommand, ListCommand, OutputFormat,
};
use mealtrack::{init_logging, write_export, Config, Journal, MealRecord, Storage};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<mealtrack::Error>() {
            // Bad input: the message alone, and a distinct status
            Some(e) if e.is_user_error() => {
                eprintln!("error: {e}");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // `config validate` reports problems instead of failing on them
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        let path = file
            .clone()
            .or_else(|| cli.config.clone())
            .unwrap_or_else(Config::default_config_path);
        handle_validate(&path);
        return Ok(());
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Add(cmd) => {
            let mut journal = open_journal(&config)?;
            let id = journal.add(&cmd.fields.to_record())?;
            println!("Added meal {id}");
        }
        Command::List(cmd) => handle_list(open_journal(&config)?.records(), &cmd)?,
        Command::Show(cmd) => handle_show(&open_journal(&config)?, cmd.id, cmd.json)?,
        Command::Edit(cmd) => handle_edit(&mut open_journal(&config)?, &cmd)?,
        Command::Delete(cmd) => {
            open_journal(&config)?.remove(cmd.id)?;
            println!("Deleted meal {}", cmd.id);
        }
        Command::Summary(cmd) => {
            let summary = open_journal(&config)?.summary();
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
        Command::Export(cmd) => handle_export(&open_journal(&config)?, &config, &cmd)?,
        Command::Stats(cmd) => handle_stats(&config, cmd.json)?,
        Command::Config(cmd) => handle_config(&config, &cmd)?,
    }
    Ok(())
}

fn open_journal(config: &Config) -> anyhow::Result<Journal<Storage>> {
    let path = config.database_path();
    debug!("Using database {}", path.display());
    let storage = Storage::open(&path)
        .with_context(|| format!("failed to open meal database {}", path.display()))?;
    Ok(Journal::open(storage)?)
}

fn handle_show(journal: &Journal<Storage>, id: i64, json: bool) -> anyhow::Result<()> {
    let Some(record) = journal.find(id) else {
        bail!(mealtrack::Error::MealNotFound { id });
    };
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print_meal(record);
    }
    Ok(())
}

fn handle_list(records: &[MealRecord], cmd: &ListCommand) -> anyhow::Result<()> {
    let shown = &records[..cmd.limit.map_or(records.len(), |n| n.min(records.len()))];

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(shown)?),
        OutputFormat::Table => {
            println!(
                "{:>5}  {:<10}  {:<9}  {:>5}  {:>7}  FOODS",
                "ID", "DATE", "TYPE", "SCORE", "GLASSES"
            );
            for record in shown {
                println!(
                    "{:>5}  {:<10}  {:<9}  {:>5}  {:>7}  {}",
                    record.id.unwrap_or_default(),
                    record.date,
                    record.meal_type.label(),
                    record.sensation_score,
                    record.counted_glasses(),
                    record.foods.join(", ")
                );
            }
        }
        OutputFormat::Plain => {
            if shown.is_empty() {
                println!("No meals logged yet.");
            }
            for (i, record) in shown.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_meal(record);
            }
        }
    }
    Ok(())
}

fn print_meal(record: &MealRecord) {
    println!(
        "#{} {} - {}",
        record.id.unwrap_or_default(),
        record.date,
        record.meal_type
    );
    println!("  Foods:     {}", record.foods.join(", "));
    if record.alcohol.consumed {
        println!(
            "  Alcohol:   Yes ({}, {} glass(es))",
            record.alcohol.kind, record.alcohol.glasses
        );
    } else {
        println!("  Alcohol:   No");
    }
    println!("  Exercise:  {}", record.exercise);
    println!("  Feelings:  {}", record.feelings);
    println!("  Sensation: {}/10", record.sensation_score);
}

fn handle_edit(journal: &mut Journal<Storage>, cmd: &EditCommand) -> anyhow::Result<()> {
    let Some(stored) = journal.find(cmd.id) else {
        bail!(mealtrack::Error::MealNotFound { id: cmd.id });
    };
    let mut record = stored.clone();
    cmd.apply(&mut record);
    journal.update(&record)?;
    println!("Updated meal {}", cmd.id);
    Ok(())
}

fn handle_export(
    journal: &Journal<Storage>,
    config: &Config,
    cmd: &ExportCommand,
) -> anyhow::Result<()> {
    let mut exporter = config.exporter();
    if let Some(locale) = cmd.locale {
        exporter.locale = locale.into();
    }
    if cmd.raw_quotes {
        exporter = exporter.raw_quotes();
    }

    let csv = journal.export_csv(&exporter);
    if cmd.stdout {
        print!("{csv}");
        return Ok(());
    }

    let path = cmd.output.clone().unwrap_or_else(|| config.export_path());
    write_export(&path, &csv)?;
    println!(
        "Exported {} meals to {}",
        journal.records().len(),
        path.display()
    );
    Ok(())
}

fn handle_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = Storage::open(config.database_path())?;
    let stats = storage.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        let date_or_dash = |d: Option<chrono::NaiveDate>| d.map_or("-".to_string(), |d| d.to_string());
        println!("mealtrack stats");
        println!("---------------");
        println!("Database:      {}", storage.path().display());
        println!("Meals:         {}", stats.total_meals);
        println!("Oldest meal:   {}", date_or_dash(stats.oldest_meal));
        println!("Newest meal:   {}", date_or_dash(stats.newest_meal));
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Export]");
                println!("  Locale:             {:?}", config.export.locale);
                println!("  Escape quotes:      {}", config.export.escape_quotes);
                println!("  Default file:       {}", config.export_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            handle_validate(&file.clone().unwrap_or_else(Config::default_config_path));
        }
    }
    Ok(())
}

fn handle_validate(path: &Path) {
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path.to_path_buf())) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}
