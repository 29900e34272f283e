//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::export::ExportLocale;
use crate::meal::{parse_date, MealRecord, MealType};

/// Meal fields shared by `add` and `edit`.
///
/// Every field is optional: `add` fills the gaps with the record defaults,
/// `edit` leaves the stored value alone.
#[derive(Debug, Default, Args)]
pub struct MealFields {
    /// Date of the meal (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Meal type (breakfast, lunch, dinner, snack)
    #[arg(short = 't', long = "type", value_parser = parse_meal_type_arg)]
    pub meal_type: Option<MealType>,

    /// Food eaten, repeat for several
    #[arg(short, long = "food", value_name = "FOOD")]
    pub foods: Vec<String>,

    /// Kind of alcohol consumed (marks the meal as with alcohol)
    #[arg(short, long, value_name = "KIND")]
    pub alcohol: Option<String>,

    /// Number of glasses
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub glasses: Option<i64>,

    /// Exercise done
    #[arg(short, long)]
    pub exercise: Option<String>,

    /// How you felt
    #[arg(long)]
    pub feelings: Option<String>,

    /// Sensation score from 1 to 10
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub score: Option<i64>,
}

impl MealFields {
    /// Write the given fields onto `record`.
    ///
    /// Foods are appended. `--alcohol` marks the meal as with alcohol and
    /// `--glasses` only changes the count.
    pub fn apply(&self, record: &mut MealRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(meal_type) = self.meal_type {
            record.meal_type = meal_type;
        }
        for food in &self.foods {
            record.add_food(food);
        }
        if let Some(kind) = &self.alcohol {
            record.alcohol.consumed = true;
            record.alcohol.kind.clone_from(kind);
        }
        if let Some(glasses) = self.glasses {
            record.alcohol.glasses = glasses;
        }
        if let Some(exercise) = &self.exercise {
            record.exercise.clone_from(exercise);
        }
        if let Some(feelings) = &self.feelings {
            record.feelings.clone_from(feelings);
        }
        if let Some(score) = self.score {
            record.sensation_score = score;
        }
    }

    /// A new record from the defaults plus the given fields.
    #[must_use]
    pub fn to_record(&self) -> MealRecord {
        let mut record = MealRecord::default();
        self.apply(&mut record);
        record
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Meal fields
    #[command(flatten)]
    pub fields: MealFields,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Maximum number of meals
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Meal id
    pub id: i64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Meal id
    pub id: i64,

    /// Fields to change
    #[command(flatten)]
    pub fields: MealFields,

    /// Mark the meal as without alcohol
    #[arg(long, conflicts_with = "alcohol")]
    pub no_alcohol: bool,

    /// Remove all foods before adding the given ones
    #[arg(long)]
    pub clear_foods: bool,
}

impl EditCommand {
    /// Apply the edit to a stored record.
    pub fn apply(&self, record: &mut MealRecord) {
        if self.clear_foods {
            record.foods.clear();
        }
        if self.no_alcohol {
            record.alcohol.consumed = false;
        }
        self.fields.apply(record);
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Meal id
    pub id: i64,
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file (defaults to the configured export path)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the CSV to standard output
    #[arg(long)]
    pub stdout: bool,

    /// Header language, overrides the configuration
    #[arg(short, long, value_enum)]
    pub locale: Option<LocaleArg>,

    /// Write embedded quotes verbatim instead of doubling them
    #[arg(long)]
    pub raw_quotes: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Export locale argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocaleArg {
    /// English headers
    En,
    /// French headers
    Fr,
}

impl From<LocaleArg> for ExportLocale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Self::English,
            LocaleArg::Fr => Self::French,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

fn parse_date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input).map_err(|e| e.to_string())
}

fn parse_meal_type_arg(input: &str) -> Result<MealType, String> {
    input.parse().map_err(|e: crate::Error| e.to_string())
}
