//! Core meal record types.
//!
//! A [`MealRecord`] is one logged meal together with the lifestyle data the
//! user attached to it: what was eaten, alcohol, exercise, feelings and a
//! sensation score. Records are plain values; edits replace a record wholesale.

use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest accepted sensation score.
pub const MIN_SENSATION_SCORE: i64 = 1;

/// Highest accepted sensation score.
pub const MAX_SENSATION_SCORE: i64 = 10;

/// Score given to a fresh record.
pub const DEFAULT_SENSATION_SCORE: i64 = 5;

/// The kind of meal a record describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Morning meal.
    Breakfast,
    /// Midday meal.
    #[default]
    Lunch,
    /// Evening meal.
    Dinner,
    /// Anything eaten between meals.
    Snack,
}

impl MealType {
    /// All meal types in display order.
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Stable lowercase identifier, used in the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    /// English display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        }
    }

    /// French display label.
    #[must_use]
    pub fn label_fr(self) -> &'static str {
        match self {
            Self::Breakfast => "Petit-déjeuner",
            Self::Lunch => "Déjeuner",
            Self::Dinner => "Dîner",
            Self::Snack => "Collation",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealType {
    type Err = Error;

    /// Accepts identifiers and both label sets, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| {
                wanted == t.as_str()
                    || wanted == t.label().to_lowercase()
                    || wanted == t.label_fr().to_lowercase()
            })
            .ok_or_else(|| Error::UnknownMealType {
                input: s.to_string(),
            })
    }
}

/// Alcohol consumed with a meal.
///
/// `kind` and `glasses` only count when `consumed` is set; aggregation
/// ignores them otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alcohol {
    /// Whether any alcohol was consumed.
    pub consumed: bool,
    /// Free-text kind of drink ("wine", "beer", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of glasses.
    pub glasses: i64,
}

impl Alcohol {
    /// No alcohol.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Some glasses of the given drink.
    #[must_use]
    pub fn drank(kind: impl Into<String>, glasses: i64) -> Self {
        Self {
            consumed: true,
            kind: kind.into(),
            glasses,
        }
    }
}

/// One logged meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    /// Identifier assigned by the store. `None` until the record is saved.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,

    /// Calendar date of the meal.
    pub date: NaiveDate,

    /// Kind of meal.
    #[serde(rename = "type")]
    pub meal_type: MealType,

    /// Foods eaten, in the order they were entered.
    pub foods: Vec<String>,

    /// Alcohol consumed with the meal.
    pub alcohol: Alcohol,

    /// Exercise done that day; empty means none.
    pub exercise: String,

    /// How the user felt.
    pub feelings: String,

    /// Subjective score, nominally 1 to 10.
    pub sensation_score: i64,
}

impl Default for MealRecord {
    fn default() -> Self {
        Self::new(Local::now().date_naive(), MealType::default())
    }
}

impl MealRecord {
    /// Create an empty record for the given date and meal type.
    #[must_use]
    pub fn new(date: NaiveDate, meal_type: MealType) -> Self {
        Self {
            id: None,
            date,
            meal_type,
            foods: Vec::new(),
            alcohol: Alcohol::none(),
            exercise: String::new(),
            feelings: String::new(),
            sensation_score: DEFAULT_SENSATION_SCORE,
        }
    }

    /// Append a food, trimming it. Blank names are ignored.
    ///
    /// Returns `true` if the food was added.
    pub fn add_food(&mut self, food: &str) -> bool {
        let food = food.trim();
        if food.is_empty() {
            return false;
        }
        self.foods.push(food.to_string());
        true
    }

    /// Builder-style variant of [`MealRecord::add_food`].
    #[must_use]
    pub fn with_food(mut self, food: &str) -> Self {
        self.add_food(food);
        self
    }

    /// Builder-style setter for alcohol.
    #[must_use]
    pub fn with_alcohol(mut self, alcohol: Alcohol) -> Self {
        self.alcohol = alcohol;
        self
    }

    /// Builder-style setter for exercise.
    #[must_use]
    pub fn with_exercise(mut self, exercise: impl Into<String>) -> Self {
        self.exercise = exercise.into();
        self
    }

    /// Builder-style setter for feelings.
    #[must_use]
    pub fn with_feelings(mut self, feelings: impl Into<String>) -> Self {
        self.feelings = feelings.into();
        self
    }

    /// Builder-style setter for the sensation score.
    #[must_use]
    pub fn with_score(mut self, score: i64) -> Self {
        self.sensation_score = score;
        self
    }

    /// Whether any exercise was recorded.
    #[must_use]
    pub fn has_exercise(&self) -> bool {
        !self.exercise.trim().is_empty()
    }

    /// Glasses that count towards totals: zero unless alcohol was consumed.
    #[must_use]
    pub fn counted_glasses(&self) -> i64 {
        if self.alcohol.consumed {
            self.alcohol.glasses
        } else {
            0
        }
    }

    /// Check the fields the entry form constrains.
    ///
    /// Aggregation and export never call this; they accept whatever the
    /// store hands them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SENSATION_SCORE..=MAX_SENSATION_SCORE).contains(&self.sensation_score) {
            return Err(Error::invalid_record(
                "sensation_score",
                format!(
                    "must be between {MIN_SENSATION_SCORE} and {MAX_SENSATION_SCORE}, got {}",
                    self.sensation_score
                ),
            ));
        }
        if self.alcohol.glasses < 0 {
            return Err(Error::invalid_record(
                "glasses",
                format!("cannot be negative, got {}", self.alcohol.glasses),
            ));
        }
        if self.foods.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::invalid_record("foods", "contains a blank entry"));
        }
        Ok(())
    }
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the input is not a valid date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Persistence capability for meal records.
///
/// The journal and CLI only talk to this trait, so the aggregation and
/// export logic can be exercised without a real database.
pub trait MealStore {
    /// All records, newest date first. Records sharing a date keep id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn list(&self) -> Result<Vec<MealRecord>>;

    /// Look up a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, id: i64) -> Result<Option<MealRecord>>;

    /// Store a new record and return its assigned id. Any id on the input is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert(&self, record: &MealRecord) -> Result<i64>;

    /// Replace a stored record. Returns `false` if no record has that id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingId`] if the record has no id, or an error if the write fails.
    fn update(&self, record: &MealRecord) -> Result<bool>;

    /// Delete a record. Returns `false` if no record has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete(&self, id: i64) -> Result<bool>;
}
