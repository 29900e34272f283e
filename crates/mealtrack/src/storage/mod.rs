//! Storage layer for mealtrack.
//!
//! This module provides `SQLite`-based persistent storage for meal records
//! and implements [`MealStore`] on top of it.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::meal::{Alcohol, MealRecord, MealStore, MealType};

const SELECT_COLUMNS: &str = r"
    SELECT id, date, meal_type, foods, alcohol_consumed, alcohol_type,
           alcohol_glasses, exercise, feelings, sensation_score
    FROM meals
";

/// `SQLite` storage for meal records.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count stored meals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM meals", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_meals = self.count()?;

        let (oldest, newest): (Option<String>, Option<String>) =
            self.conn
                .query_row("SELECT MIN(date), MAX(date) FROM meals", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;

        let parse = |s: String| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_meals,
            oldest_meal: oldest.and_then(parse),
            newest_meal: newest.and_then(parse),
            db_size_bytes,
        })
    }

    fn row_to_meal(row: &rusqlite::Row) -> rusqlite::Result<MealRecord> {
        let id: i64 = row.get(0)?;
        let date_str: String = row.get(1)?;
        let meal_type_str: String = row.get(2)?;
        let foods_json: String = row.get(3)?;

        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

        let meal_type = meal_type_str.parse::<MealType>().unwrap_or_else(|_| {
            warn!(
                "Unknown meal type: {}, defaulting to {}",
                meal_type_str,
                MealType::default()
            );
            MealType::default()
        });

        let foods: Vec<String> = serde_json::from_str(&foods_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(MealRecord {
            id: Some(id),
            date,
            meal_type,
            foods,
            alcohol: Alcohol {
                consumed: row.get(4)?,
                kind: row.get(5)?,
                glasses: row.get(6)?,
            },
            exercise: row.get(7)?,
            feelings: row.get(8)?,
            sensation_score: row.get(9)?,
        })
    }
}

impl MealStore for Storage {
    fn list(&self) -> Result<Vec<MealRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id ASC"))?;

        let meals = stmt
            .query_map([], Self::row_to_meal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded {} meals", meals.len());
        Ok(meals)
    }

    fn get(&self, id: i64) -> Result<Option<MealRecord>> {
        let result = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                Self::row_to_meal,
            )
            .optional()?;
        Ok(result)
    }

    fn insert(&self, record: &MealRecord) -> Result<i64> {
        let foods = serde_json::to_string(&record.foods)?;

        self.conn.execute(
            r"
            INSERT INTO meals (date, meal_type, foods, alcohol_consumed, alcohol_type,
                               alcohol_glasses, exercise, feelings, sensation_score)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                record.date.format("%Y-%m-%d").to_string(),
                record.meal_type.as_str(),
                foods,
                record.alcohol.consumed,
                record.alcohol.kind,
                record.alcohol.glasses,
                record.exercise,
                record.feelings,
                record.sensation_score,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted meal with id {}", id);
        Ok(id)
    }

    fn update(&self, record: &MealRecord) -> Result<bool> {
        let id = record.id.ok_or(Error::MissingId)?;
        let foods = serde_json::to_string(&record.foods)?;

        let affected = self.conn.execute(
            r"
            UPDATE meals SET date = ?2, meal_type = ?3, foods = ?4, alcohol_consumed = ?5,
                             alcohol_type = ?6, alcohol_glasses = ?7, exercise = ?8,
                             feelings = ?9, sensation_score = ?10
            WHERE id = ?1
            ",
            params![
                id,
                record.date.format("%Y-%m-%d").to_string(),
                record.meal_type.as_str(),
                foods,
                record.alcohol.consumed,
                record.alcohol.kind,
                record.alcohol.glasses,
                record.exercise,
                record.feelings,
                record.sensation_score,
            ],
        )?;

        debug!("Updated meal {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        debug!("Deleted meal {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Total number of meals stored.
    pub total_meals: i64,
    /// Date of the earliest meal.
    pub oldest_meal: Option<NaiveDate>,
    /// Date of the latest meal.
    pub newest_meal: Option<NaiveDate>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::parse_date;

    fn create_test_storage() -> Storage {
        crate::logging::init_test_logging();
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn create_test_meal(date: &str, meal_type: MealType) -> MealRecord {
        MealRecord::new(parse_date(date).unwrap(), meal_type)
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_insert_and_get_round_trips_all_fields() {
        let storage = create_test_storage();
        let meal = create_test_meal("2024-04-02", MealType::Dinner)
            .with_food("steak")
            .with_food("fries")
            .with_alcohol(Alcohol::drank("red wine", 2))
            .with_exercise("tennis")
            .with_feelings("heavy")
            .with_score(6);

        let id = storage.insert(&meal).unwrap();
        let retrieved = storage.get(id).unwrap().unwrap();

        assert_eq!(retrieved.id, Some(id));
        assert_eq!(MealRecord { id: None, ..retrieved }, meal);
    }

    #[test]
    fn test_unconsumed_alcohol_fields_preserved() {
        let storage = create_test_storage();
        let mut meal = create_test_meal("2024-04-02", MealType::Lunch);
        meal.alcohol = Alcohol {
            consumed: false,
            kind: "beer".to_string(),
            glasses: 3,
        };

        let id = storage.insert(&meal).unwrap();
        let retrieved = storage.get(id).unwrap().unwrap();
        assert_eq!(retrieved.alcohol, meal.alcohol);
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = create_test_storage();
        assert!(storage.get(99999).unwrap().is_none());
    }

    #[test]
    fn test_list_orders_by_date_descending() {
        let storage = create_test_storage();
        storage
            .insert(&create_test_meal("2024-01-01", MealType::Breakfast))
            .unwrap();
        storage
            .insert(&create_test_meal("2024-03-01", MealType::Lunch))
            .unwrap();
        storage
            .insert(&create_test_meal("2024-02-01", MealType::Dinner))
            .unwrap();
        storage
            .insert(&create_test_meal("2024-03-01", MealType::Dinner))
            .unwrap();

        let meals = storage.list().unwrap();
        let order: Vec<(String, MealType)> = meals
            .iter()
            .map(|m| (m.date.to_string(), m.meal_type))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2024-03-01".to_string(), MealType::Lunch),
                ("2024-03-01".to_string(), MealType::Dinner),
                ("2024-02-01".to_string(), MealType::Dinner),
                ("2024-01-01".to_string(), MealType::Breakfast),
            ]
        );
    }

    #[test]
    fn test_list_empty() {
        let storage = create_test_storage();
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_update() {
        let storage = create_test_storage();
        let id = storage
            .insert(&create_test_meal("2024-04-02", MealType::Lunch))
            .unwrap();

        let mut meal = storage.get(id).unwrap().unwrap();
        meal.meal_type = MealType::Snack;
        meal.foods = vec!["apple".to_string()];
        meal.sensation_score = 8;

        assert!(storage.update(&meal).unwrap());
        assert_eq!(storage.get(id).unwrap().unwrap(), meal);
    }

    #[test]
    fn test_update_nonexistent() {
        let storage = create_test_storage();
        let mut meal = create_test_meal("2024-04-02", MealType::Lunch);
        meal.id = Some(12345);
        assert!(!storage.update(&meal).unwrap());
    }

    #[test]
    fn test_update_without_id() {
        let storage = create_test_storage();
        let meal = create_test_meal("2024-04-02", MealType::Lunch);
        assert!(matches!(storage.update(&meal), Err(Error::MissingId)));
    }

    #[test]
    fn test_delete() {
        let storage = create_test_storage();
        let id = storage
            .insert(&create_test_meal("2024-04-02", MealType::Lunch))
            .unwrap();

        assert!(storage.delete(id).unwrap());
        assert!(storage.get(id).unwrap().is_none());
        assert!(!storage.delete(id).unwrap());
    }

    #[test]
    fn test_insert_ignores_record_id() {
        let storage = create_test_storage();
        let mut meal = create_test_meal("2024-04-02", MealType::Lunch);
        meal.id = Some(777);

        let id = storage.insert(&meal).unwrap();
        assert_ne!(id, 777);
    }

    #[test]
    fn test_unknown_meal_type_defaults_to_lunch() {
        let storage = create_test_storage();
        storage
            .conn
            .execute(
                "INSERT INTO meals (date, meal_type, sensation_score) VALUES ('2024-01-01', 'brunch', 5)",
                [],
            )
            .unwrap();

        let meals = storage.list().unwrap();
        assert_eq!(meals[0].meal_type, MealType::Lunch);
        assert!(meals[0].foods.is_empty());
    }

    #[test]
    fn test_french_meal_type_in_database_is_recognised() {
        let storage = create_test_storage();
        storage
            .conn
            .execute(
                "INSERT INTO meals (date, meal_type, sensation_score) VALUES ('2024-01-01', 'Collation', 5)",
                [],
            )
            .unwrap();

        assert_eq!(storage.list().unwrap()[0].meal_type, MealType::Snack);
    }

    #[test]
    fn test_corrupt_date_is_an_error() {
        let storage = create_test_storage();
        storage
            .conn
            .execute(
                "INSERT INTO meals (date, meal_type, sensation_score) VALUES ('not a date', 'lunch', 5)",
                [],
            )
            .unwrap();

        assert!(matches!(storage.list(), Err(Error::DatabaseQuery(_))));
    }

    #[test]
    fn test_count() {
        let storage = create_test_storage();
        assert_eq!(storage.count().unwrap(), 0);

        storage
            .insert(&create_test_meal("2024-04-02", MealType::Lunch))
            .unwrap();
        storage
            .insert(&create_test_meal("2024-04-02", MealType::Lunch))
            .unwrap();

        assert_eq!(storage.count().unwrap(), 2);
    }

    #[test]
    fn test_stats_empty() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();

        assert_eq!(stats.total_meals, 0);
        assert!(stats.oldest_meal.is_none());
        assert!(stats.newest_meal.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let storage = create_test_storage();
        storage
            .insert(&create_test_meal("2024-02-10", MealType::Lunch))
            .unwrap();
        storage
            .insert(&create_test_meal("2023-12-31", MealType::Dinner))
            .unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_meals, 2);
        assert_eq!(stats.oldest_meal, Some(parse_date("2023-12-31").unwrap()));
        assert_eq!(stats.newest_meal, Some(parse_date("2024-02-10").unwrap()));
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_unicode_content() {
        let storage = create_test_storage();
        let meal = create_test_meal("2024-04-02", MealType::Breakfast)
            .with_food("pain au chocolat")
            .with_food("café crème")
            .with_feelings("très bien 😊");

        let id = storage.insert(&meal).unwrap();
        let retrieved = storage.get(id).unwrap().unwrap();
        assert_eq!(retrieved.foods[1], "café crème");
        assert_eq!(retrieved.feelings, "très bien 😊");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("meals.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage
                .insert(&create_test_meal("2024-04-02", MealType::Lunch))
                .unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let storage = Storage::open(&db_path).unwrap();
        assert_eq!(storage.count().unwrap(), 1);
        assert!(storage.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested").join("deeper").join("meals.db");

        let _storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
    }
}
