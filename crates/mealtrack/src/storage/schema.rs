//! `SQLite` schema definitions for mealtrack.

/// SQL statement to create the meals table.
///
/// `foods` holds a JSON array of strings. `alcohol_type` and
/// `alcohol_glasses` are kept even when `alcohol_consumed` is 0.
pub const CREATE_MEALS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS meals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    meal_type TEXT NOT NULL,
    foods TEXT NOT NULL DEFAULT '[]',
    alcohol_consumed INTEGER NOT NULL DEFAULT 0,
    alcohol_type TEXT NOT NULL DEFAULT '',
    alcohol_glasses INTEGER NOT NULL DEFAULT 0,
    exercise TEXT NOT NULL DEFAULT '',
    feelings TEXT NOT NULL DEFAULT '',
    sensation_score INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on date for listing.
pub const CREATE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_meals_date ON meals(date DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_MEALS_TABLE,
    CREATE_DATE_INDEX,
    CREATE_METADATA_TABLE,
];
