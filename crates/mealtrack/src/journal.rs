//! The meal journal: one owner for the current list of meals.
//!
//! Every mutation goes through the journal, is written to the
//! [`MealStore`] and is followed by a fresh snapshot from the store. Reads
//! such as [`Journal::summary`] and [`Journal::export_csv`] are pure
//! functions of that snapshot.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::export::CsvExporter;
use crate::meal::{MealRecord, MealStore};
use crate::summary::{summarize, MealSummary};

/// State container over a [`MealStore`].
#[derive(Debug)]
pub struct Journal<S: MealStore> {
    store: S,
    records: Vec<MealRecord>,
}

impl<S: MealStore> Journal<S> {
    /// Wrap a store and load its current contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    pub fn open(store: S) -> Result<Self> {
        let records = store.list()?;
        debug!("Journal opened with {} meals", records.len());
        Ok(Self { store, records })
    }

    /// Current snapshot, newest first.
    #[must_use]
    pub fn records(&self) -> &[MealRecord] {
        &self.records
    }

    /// Find a record in the snapshot.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&MealRecord> {
        self.records.iter().find(|r| r.id == Some(id))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and store a new meal. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid or the store write fails.
    pub fn add(&mut self, record: &MealRecord) -> Result<i64> {
        record.validate()?;
        let id = self.store.insert(record)?;
        self.refresh()?;
        info!("Added meal {} ({} on {})", id, record.meal_type, record.date);
        Ok(id)
    }

    /// Validate and replace a stored meal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingId`] if the record has no id,
    /// [`Error::MealNotFound`] if the id is unknown, or a validation/store error.
    pub fn update(&mut self, record: &MealRecord) -> Result<()> {
        let id = record.id.ok_or(Error::MissingId)?;
        record.validate()?;
        if !self.store.update(record)? {
            return Err(Error::MealNotFound { id });
        }
        self.refresh()?;
        info!("Updated meal {}", id);
        Ok(())
    }

    /// Delete a stored meal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MealNotFound`] if the id is unknown, or a store error.
    pub fn remove(&mut self, id: i64) -> Result<()> {
        if !self.store.delete(id)? {
            return Err(Error::MealNotFound { id });
        }
        self.refresh()?;
        info!("Deleted meal {}", id);
        Ok(())
    }

    /// Reload the snapshot from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    pub fn refresh(&mut self) -> Result<()> {
        self.records = self.store.list()?;
        Ok(())
    }

    /// Statistics over the current snapshot.
    #[must_use]
    pub fn summary(&self) -> MealSummary {
        summarize(&self.records)
    }

    /// CSV export of the current snapshot.
    #[must_use]
    pub fn export_csv(&self, exporter: &CsvExporter) -> String {
        exporter.to_csv(&self.records)
    }
}
