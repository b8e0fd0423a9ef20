//! Contiguous calendar-day index spanning a user's records.

use crate::errors::{AppError, AppResult};
use crate::models::record::Record;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySeries {
    dates: Vec<NaiveDate>,
}

impl DaySeries {
    /// Every date from the first to the last record date, both included.
    pub fn build(records: &[Record]) -> AppResult<Self> {
        let first = records.iter().map(|r| r.date).min();
        let last = records.iter().map(|r| r.date).max();

        match (first, last) {
            (Some(first), Some(last)) => Ok(Self::from_range(first, last)),
            _ => Err(AppError::InsufficientData(
                "no record carries a usable time".to_string(),
            )),
        }
    }

    pub fn from_range(first: NaiveDate, last: NaiveDate) -> Self {
        let mut dates = Vec::new();
        let mut d = first;

        while d <= last {
            dates.push(d);
            match d.succ_opt() {
                Some(next) => d = next,
                None => break,
            }
        }

        Self { dates }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Position of `date` in the series, if it falls inside it.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let first = self.first()?;
        let idx = (date - first).num_days();
        if idx < 0 || idx as usize >= self.dates.len() {
            None
        } else {
            Some(idx as usize)
        }
    }
}
