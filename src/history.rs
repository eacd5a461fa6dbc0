//! Session-scoped footprint history
//!
//! Records live in a private in-memory SQLite database, one row per
//! record. Nothing touches the disk; dropping the store drops the history.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::db;
use crate::error::TrackerResult;
use crate::models::FootprintRecord;

/// Append-only, ordered history of calculations
pub struct HistoryStore {
    conn: Connection,
    capacity: Option<usize>,
}

impl HistoryStore {
    /// Empty, unbounded history
    pub fn new() -> TrackerResult<Self> {
        Self::with_capacity(None)
    }

    /// Empty history that keeps at most `capacity` records, evicting the
    /// oldest on append. `None` means unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> TrackerResult<Self> {
        let conn = Connection::open_in_memory()?;
        db::init_schema(&conn)?;
        Ok(Self {
            conn,
            capacity: capacity.filter(|&n| n > 0),
        })
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn append(&mut self, record: FootprintRecord) -> TrackerResult<()> {
        db::insert_record(&self.conn, &record)?;

        if let Some(limit) = self.capacity {
            let evicted = db::evict_oldest(&self.conn, limit)?;
            if evicted > 0 {
                debug!(target: "carbon_tracker::history", evicted, limit, "evicted oldest records");
            }
        }
        Ok(())
    }

    /// Snapshot of every record, oldest first
    pub fn all(&self) -> TrackerResult<Vec<FootprintRecord>> {
        db::list_records(&self.conn)
    }

    pub fn latest(&self) -> TrackerResult<Option<FootprintRecord>> {
        db::latest_record(&self.conn)
    }

    pub fn len(&self) -> TrackerResult<usize> {
        db::count_records(&self.conn)
    }

    pub fn is_empty(&self) -> TrackerResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Irreversibly clear the history
    pub fn reset(&mut self) -> TrackerResult<()> {
        db::clear_records(&self.conn)?;
        info!(target: "carbon_tracker::history", "history reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Breakdown;
    use chrono::NaiveDate;

    fn record(day: u32, transportation: f64) -> FootprintRecord {
        FootprintRecord::new(
            NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
            Breakdown {
                transportation,
                electricity: 1.5,
                diet: 0.25,
                waste: 0.1,
            },
        )
    }

    #[test]
    fn append_grows_by_one_and_keeps_order() {
        let mut store = HistoryStore::new().unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.latest().unwrap(), None);

        for day in 1..=3 {
            let before = store.all().unwrap().len();
            let rec = record(day, day as f64 * 10.0);
            store.append(rec.clone()).unwrap();

            let after = store.all().unwrap();
            assert_eq!(after.len(), before + 1);
            assert_eq!(after.last(), Some(&rec));
            assert_eq!(store.latest().unwrap(), Some(rec));
        }
    }

    #[test]
    fn records_round_trip_exactly() {
        let mut store = HistoryStore::new().unwrap();
        let rec = record(9, 104.99999999999999);
        store.append(rec.clone()).unwrap();

        let stored = store.latest().unwrap().unwrap();
        assert_eq!(stored.total().to_bits(), rec.total().to_bits());
        assert_eq!(stored.date(), rec.date());
        assert_eq!(stored.breakdown(), rec.breakdown());
    }

    #[test]
    fn reset_empties_the_store() {
        let mut store = HistoryStore::new().unwrap();
        store.append(record(1, 1.0)).unwrap();
        store.append(record(2, 2.0)).unwrap();

        store.reset().unwrap();

        assert!(store.all().unwrap().is_empty());
        assert_eq!(store.latest().unwrap(), None);
        assert_eq!(store.len().unwrap(), 0);

        // still usable afterwards
        store.append(record(3, 3.0)).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn capacity_keeps_most_recent_records() {
        let mut store = HistoryStore::with_capacity(Some(2)).unwrap();
        for day in 1..=5 {
            store.append(record(day, day as f64)).unwrap();
        }

        let days: Vec<u32> = store
            .all()
            .unwrap()
            .iter()
            .map(|r| chrono::Datelike::day(&r.date()))
            .collect();
        assert_eq!(days, vec![4, 5]);
    }

    #[test]
    fn zero_capacity_means_unbounded() {
        let mut store = HistoryStore::with_capacity(Some(0)).unwrap();
        assert_eq!(store.capacity(), None);
        for day in 1..=4 {
            store.append(record(day, 1.0)).unwrap();
        }
        assert_eq!(store.len().unwrap(), 4);
    }
}
