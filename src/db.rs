//! Database schema and operations for the footprint history

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::TrackerResult;
use crate::models::{Breakdown, FootprintRecord};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> TrackerResult<()> {
    conn.execute_batch(
        r#"
        -- One row per completed calculation, in insertion order
        CREATE TABLE IF NOT EXISTS footprints (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recorded_on TEXT NOT NULL,
            total_kg REAL NOT NULL,
            transportation_kg REAL NOT NULL,
            electricity_kg REAL NOT NULL,
            diet_kg REAL NOT NULL,
            waste_kg REAL NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<FootprintRecord> {
    let date: NaiveDate = row.get(0)?;
    let total: f64 = row.get(1)?;
    let breakdown = Breakdown {
        transportation: row.get(2)?,
        electricity: row.get(3)?,
        diet: row.get(4)?,
        waste: row.get(5)?,
    };
    Ok(FootprintRecord::restore(date, total, breakdown))
}

/// Insert a record at the end of the history
pub fn insert_record(conn: &Connection, record: &FootprintRecord) -> TrackerResult<()> {
    let b = record.breakdown();
    conn.execute(
        "INSERT INTO footprints (recorded_on, total_kg, transportation_kg, electricity_kg, diet_kg, waste_kg)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            record.date(),
            record.total(),
            b.transportation,
            b.electricity,
            b.diet,
            b.waste,
        ),
    )?;
    Ok(())
}

/// All records in insertion order
pub fn list_records(conn: &Connection) -> TrackerResult<Vec<FootprintRecord>> {
    let mut stmt = conn.prepare(
        "SELECT recorded_on, total_kg, transportation_kg, electricity_kg, diet_kg, waste_kg
         FROM footprints
         ORDER BY id",
    )?;

    let rows = stmt.query_map([], record_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Most recently inserted record, if any
pub fn latest_record(conn: &Connection) -> TrackerResult<Option<FootprintRecord>> {
    let record = conn
        .query_row(
            "SELECT recorded_on, total_kg, transportation_kg, electricity_kg, diet_kg, waste_kg
             FROM footprints
             ORDER BY id DESC
             LIMIT 1",
            [],
            record_from_row,
        )
        .optional()?;
    Ok(record)
}

pub fn count_records(conn: &Connection) -> TrackerResult<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM footprints", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Drop the oldest rows so that at most `keep` remain; returns how many went
pub fn evict_oldest(conn: &Connection, keep: usize) -> TrackerResult<usize> {
    let removed = conn.execute(
        "DELETE FROM footprints
         WHERE id NOT IN (SELECT id FROM footprints ORDER BY id DESC LIMIT ?1)",
        [keep as i64],
    )?;
    Ok(removed)
}

/// Clear the whole history
pub fn clear_records(conn: &Connection) -> TrackerResult<()> {
    conn.execute_batch("DELETE FROM footprints;")?;
    Ok(())
}
