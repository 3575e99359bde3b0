use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::entities::{Dish, Restaurant};

/// Outcome of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    /// Rows skipped because their id already exists
    pub duplicates: usize,
}

/// Row counts per catalog table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub restaurants: i64,
    pub dishes: i64,
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL lets the read-only server keep reading while an import runs
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Restaurants Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS restaurants (
            id INTEGER PRIMARY KEY,
            name TEXT,
            cuisine TEXT NOT NULL,
            isVeg INTEGER NOT NULL CHECK (isVeg IN (0, 1)),
            hasOutdoorSeating INTEGER NOT NULL CHECK (hasOutdoorSeating IN (0, 1)),
            isLuxury INTEGER NOT NULL CHECK (isLuxury IN (0, 1)),
            rating REAL NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Dishes Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS dishes (
            id INTEGER PRIMARY KEY,
            name TEXT,
            isVeg INTEGER NOT NULL CHECK (isVeg IN (0, 1)),
            price REAL NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_restaurants_cuisine ON restaurants(cuisine)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_restaurants_rating ON restaurants(rating)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_dishes_price ON dishes(price)",
        [],
    )?;

    Ok(())
}

fn load_csv<T: DeserializeOwned>(csv_path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut records = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // +2: header line plus 1-based numbering
        let record: T = result
            .with_context(|| format!("Failed to deserialize line {}", index + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// Load restaurants from a CSV with headers
/// `id,name,cuisine,isVeg,hasOutdoorSeating,isLuxury,rating`
pub fn load_restaurants_csv(csv_path: &Path) -> Result<Vec<Restaurant>> {
    load_csv(csv_path)
}

/// Load dishes from a CSV with headers `id,name,isVeg,price`
pub fn load_dishes_csv(csv_path: &Path) -> Result<Vec<Dish>> {
    load_csv(csv_path)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

pub fn insert_restaurants(conn: &Connection, restaurants: &[Restaurant]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut stmt = conn.prepare(
        "INSERT INTO restaurants (id, name, cuisine, isVeg, hasOutdoorSeating, isLuxury, rating)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for r in restaurants {
        let result = stmt.execute(params![
            r.id,
            r.name,
            r.cuisine,
            r.is_veg,
            r.has_outdoor_seating,
            r.is_luxury,
            r.rating,
        ]);

        match result {
            Ok(_) => summary.inserted += 1,
            Err(e) if is_constraint_violation(&e) => summary.duplicates += 1,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to insert restaurant {}", r.id))
            }
        }
    }

    Ok(summary)
}

pub fn insert_dishes(conn: &Connection, dishes: &[Dish]) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut stmt = conn.prepare(
        "INSERT INTO dishes (id, name, isVeg, price) VALUES (?1, ?2, ?3, ?4)",
    )?;

    for d in dishes {
        match stmt.execute(params![d.id, d.name, d.is_veg, d.price]) {
            Ok(_) => summary.inserted += 1,
            Err(e) if is_constraint_violation(&e) => summary.duplicates += 1,
            Err(e) => return Err(e).with_context(|| format!("Failed to insert dish {}", d.id)),
        }
    }

    Ok(summary)
}

pub fn count_rows(conn: &Connection) -> Result<CatalogCounts> {
    let restaurants: i64 =
        conn.query_row("SELECT COUNT(*) FROM restaurants", [], |row| row.get(0))?;
    let dishes: i64 = conn.query_row("SELECT COUNT(*) FROM dishes", [], |row| row.get(0))?;

    Ok(CatalogCounts { restaurants, dishes })
}
