// Catalog Store - Data Access Component
//
// Each operation issues exactly one bound read query and hands back the raw
// rows. Emptiness is never interpreted here; that is the router's job.

use rusqlite::{Connection, OpenFlags, Params};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

use crate::entities::{Dish, Flag, Restaurant};

/// Failure to run a read against the store
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed query, failed binding, missing table, broken file
    #[error("database error: {}", sqlite_message(.0))]
    Sqlite(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked
    #[error("database connection unavailable")]
    Unavailable,
}

/// SQLite's own message, without the statement text rusqlite appends to
/// input errors. The full error stays available through `Debug`.
fn sqlite_message(err: &rusqlite::Error) -> String {
    match err {
        rusqlite::Error::SqlInputError { msg, .. } => msg.clone(),
        other => other.to_string(),
    }
}

/// Read-only access to the catalog.
///
/// Implementations must be shareable across request tasks; the router only
/// ever holds an `Arc<dyn CatalogStore>`.
pub trait CatalogStore: Send + Sync {
    /// Unfiltered scan in store-native order
    fn all_restaurants(&self) -> Result<Vec<Restaurant>, QueryError>;

    /// Exact match on id; `None` when no row has it
    fn restaurant_by_id(&self, id: i64) -> Result<Option<Restaurant>, QueryError>;

    fn restaurants_by_cuisine(&self, cuisine: &str) -> Result<Vec<Restaurant>, QueryError>;

    /// Conjunctive exact match on all three flags
    fn filter_restaurants(
        &self,
        is_veg: bool,
        has_outdoor_seating: bool,
        is_luxury: bool,
    ) -> Result<Vec<Restaurant>, QueryError>;

    /// Full scan, highest rating first
    fn restaurants_by_rating(&self) -> Result<Vec<Restaurant>, QueryError>;

    fn all_dishes(&self) -> Result<Vec<Dish>, QueryError>;

    /// Exact match on id. Returns a collection: callers get every matching row.
    fn dishes_by_id(&self, id: i64) -> Result<Vec<Dish>, QueryError>;

    fn filter_dishes(&self, is_veg: bool) -> Result<Vec<Dish>, QueryError>;

    /// Full scan, cheapest first
    fn dishes_by_price(&self) -> Result<Vec<Dish>, QueryError>;
}

/// SQLite-backed store holding one connection for the process lifetime
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open an existing database file for reading only. Never creates the file.
    pub fn open_read_only(path: &Path) -> Result<Self, QueryError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::from_connection(conn))
    }

    /// Names of the catalog tables missing from the store, empty when the
    /// schema is complete
    pub fn missing_tables(&self) -> Result<Vec<&'static str>, QueryError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
            let mut missing = Vec::new();
            for table in ["restaurants", "dishes"] {
                if !stmt.exists([table])? {
                    missing.push(table);
                }
            }
            Ok(missing)
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, QueryError> {
        let conn = self.conn.lock().map_err(|_| QueryError::Unavailable)?;
        Ok(f(&conn)?)
    }

    fn query_restaurants<P: Params>(
        &self,
        clause: &str,
        params: P,
    ) -> Result<Vec<Restaurant>, QueryError> {
        let sql = format!("SELECT * FROM restaurants{}", clause);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params, Restaurant::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn query_dishes<P: Params>(&self, clause: &str, params: P) -> Result<Vec<Dish>, QueryError> {
        let sql = format!("SELECT * FROM dishes{}", clause);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params, Dish::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

// Clauses are fixed strings; request values only ever travel as bound parameters.
// Flags compare through lower() so INTEGER 0/1 and TEXT 'true'/'false' stores both match.
impl CatalogStore for SqliteStore {
    fn all_restaurants(&self) -> Result<Vec<Restaurant>, QueryError> {
        self.query_restaurants("", [])
    }

    fn restaurant_by_id(&self, id: i64) -> Result<Option<Restaurant>, QueryError> {
        let mut rows = self.query_restaurants(" WHERE id = ?1", [id])?;
        // id is the primary key
        Ok(rows.pop())
    }

    fn restaurants_by_cuisine(&self, cuisine: &str) -> Result<Vec<Restaurant>, QueryError> {
        self.query_restaurants(" WHERE cuisine = ?1", [cuisine])
    }

    fn filter_restaurants(
        &self,
        is_veg: bool,
        has_outdoor_seating: bool,
        is_luxury: bool,
    ) -> Result<Vec<Restaurant>, QueryError> {
        let [veg, veg_text] = Flag::spellings(is_veg);
        let [outdoor, outdoor_text] = Flag::spellings(has_outdoor_seating);
        let [luxury, luxury_text] = Flag::spellings(is_luxury);
        self.query_restaurants(
            " WHERE lower(isVeg) IN (?1, ?2)
                AND lower(hasOutdoorSeating) IN (?3, ?4)
                AND lower(isLuxury) IN (?5, ?6)",
            [veg, veg_text, outdoor, outdoor_text, luxury, luxury_text],
        )
    }

    fn restaurants_by_rating(&self) -> Result<Vec<Restaurant>, QueryError> {
        self.query_restaurants(" ORDER BY rating DESC", [])
    }

    fn all_dishes(&self) -> Result<Vec<Dish>, QueryError> {
        self.query_dishes("", [])
    }

    fn dishes_by_id(&self, id: i64) -> Result<Vec<Dish>, QueryError> {
        self.query_dishes(" WHERE id = ?1", [id])
    }

    fn filter_dishes(&self, is_veg: bool) -> Result<Vec<Dish>, QueryError> {
        self.query_dishes(" WHERE lower(isVeg) IN (?1, ?2)", Flag::spellings(is_veg))
    }

    fn dishes_by_price(&self) -> Result<Vec<Dish>, QueryError> {
        self.query_dishes(" ORDER BY price ASC", [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_dishes, insert_restaurants, setup_database};

    fn restaurant(
        id: i64,
        cuisine: &str,
        flags: (bool, bool, bool),
        rating: f64,
    ) -> Restaurant {
        Restaurant {
            id,
            name: Some(format!("Restaurant {}", id)),
            cuisine: cuisine.to_string(),
            is_veg: flags.0,
            has_outdoor_seating: flags.1,
            is_luxury: flags.2,
            rating,
            ..Default::default()
        }
    }

    fn dish(id: i64, is_veg: bool, price: f64) -> Dish {
        Dish {
            id,
            name: Some(format!("Dish {}", id)),
            is_veg,
            price,
            ..Default::default()
        }
    }

    fn seeded_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        insert_restaurants(
            &conn,
            &[
                restaurant(1, "Indian", (true, true, false), 4.5),
                restaurant(2, "Italian", (false, true, false), 3.2),
                restaurant(3, "Indian", (true, false, true), 4.9),
                restaurant(4, "Chinese", (true, true, true), 4.0),
            ],
        )
        .unwrap();
        insert_dishes(
            &conn,
            &[dish(1, true, 250.0), dish(2, false, 120.0), dish(3, true, 90.5)],
        )
        .unwrap();
        SqliteStore::from_connection(conn)
    }

    #[test]
    fn test_restaurant_by_id() {
        let store = seeded_store();

        let found = store.restaurant_by_id(3).unwrap();
        assert_eq!(found.map(|r| r.rating), Some(4.9));

        assert!(store.restaurant_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_cuisine_is_exact_match() {
        let store = seeded_store();

        let ids: Vec<i64> = store
            .restaurants_by_cuisine("Indian")
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(store.restaurants_by_cuisine("indian").unwrap().is_empty());
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let store = seeded_store();

        let rows = store.filter_restaurants(true, true, false).unwrap();

        assert_eq!(rows.len(), 1, "Only restaurant 1 has all three flags");
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn test_sorted_listings() {
        let store = seeded_store();

        let ratings: Vec<f64> = store
            .restaurants_by_rating()
            .unwrap()
            .iter()
            .map(|r| r.rating)
            .collect();
        assert_eq!(ratings, vec![4.9, 4.5, 4.0, 3.2]);

        let prices: Vec<f64> = store
            .dishes_by_price()
            .unwrap()
            .iter()
            .map(|d| d.price)
            .collect();
        assert_eq!(prices, vec![90.5, 120.0, 250.0]);
    }

    #[test]
    fn test_dishes_by_id_and_flag() {
        let store = seeded_store();

        assert_eq!(store.dishes_by_id(2).unwrap(), vec![dish(2, false, 120.0)]);
        assert!(store.dishes_by_id(99).unwrap().is_empty());
        assert_eq!(store.filter_dishes(true).unwrap().len(), 2);
        assert_eq!(store.all_dishes().unwrap().len(), 3);
    }

    #[test]
    fn test_cuisine_is_bound_not_interpolated() {
        let store = seeded_store();

        let rows = store.restaurants_by_cuisine("Indian' OR '1'='1").unwrap();

        assert!(rows.is_empty());
        assert_eq!(store.all_restaurants().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_schema_is_query_error() {
        let store = SqliteStore::from_connection(Connection::open_in_memory().unwrap());

        assert_eq!(store.missing_tables().unwrap(), vec!["restaurants", "dishes"]);

        let err = store.all_restaurants().unwrap_err();
        assert!(matches!(err, QueryError::Sqlite(_)));
        assert_eq!(err.to_string(), "database error: no such table: restaurants");
        assert!(!err.to_string().contains("SELECT"), "statement text stays in the logs");
    }

    #[test]
    fn test_store_without_name_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE restaurants (
                id INTEGER PRIMARY KEY, cuisine TEXT, isVeg INTEGER,
                hasOutdoorSeating INTEGER, isLuxury INTEGER, rating REAL
             );
             CREATE TABLE dishes (id INTEGER PRIMARY KEY, isVeg INTEGER, price REAL);
             INSERT INTO restaurants VALUES (1, 'Indian', 1, 1, 0, 4.5);
             INSERT INTO dishes VALUES (1, 0, 150);",
        )
        .unwrap();
        let store = SqliteStore::from_connection(conn);

        let found = store.restaurant_by_id(1).unwrap().expect("row 1");
        assert_eq!(found.name, None);
        assert_eq!(found.cuisine, "Indian");
        assert!(found.extra.is_empty());

        let dishes = store.dishes_by_price().unwrap();
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].price, 150.0);
    }

    #[test]
    fn test_extra_columns_are_returned() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE dishes (id INTEGER PRIMARY KEY, name TEXT, isVeg INTEGER, price REAL, rating REAL);
             INSERT INTO dishes VALUES (4, 'Dal', 1, 80, 4.2);",
        )
        .unwrap();
        let store = SqliteStore::from_connection(conn);

        let dishes = store.dishes_by_id(4).unwrap();

        assert_eq!(dishes[0].name.as_deref(), Some("Dal"));
        assert_eq!(dishes[0].extra.get("rating"), Some(&serde_json::json!(4.2)));
    }

    #[test]
    fn test_text_flag_store() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE restaurants (
                id INTEGER PRIMARY KEY, name TEXT, cuisine TEXT, isVeg TEXT,
                hasOutdoorSeating TEXT, isLuxury TEXT, rating REAL
             );
             CREATE TABLE dishes (id INTEGER PRIMARY KEY, name TEXT, isVeg TEXT, price REAL);
             INSERT INTO restaurants VALUES
                (1, 'A', 'Indian', 'true', 'true', 'false', 4.5),
                (2, 'B', 'Indian', 'true', 'false', 'false', 4.0);
             INSERT INTO dishes VALUES (1, 'Salad', 'true', 90), (2, 'Wings', 'false', 200);",
        )
        .unwrap();
        let store = SqliteStore::from_connection(conn);

        let rows = store.filter_restaurants(true, true, false).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert!(rows[0].is_veg && rows[0].has_outdoor_seating && !rows[0].is_luxury);

        let veg = store.filter_dishes(true).unwrap();
        assert_eq!(veg.len(), 1);
        assert_eq!(veg[0].name.as_deref(), Some("Salad"));
        assert!(!store.filter_dishes(false).unwrap()[0].is_veg);
    }

    #[test]
    fn test_open_read_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.sqlite");
        let writer = Connection::open(&path).unwrap();
        setup_database(&writer).unwrap();
        insert_dishes(&writer, &[dish(7, true, 10.0)]).unwrap();

        let store = SqliteStore::open_read_only(&path).unwrap();

        assert!(store.missing_tables().unwrap().is_empty());
        assert_eq!(store.dishes_by_id(7).unwrap().len(), 1);
        assert!(store.all_restaurants().unwrap().is_empty());
    }

    #[test]
    fn test_open_read_only_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let result = SqliteStore::open_read_only(&dir.path().join("absent.sqlite"));

        assert!(result.is_err());
    }
}
