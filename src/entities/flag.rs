// Boolean columns
// Catalog stores carry flags either as INTEGER 0/1 or as TEXT 'true'/'false'.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};

use crate::params::parse_flag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag(pub bool);

impl Flag {
    /// Lower-cased text forms a stored flag can take, for `lower(col) IN (?, ?)`.
    /// `lower()` turns INTEGER 1 into '1', so one comparison covers both encodings.
    pub fn spellings(value: bool) -> [&'static str; 2] {
        if value {
            ["1", "true"]
        } else {
            ["0", "false"]
        }
    }
}

impl FromSql for Flag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Flag(i != 0)),
            ValueRef::Text(_) => {
                let text = value.as_str()?;
                parse_flag("flag", Some(text))
                    .map(Flag)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
