// Request Parameters
// Raw transport strings → typed values the store can bind directly.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Missing required parameter: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: '{value}' (expected true, false, 1 or 0)")]
    InvalidFlag { name: &'static str, value: String },

    #[error("Invalid id: '{0}' (expected an integer)")]
    InvalidId(String),

    /// Path segment or query string the extractor could not decode
    #[error("{0}")]
    Malformed(String),
}

/// Parse a boolean flag: `true`/`1` or `false`/`0`, ASCII case-insensitive
pub fn parse_flag(name: &'static str, raw: Option<&str>) -> Result<bool, ParamError> {
    let raw = raw.ok_or(ParamError::Missing(name))?;
    let value = raw.trim();

    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Ok(false)
    } else {
        Err(ParamError::InvalidFlag {
            name,
            value: raw.to_string(),
        })
    }
}

pub fn parse_id(raw: &str) -> Result<i64, ParamError> {
    raw.trim()
        .parse()
        .map_err(|_| ParamError::InvalidId(raw.to_string()))
}

/// Query string of `/restaurants/filter`, as received
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantFilterQuery {
    pub is_veg: Option<String>,
    pub has_outdoor_seating: Option<String>,
    pub is_luxury: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestaurantFilter {
    pub is_veg: bool,
    pub has_outdoor_seating: bool,
    pub is_luxury: bool,
}

impl RestaurantFilterQuery {
    pub fn parse(&self) -> Result<RestaurantFilter, ParamError> {
        Ok(RestaurantFilter {
            is_veg: parse_flag("isVeg", self.is_veg.as_deref())?,
            has_outdoor_seating: parse_flag(
                "hasOutdoorSeating",
                self.has_outdoor_seating.as_deref(),
            )?,
            is_luxury: parse_flag("isLuxury", self.is_luxury.as_deref())?,
        })
    }
}

/// Query string of `/dishes/filter`, as received
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishFilterQuery {
    pub is_veg: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DishFilter {
    pub is_veg: bool,
}

impl DishFilterQuery {
    pub fn parse(&self) -> Result<DishFilter, ParamError> {
        Ok(DishFilter {
            is_veg: parse_flag("isVeg", self.is_veg.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepted_spellings() {
        assert_eq!(parse_flag("isVeg", Some("true")), Ok(true));
        assert_eq!(parse_flag("isVeg", Some("TRUE")), Ok(true));
        assert_eq!(parse_flag("isVeg", Some("1")), Ok(true));
        assert_eq!(parse_flag("isVeg", Some(" false ")), Ok(false));
        assert_eq!(parse_flag("isVeg", Some("0")), Ok(false));
    }

    #[test]
    fn test_parse_flag_rejects_malformed() {
        let err = parse_flag("isLuxury", Some("yes")).unwrap_err();

        assert_eq!(
            err,
            ParamError::InvalidFlag {
                name: "isLuxury",
                value: "yes".to_string()
            }
        );
        assert!(err.to_string().contains("isLuxury"));
        assert_eq!(parse_flag("isVeg", None), Err(ParamError::Missing("isVeg")));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Ok(12));
        assert_eq!(parse_id("-3"), Ok(-3));
        assert_eq!(parse_id("abc"), Err(ParamError::InvalidId("abc".to_string())));
        assert!(parse_id("1.5").is_err());
    }

    #[test]
    fn test_restaurant_filter_reports_first_bad_flag() {
        let query = RestaurantFilterQuery {
            is_veg: Some("true".to_string()),
            has_outdoor_seating: None,
            is_luxury: Some("nope".to_string()),
        };

        assert_eq!(query.parse(), Err(ParamError::Missing("hasOutdoorSeating")));
    }

    #[test]
    fn test_dish_filter() {
        let query = DishFilterQuery {
            is_veg: Some("false".to_string()),
        };

        assert_eq!(query.parse(), Ok(DishFilter { is_veg: false }));
    }
}
