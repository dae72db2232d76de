use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::*;

/// Parsed request from one line of input.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Availability {
        date: NaiveDate,
        #[serde(default)]
        category: Option<Category>,
    },
    FreeSpans {
        date: NaiveDate,
        category: Category,
        #[serde(default = "default_min_available")]
        min_available: usize,
        #[serde(default)]
        min_duration_ms: Option<Ms>,
    },
    Fleet,
    Reload,
}

fn default_min_available() -> usize {
    1
}

/// One line of output.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Availability {
        date: NaiveDate,
        slots: Vec<AvailabilitySlot>,
    },
    FreeSpans {
        date: NaiveDate,
        category: Category,
        spans: Vec<Span>,
    },
    Fleet {
        karts: usize,
        categories: Vec<CategorySummary>,
    },
    Reloaded {
        karts: usize,
    },
    Error {
        message: String,
    },
}

impl Response {
    pub fn error(e: impl std::fmt::Display) -> Self {
        Response::Error {
            message: e.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

pub fn parse_request(line: &str) -> Result<Request, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::Empty);
    }
    serde_json::from_str(trimmed).map_err(|e| ProtocolError::Parse(e.to_string()))
}

#[derive(Debug, PartialEq)]
pub enum ProtocolError {
    Parse(String),
    Empty,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Parse(s) => write!(f, "parse error: {s}"),
            ProtocolError::Empty => write!(f, "empty request"),
        }
    }
}

impl std::error::Error for ProtocolError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_availability_all_categories() {
        let req = parse_request(r#"{"op":"availability","date":"2024-06-13"}"#).unwrap();
        assert_eq!(
            req,
            Request::Availability {
                date: date(2024, 6, 13),
                category: None
            }
        );
    }

    #[test]
    fn parse_availability_one_category() {
        let req =
            parse_request(r#"{"op":"availability","date":"2024-06-13","category":"double"}"#)
                .unwrap();
        assert_eq!(
            req,
            Request::Availability {
                date: date(2024, 6, 13),
                category: Some(Category::Double)
            }
        );
    }

    #[test]
    fn parse_free_spans_defaults() {
        let req =
            parse_request(r#"{"op":"free_spans","date":"2024-06-13","category":"senior"}"#)
                .unwrap();
        assert_eq!(
            req,
            Request::FreeSpans {
                date: date(2024, 6, 13),
                category: Category::Senior,
                min_available: 1,
                min_duration_ms: None,
            }
        );
    }

    #[test]
    fn parse_free_spans_full() {
        let req = parse_request(
            r#"{"op":"free_spans","date":"2024-06-13","category":"junior","min_available":4,"min_duration_ms":1800000}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            Request::FreeSpans {
                date: date(2024, 6, 13),
                category: Category::Junior,
                min_available: 4,
                min_duration_ms: Some(1_800_000),
            }
        );
    }

    #[test]
    fn parse_unit_ops() {
        assert_eq!(parse_request(r#"{"op":"fleet"}"#).unwrap(), Request::Fleet);
        assert_eq!(parse_request(" {\"op\":\"reload\"}\r").unwrap(), Request::Reload);
    }

    #[test]
    fn invalid_date_rejected() {
        let result = parse_request(r#"{"op":"availability","date":"2024-02-30"}"#);
        assert!(matches!(result, Err(ProtocolError::Parse(_))));
    }

    #[test]
    fn unknown_op_rejected() {
        let result = parse_request(r#"{"op":"book","date":"2024-06-13"}"#);
        assert!(matches!(result, Err(ProtocolError::Parse(_))));
    }

    #[test]
    fn free_spans_requires_category() {
        let result = parse_request(r#"{"op":"free_spans","date":"2024-06-13"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_line_rejected() {
        assert_eq!(parse_request("   "), Err(ProtocolError::Empty));
    }

    #[test]
    fn error_response_shape() {
        let json = serde_json::to_string(&Response::error("boom")).unwrap();
        assert_eq!(json, r#"{"type":"error","message":"boom"}"#);
    }

    #[test]
    fn reloaded_response_shape() {
        let json = serde_json::to_string(&Response::Reloaded { karts: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"reloaded","karts":3}"#);
    }
}
