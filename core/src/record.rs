//! Record access for the predicate evaluator.
//!
//! The evaluator never owns the data it filters. Anything that can report an
//! optional date, location text and water-quality parameters can be filtered;
//! a field the record cannot report counts as "unknown" and never causes a
//! rejection.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::models::{Reading, UtcDateTime};

/// Trait for records the filter engine can evaluate.
///
/// Every accessor defaults to `None`, so record types only implement the
/// fields they actually carry.
pub trait DataRecord {
    fn date(&self) -> Option<UtcDateTime> {
        None
    }

    fn location(&self) -> Option<&str> {
        None
    }

    fn ph(&self) -> Option<f64> {
        None
    }

    fn turbidity(&self) -> Option<f64> {
        None
    }

    fn temperature(&self) -> Option<f64> {
        None
    }
}

impl<T: DataRecord + ?Sized> DataRecord for &T {
    fn date(&self) -> Option<UtcDateTime> {
        (**self).date()
    }

    fn location(&self) -> Option<&str> {
        (**self).location()
    }

    fn ph(&self) -> Option<f64> {
        (**self).ph()
    }

    fn turbidity(&self) -> Option<f64> {
        (**self).turbidity()
    }

    fn temperature(&self) -> Option<f64> {
        (**self).temperature()
    }
}

impl DataRecord for Reading {
    fn date(&self) -> Option<UtcDateTime> {
        self.date
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn ph(&self) -> Option<f64> {
        self.ph
    }

    fn turbidity(&self) -> Option<f64> {
        self.turbidity
    }

    fn temperature(&self) -> Option<f64> {
        self.temperature
    }
}

/// Loosely typed rows, e.g. chart data decoded straight from JSON.
///
/// Dates may be RFC 3339 strings, `YYYY-MM-DD` strings or Unix milliseconds.
/// Numeric fields may be numbers or numeric strings. Values that do not parse
/// are reported as missing.
impl DataRecord for Value {
    fn date(&self) -> Option<UtcDateTime> {
        match self.get("date")? {
            Value::String(s) => parse_date(s),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            _ => None,
        }
    }

    fn location(&self) -> Option<&str> {
        self.get("location").and_then(Value::as_str)
    }

    fn ph(&self) -> Option<f64> {
        number_field(self, "ph")
    }

    fn turbidity(&self) -> Option<f64> {
        number_field(self, "turbidity")
    }

    fn temperature(&self) -> Option<f64> {
        number_field(self, "temperature")
    }
}

fn parse_date(s: &str) -> Option<UtcDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    let n = match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (!n.is_nan()).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_reading_accessors() {
        let reading = Reading {
            location: Some("Gujarat Ahmedabad".to_string()),
            ph: Some(6.2),
            ..Reading::default()
        };
        assert_eq!(reading.location(), Some("Gujarat Ahmedabad"));
        assert_eq!(reading.ph(), Some(6.2));
        assert_eq!(reading.turbidity(), None);
        assert_eq!(reading.date(), None);
    }

    #[test]
    fn test_json_numeric_fields() {
        let row = json!({ "ph": 7.2, "turbidity": "1.8", "temperature": "warm" });
        assert_eq!(row.ph(), Some(7.2));
        assert_eq!(row.turbidity(), Some(1.8));
        assert_eq!(row.temperature(), None);
        assert_eq!(row.location(), None);
    }

    #[test]
    fn test_json_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();

        assert_eq!(json!({ "date": "2024-02-10" }).date(), Some(expected));
        assert_eq!(
            json!({ "date": "2024-02-10T00:00:00.000Z" }).date(),
            Some(expected)
        );
        assert_eq!(
            json!({ "date": "2024-02-10T05:30:00+05:30" }).date(),
            Some(expected)
        );
        assert_eq!(
            json!({ "date": expected.timestamp_millis() }).date(),
            Some(expected)
        );
        assert_eq!(json!({ "date": "last tuesday" }).date(), None);
    }

    #[test]
    fn test_non_object_json_has_no_fields() {
        let row = json!([1, 2, 3]);
        assert_eq!(row.ph(), None);
        assert_eq!(row.location(), None);
        assert_eq!(row.date(), None);
    }

    #[test]
    fn test_reference_forwarding() {
        let reading = Reading {
            temperature: Some(24.5),
            ..Reading::default()
        };
        let by_ref: &Reading = &reading;
        assert_eq!(DataRecord::temperature(&by_ref), Some(24.5));
    }
}
