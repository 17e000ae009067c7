//! Display normalization of leaf metadata values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use geonode_metadata_models::{InstanceValue, PropertySchema};
use serde_json::Value;

/// `strftime` pattern used to display dates and timestamps.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// Naive timestamp layouts accepted after RFC 3339.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Converts a leaf value to its display form.
///
/// Literal dates are always formatted with [`DATE_DISPLAY_FORMAT`]; text is
/// parsed as a date only when the schema declares `format: date-time`, and
/// is kept as-is when it does not parse. Any other value that equals a
/// `oneOf` constant is replaced by that choice's title.
#[must_use]
pub fn normalize_value(value: &InstanceValue, schema: &PropertySchema) -> Value {
    match value {
        InstanceValue::Date(date) => return display_date(*date),
        InstanceValue::DateTime(timestamp) => return display_date(timestamp.date_naive()),
        InstanceValue::Text(text) if schema.is_date_time() => {
            if let Some(date) = parse_date(text) {
                return display_date(date);
            }
            log::debug!("Keeping unparseable date-time value '{text}'");
        }
        _ => {}
    }

    let json = value.to_json();
    match schema.one_of_title(&json) {
        Some(title) => Value::String(title.to_string()),
        None => json,
    }
}

/// Parses an RFC 3339 timestamp, a naive timestamp, or a bare date.
///
/// Timestamps keep the calendar date of their own offset.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|timestamp| timestamp.date())
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
}

fn display_date(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_DISPLAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> PropertySchema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn date_time_string_and_literal_date_match() {
        let date_time = schema(json!({"type": "string", "format": "date-time"}));
        let from_text = normalize_value(&InstanceValue::from("2024-05-01T10:30:00Z"), &date_time);
        let from_date = normalize_value(
            &InstanceValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            &PropertySchema::untyped(),
        );
        assert_eq!(from_text, json!("2024-05-01"));
        assert_eq!(from_text, from_date);
    }

    #[test]
    fn literal_timestamp_uses_display_format() {
        let timestamp = DateTime::parse_from_rfc3339("2023-12-31T23:59:00-05:00").unwrap();
        assert_eq!(
            normalize_value(&InstanceValue::DateTime(timestamp), &PropertySchema::untyped()),
            json!("2023-12-31")
        );
    }

    #[test]
    fn parses_naive_and_bare_dates() {
        let expected = NaiveDate::from_ymd_opt(2022, 2, 3);
        assert_eq!(parse_date("2022-02-03T04:05:06"), expected);
        assert_eq!(parse_date("2022-02-03 04:05:06.789"), expected);
        assert_eq!(parse_date("2022-02-03"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn unparseable_date_time_passes_through() {
        let date_time = schema(json!({"type": "string", "format": "date-time"}));
        assert_eq!(
            normalize_value(&InstanceValue::from("not a date"), &date_time),
            json!("not a date")
        );
    }

    #[test]
    fn text_without_date_time_format_is_not_parsed() {
        let plain = schema(json!({"type": "string"}));
        assert_eq!(
            normalize_value(&InstanceValue::from("2024-05-01T10:30:00Z"), &plain),
            json!("2024-05-01T10:30:00Z")
        );
    }

    #[test]
    fn replaces_one_of_constants_with_titles() {
        let category = schema(json!({
            "type": "string",
            "oneOf": [
                {"const": "farming", "title": "Farming"},
                {"const": "biota", "title": "Biota"}
            ]
        }));
        assert_eq!(normalize_value(&InstanceValue::from("biota"), &category), json!("Biota"));
        assert_eq!(normalize_value(&InstanceValue::from("oceans"), &category), json!("oceans"));
    }

    #[test]
    fn matches_numeric_constants() {
        let level = schema(json!({
            "type": "integer",
            "oneOf": [{"const": 1, "title": "Low"}, {"const": 2, "title": "High"}]
        }));
        assert_eq!(normalize_value(&InstanceValue::from(json!(2)), &level), json!("High"));
        assert_eq!(normalize_value(&InstanceValue::from(json!(1.0)), &level), json!("Low"));
    }
}
