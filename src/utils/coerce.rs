//! 请求字段类型转换 (表单字段均为字符串)

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, de};
use std::sync::LazyLock;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("valid regex"));

/// 去掉所有非数字字符后解析为整数, 例如 "R$ 10,50" -> 1050; 全部为非数字时为 0
pub fn parse_digits(raw: &str) -> Option<i64> {
    let digits = NON_DIGITS.replace_all(raw, "");
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse::<i64>().ok()
}

/// 支持 RFC 3339、"YYYY-MM-DDTHH:MM:SS"、"YYYY-MM-DD HH:MM:SS" 与 "YYYY-MM-DD" (均按 UTC)
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

/// 接受字符串或数字, 统一转为字符串
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }),
    )
}

/// 接受整数或数字字符串
pub fn opt_i32_from_any<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Int(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("number out of range: {n}"))),
        Some(StringOrNumber::Float(f)) => Err(de::Error::custom(format!(
            "expected an integer, got {f}"
        ))),
        Some(StringOrNumber::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got \"{s}\""))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("5"), Some(5));
        assert_eq!(parse_digits("R$ 10,50"), Some(1050));
        assert_eq!(parse_digits("10.00"), Some(1000));
        assert_eq!(parse_digits("abc"), Some(0));
        assert_eq!(parse_digits(""), Some(0));
        assert_eq!(parse_digits("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("2025-12-24T18:30:00Z").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2025, 12, 24, 18));

        let d = parse_date("2025-12-24T18:30:00-03:00").unwrap();
        assert_eq!(d.hour(), 21);

        let d = parse_date("2025-12-24 08:00:00").unwrap();
        assert_eq!(d.hour(), 8);

        let d = parse_date("2025-12-24").unwrap();
        assert_eq!((d.day(), d.hour()), (24, 0));

        assert!(parse_date("24/12/2025").is_none());
        assert!(parse_date("").is_none());
    }

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "opt_string_or_number")]
        value: Option<String>,
        #[serde(default, deserialize_with = "opt_i32_from_any")]
        order: Option<i32>,
    }

    #[test]
    fn test_lenient_deserializers() {
        let s: Sample = serde_json::from_str(r#"{"value": 10, "order": "3"}"#).unwrap();
        assert_eq!(s.value.as_deref(), Some("10"));
        assert_eq!(s.order, Some(3));

        let s: Sample = serde_json::from_str(r#"{"value": "R$ 7", "order": 2}"#).unwrap();
        assert_eq!(s.value.as_deref(), Some("R$ 7"));
        assert_eq!(s.order, Some(2));

        let s: Sample = serde_json::from_str(r#"{}"#).unwrap();
        assert!(s.value.is_none());
        assert!(s.order.is_none());

        assert!(serde_json::from_str::<Sample>(r#"{"order": "first"}"#).is_err());
    }
}
