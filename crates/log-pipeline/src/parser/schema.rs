//! 필드 단위 검증기
//!
//! JSON 값의 형태를 필드별로 검사하여 `(필드 경로, 문제)` 목록을 모읍니다.
//! 첫 실패에서 멈추지 않고 가능한 모든 이슈를 수집합니다.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use logsift_core::error::ParseError;
use logsift_core::event::ValidationIssue;

/// 필드 검증 누적기
#[derive(Debug, Default)]
pub(crate) struct SchemaCheck {
    issues: Vec<ValidationIssue>,
}

impl SchemaCheck {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    /// 값이 객체인지 확인합니다.
    pub(crate) fn object<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.issue(path, expected("object", other));
                None
            }
        }
    }

    /// 필수 객체 필드
    pub(crate) fn required_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        let field = join(path, key);
        match obj.get(key) {
            None => {
                self.issue(field, "Required");
                None
            }
            Some(value) => self.object(value, &field),
        }
    }

    /// 선택 객체 필드. 없으면 `Ok(None)`, 타입이 틀리면 `Err(())`.
    pub(crate) fn optional_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Result<Option<&'v Map<String, Value>>, ()> {
        match obj.get(key) {
            None => Ok(None),
            Some(value) => self.object(value, &join(path, key)).map(Some).ok_or(()),
        }
    }

    /// 필수 문자열 필드
    pub(crate) fn required_str<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'v str> {
        let field = join(path, key);
        match obj.get(key) {
            None => {
                self.issue(field, "Required");
                None
            }
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                self.issue(field, expected("string", other));
                None
            }
        }
    }

    /// 선택 문자열 필드. 없으면 `Ok(None)`, 타입이 틀리면 `Err(())`.
    pub(crate) fn optional_str<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Result<Option<&'v str>, ()> {
        match obj.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => {
                self.issue(join(path, key), expected("string", other));
                Err(())
            }
        }
    }

    /// 필수 정수 필드 (소수부가 없는 숫자만 허용)
    pub(crate) fn required_integer(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<i64> {
        let field = join(path, key);
        match obj.get(key) {
            None => {
                self.issue(field, "Required");
                None
            }
            Some(Value::Number(n)) => {
                let parsed = n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                });
                if parsed.is_none() {
                    self.issue(field, "Expected integer, received float");
                }
                parsed
            }
            Some(other) => {
                self.issue(field, expected("number", other));
                None
            }
        }
    }

    /// 필수 열거형 문자열 필드
    pub(crate) fn required_enum<T>(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
        options: &[&str],
        convert: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = self.required_str(obj, path, key)?;
        self.enum_value(&join(path, key), raw, options, convert)
    }

    /// 이미 추출된 문자열을 열거형 값으로 검증합니다.
    pub(crate) fn enum_value<T>(
        &mut self,
        field: &str,
        raw: &str,
        options: &[&str],
        convert: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let value = convert(raw);
        if value.is_none() {
            let expected = options
                .iter()
                .map(|o| format!("'{o}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            self.issue(
                field,
                format!("Invalid enum value. Expected {expected}, received '{raw}'"),
            );
        }
        value
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// 이슈가 없으면 `Ok`, 있으면 이슈 목록을 반환합니다.
    pub(crate) fn finish(self) -> Result<(), Vec<ValidationIssue>> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self.issues)
        }
    }
}

/// 점 표기 필드 경로를 만듭니다.
pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

/// JSON 값의 타입 이름
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(kind: &str, actual: &Value) -> String {
    format!("Expected {kind}, received {}", type_name(actual))
}

/// 타임스탬프 문자열을 절대 시각으로 변환합니다.
///
/// RFC 3339를 먼저 시도하고, 공백 구분/오프셋 없는 형식(UTC로 간주)을 차례로 시도합니다.
pub(crate) fn parse_instant(input: &str) -> Result<DateTime<Utc>, ParseError> {
    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%z"];
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(ParseError::Timestamp {
        input: input.to_owned(),
        reason: "unrecognized timestamp format".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn missing_and_mistyped_fields_are_collected() {
        let value = json!({"name": 5, "pid": "x"});
        let mut check = SchemaCheck::new();
        let obj = check.object(&value, "").unwrap();
        assert!(check.required_str(obj, "meta", "name").is_none());
        assert!(check.required_integer(obj, "meta", "pid").is_none());
        assert!(check.required_str(obj, "meta", "process").is_none());

        let issues = check.finish().unwrap_err();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].path, "meta.name");
        assert_eq!(issues[0].message, "Expected string, received number");
        assert_eq!(issues[2].message, "Required");
    }

    #[test]
    fn non_object_is_form_error() {
        let mut check = SchemaCheck::new();
        assert!(check.object(&json!([1, 2]), "").is_none());
        let issues = check.finish().unwrap_err();
        assert_eq!(issues[0].path, "");
        assert_eq!(issues[0].message, "Expected object, received array");
    }

    #[test]
    fn integer_rejects_fractions() {
        let value = json!({"a": 3, "b": 3.0, "c": 3.5});
        let mut check = SchemaCheck::new();
        let obj = check.object(&value, "").unwrap();
        assert_eq!(check.required_integer(obj, "", "a"), Some(3));
        assert_eq!(check.required_integer(obj, "", "b"), Some(3));
        assert_eq!(check.required_integer(obj, "", "c"), None);
    }

    #[test]
    fn enum_issue_lists_options() {
        let value = json!({"level": "fatal"});
        let mut check = SchemaCheck::new();
        let obj = check.object(&value, "").unwrap();
        let level = check.required_enum(obj, "", "level", &["info", "warn"], |s| {
            (s == "info").then_some(())
        });
        assert!(level.is_none());
        let issues = check.finish().unwrap_err();
        assert!(issues[0].message.contains("'info' | 'warn'"));
        assert!(issues[0].message.contains("'fatal'"));
    }

    #[test]
    fn optional_fields() {
        let value = json!({"version": "1.2", "bad": 1});
        let mut check = SchemaCheck::new();
        let obj = check.object(&value, "").unwrap();
        assert_eq!(check.optional_str(obj, "", "version"), Ok(Some("1.2")));
        assert_eq!(check.optional_str(obj, "", "missing"), Ok(None));
        assert!(check.optional_str(obj, "", "bad").is_err());
        assert!(!check.is_clean());
    }

    #[test]
    fn parse_instant_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 13, 7, 30, 42).unwrap();
        assert_eq!(parse_instant("2025-03-13T07:30:42Z").unwrap(), expected);
        assert_eq!(parse_instant("2025-03-13T09:30:42+02:00").unwrap(), expected);
        assert_eq!(parse_instant("2025-03-13 07:30:42.000 +0000").unwrap(), expected);
        assert_eq!(parse_instant("2025-03-13T07:30:42").unwrap(), expected);
        assert!(parse_instant("yesterday").is_err());
    }
}
