//! Box 로그 파서
//!
//! 각 라인이 독립된 JSON 객체인 Box 형식을 파싱합니다.
//!
//! # 처리 단계
//! 1. 일반 JSON 값으로 파싱 -- 실패 시 `"JSON parsing failed: ..."` 무효 레코드
//! 2. Box 스키마 검증 -- 실패 시 `"Schema validation failed:\n{...}"` 무효 레코드 + 진단 싱크 보고
//! 3. `meta.time_logged` 문자열을 절대 시각으로 변환하여 유효 레코드 생성
//!
//! # 스키마
//! ```text
//! {
//!   error?: { code?: string, message: string, stack: string },
//!   level: "verbose" | "info" | "error" | "warn",
//!   message: string,
//!   meta: { mac_address, name, org_id: string, pid: integer, process: string,
//!           time_logged: string, version?: string },
//!   payload?: any
//! }
//! ```
//!
//! # 사용 예시
//! ```ignore
//! use logsift_core::pipeline::{LineParser, NullSink};
//! use logsift_pipeline::parser::BoxLogParser;
//!
//! let parser = BoxLogParser::new();
//! let record = parser.parse_line(id, line, &NullSink);
//! ```

use serde_json::{Map, Value};

use logsift_core::event::ValidationIssue;
use logsift_core::pipeline::{DiagnosticSink, LineParser};
use logsift_core::types::{
    BoxCrash, BoxEntry, BoxLevel, BoxMeta, LogRecord, LogSource, RecordId, StructuredEntry,
};

use super::schema::{SchemaCheck, parse_instant};
use super::{DEFAULT_MAX_INPUT_SIZE, STAGE_BOX, report_failure};
use crate::error::RecordError;

const BOX_LEVELS: &[&str] = &["verbose", "info", "error", "warn"];

/// Box 로그 파서
///
/// core의 [`LineParser`] trait을 구현합니다. 라인 하나에 항상 레코드 하나를 만듭니다.
pub struct BoxLogParser {
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl BoxLogParser {
    /// 기본 설정으로 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// 라인을 Box 엔트리로 파싱합니다.
    ///
    /// 스키마 검증 실패는 진단 싱크에도 보고됩니다.
    fn parse_entry(&self, line: &str, sink: &dyn DiagnosticSink) -> Result<BoxEntry, RecordError> {
        if line.len() > self.max_input_size {
            return Err(RecordError::InputTooLarge {
                size: line.len(),
                max: self.max_input_size,
            });
        }

        let value: Value =
            serde_json::from_str(line).map_err(|e| RecordError::JsonParse(e.to_string()))?;

        validate_box(&value).map_err(|issues| {
            let diagnostic = report_failure(sink, LogSource::Box, STAGE_BOX, line, &issues);
            RecordError::SchemaValidation(diagnostic.issues)
        })
    }
}

impl Default for BoxLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for BoxLogParser {
    fn source(&self) -> LogSource {
        LogSource::Box
    }

    fn parse_line(&self, id: RecordId, line: &str, sink: &dyn DiagnosticSink) -> LogRecord {
        match self.parse_entry(line, sink) {
            Ok(entry) => LogRecord::valid(id, LogSource::Box, line, StructuredEntry::Box(entry)),
            Err(err) => LogRecord::invalid(id, LogSource::Box, line, err.to_string()),
        }
    }
}

/// JSON 값을 Box 스키마로 검증하여 엔트리를 만듭니다.
fn validate_box(value: &Value) -> Result<BoxEntry, Vec<ValidationIssue>> {
    let mut check = SchemaCheck::new();

    let Some(obj) = check.object(value, "") else {
        return Err(check.finish().err().unwrap_or_default());
    };

    let error = match check.optional_object(obj, "", "error") {
        Ok(Some(crash)) => box_crash(&mut check, crash),
        _ => None,
    };
    let level = check.required_enum(obj, "", "level", BOX_LEVELS, BoxLevel::from_code);
    let message = check.required_str(obj, "", "message");
    let meta = check
        .required_object(obj, "", "meta")
        .and_then(|meta| box_meta(&mut check, meta));
    let payload = obj.get("payload").cloned();

    match (level, message, meta, check.finish()) {
        (Some(level), Some(message), Some(meta), Ok(())) => Ok(BoxEntry {
            level,
            message: message.to_owned(),
            meta,
            payload,
            error,
        }),
        (_, _, _, Err(issues)) => Err(issues),
        _ => Err(vec![ValidationIssue::new("", "Invalid input")]),
    }
}

fn box_crash(check: &mut SchemaCheck, crash: &Map<String, Value>) -> Option<BoxCrash> {
    let code = check.optional_str(crash, "error", "code").ok().flatten();
    let message = check.required_str(crash, "error", "message");
    let stack = check.required_str(crash, "error", "stack");

    Some(BoxCrash {
        code: code.map(str::to_owned),
        message: message?.to_owned(),
        stack: stack?.to_owned(),
    })
}

fn box_meta(check: &mut SchemaCheck, meta: &Map<String, Value>) -> Option<BoxMeta> {
    let mac_address = check.required_str(meta, "meta", "mac_address");
    let name = check.required_str(meta, "meta", "name");
    let org_id = check.required_str(meta, "meta", "org_id");
    let pid = check.required_integer(meta, "meta", "pid");
    let process = check.required_str(meta, "meta", "process");
    let time_logged = check.required_str(meta, "meta", "time_logged");
    let version = check.optional_str(meta, "meta", "version").ok().flatten();

    let time_logged = time_logged?;
    let instant = match parse_instant(time_logged) {
        Ok(instant) => Some(instant),
        Err(e) => {
            tracing::debug!(error = %e, "box time_logged is not a recognizable instant");
            None
        }
    };

    Some(BoxMeta {
        mac_address: mac_address?.to_owned(),
        name: name?.to_owned(),
        org_id: org_id?.to_owned(),
        pid: pid?,
        process: process?.to_owned(),
        time_logged: instant,
        version: version.map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use logsift_core::pipeline::NullSink;
    use uuid::Uuid;

    use crate::diagnostics::CollectingSink;

    const VALID: &str = r#"{"level":"info","message":"socket connected","meta":{"mac_address":"00:11:22:33:44:55","name":"manager","org_id":"org-1","pid":1234,"process":"box","time_logged":"2025-03-13T07:30:42.000Z","version":"2.4.1"},"payload":{"room":7}}"#;

    fn id() -> RecordId {
        RecordId {
            batch: Uuid::nil(),
            file: 0,
            line: 0,
        }
    }

    #[test]
    fn source_is_box() {
        assert_eq!(BoxLogParser::new().source(), LogSource::Box);
    }

    #[test]
    fn parse_valid_line() {
        let record = BoxLogParser::new().parse_line(id(), VALID, &NullSink);
        assert!(record.is_valid());
        let Some(StructuredEntry::Box(entry)) = record.parsed() else {
            panic!("expected box entry");
        };
        assert_eq!(entry.level, BoxLevel::Info);
        assert_eq!(entry.message, "socket connected");
        assert_eq!(entry.meta.pid, 1234);
        assert_eq!(entry.meta.version.as_deref(), Some("2.4.1"));
        assert_eq!(
            entry.meta.time_logged,
            Utc.with_ymd_and_hms(2025, 3, 13, 7, 30, 42).single()
        );
        assert_eq!(entry.payload, Some(serde_json::json!({"room": 7})));
        assert!(entry.error.is_none());
        assert_eq!(record.raw_line(), VALID);
    }

    #[test]
    fn malformed_json_is_invalid_record() {
        let sink = CollectingSink::new();
        let record = BoxLogParser::new().parse_line(id(), "{not json", &sink);
        assert!(!record.is_valid());
        assert!(record.error().unwrap().starts_with("JSON parsing failed"));
        assert!(sink.is_empty());
    }

    #[test]
    fn schema_failure_is_reported_and_embedded() {
        let sink = CollectingSink::new();
        let line = r#"{"level":"fatal","message":"x","meta":{"name":"manager"}}"#;
        let record = BoxLogParser::new().parse_line(id(), line, &sink);

        let error = record.error().unwrap();
        assert!(error.starts_with("Schema validation failed"));
        assert!(error.contains("meta.pid"));
        assert!(error.contains("level"));

        let diagnostics = sink.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].stage, STAGE_BOX);
        assert_eq!(diagnostics[0].raw_line, line);
        assert!(diagnostics[0].issues.field_errors.contains_key("meta.mac_address"));
    }

    #[test]
    fn non_object_json_is_form_error() {
        let record = BoxLogParser::new().parse_line(id(), "[1,2,3]", &NullSink);
        let error = record.error().unwrap();
        assert!(error.contains("formErrors"));
        assert!(error.contains("Expected object, received array"));
    }

    #[test]
    fn crash_entry_is_parsed() {
        let line = r#"{"error":{"code":"E_CRASH","message":"boom","stack":"at main"},"level":"error","message":"uncaught","meta":{"mac_address":"m","name":"manager","org_id":"o","pid":1,"process":"box","time_logged":"2025-03-13T07:30:42Z"}}"#;
        let record = BoxLogParser::new().parse_line(id(), line, &NullSink);
        let Some(StructuredEntry::Box(entry)) = record.parsed() else {
            panic!("expected box entry");
        };
        let crash = entry.error.as_ref().unwrap();
        assert_eq!(crash.code.as_deref(), Some("E_CRASH"));
        assert_eq!(crash.stack, "at main");
    }

    #[test]
    fn crash_without_stack_is_schema_failure() {
        let line = r#"{"error":{"message":"boom"},"level":"error","message":"uncaught","meta":{"mac_address":"m","name":"manager","org_id":"o","pid":1,"process":"box","time_logged":"2025-03-13T07:30:42Z"}}"#;
        let record = BoxLogParser::new().parse_line(id(), line, &NullSink);
        assert!(record.error().unwrap().contains("error.stack"));
    }

    #[test]
    fn unparseable_timestamp_keeps_record_valid() {
        let line = VALID.replace("2025-03-13T07:30:42.000Z", "not a time");
        let record = BoxLogParser::new().parse_line(id(), &line, &NullSink);
        assert!(record.is_valid());
        assert!(record.instant().is_none());
    }

    #[test]
    fn too_large_input_is_invalid() {
        let record = BoxLogParser::new()
            .with_max_input_size(10)
            .parse_line(id(), VALID, &NullSink);
        assert!(record.error().unwrap().starts_with("Line too large"));
    }
}
