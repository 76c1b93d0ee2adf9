//! Syslog 파서
//!
//! 고정 순서 필드를 공백으로 구분한 텍스트 syslog 라인을 파싱합니다.
//!
//! # 문법
//! ```text
//! TIMESTAMP                      PID   TID   LEVEL TAG: MESSAGE
//! 2025-03-13 07:30:42.035 +0000  3572  3583  D     WificondControl: Scan result ready event
//! ```
//!
//! - TIMESTAMP: `YYYY-MM-DD HH:MM:SS.mmm ±HHMM`
//! - PID / TID: 숫자
//! - LEVEL: 대문자 한 글자 (스키마상 `V`, `D`, `I`, `W`, `E`만 유효)
//! - TAG: 콜론이 아닌 문자열, 바로 뒤에 콜론
//! - MESSAGE: 라인의 나머지 (비어 있을 수 있음)
//!
//! 태그가 `Logger`이면 메시지를 JSON으로 재해석합니다 ([`logger`](super::logger) 참고).
//!
//! # 사용 예시
//! ```ignore
//! use logsift_core::pipeline::{LineParser, NullSink};
//! use logsift_pipeline::parser::SyslogParser;
//!
//! let parser = SyslogParser::new()?;
//! let record = parser.parse_line(id, line, &NullSink);
//! ```

use chrono::{DateTime, Utc};
use regex::Regex;

use logsift_core::pipeline::{DiagnosticSink, LineParser};
use logsift_core::types::{
    LogRecord, LogSource, RecordId, StructuredEntry, SyslogEntry, SyslogLevel, SyslogMeta,
};

use super::logger::{LOGGER_TAG, reinterpret};
use super::schema::SchemaCheck;
use super::{DEFAULT_MAX_INPUT_SIZE, STAGE_SYSLOG, report_failure};
use crate::error::{LogPipelineError, RecordError};

/// 라인 문법 패턴
const SYSLOG_PATTERN: &str = r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3} [+-]\d{4})\s+(\d+)\s+(\d+)\s+([A-Z])\s+([^:]+):\s?(.*)$";

/// 타임스탬프 형식 (chrono)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

const SYSLOG_LEVELS: &[&str] = &["D", "I", "W", "E", "V"];

/// 문법 매칭으로 추출한 필드 (검증 전)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogFields<'a> {
    pub timestamp: &'a str,
    pub pid: &'a str,
    pub tid: &'a str,
    pub level: &'a str,
    /// 앞뒤 공백을 제거한 태그
    pub tag: &'a str,
    pub message: &'a str,
}

/// Syslog 파서
///
/// core의 [`LineParser`] trait을 구현합니다. 라인 하나에 항상 레코드 하나를 만듭니다.
pub struct SyslogParser {
    /// 컴파일된 라인 문법
    grammar: Regex,
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl SyslogParser {
    /// 기본 설정으로 새 파서를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Ok(Self {
            grammar: Regex::new(SYSLOG_PATTERN)?,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        })
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// 라인을 문법과 매칭하여 필드를 추출합니다. 맞지 않으면 `None`.
    pub fn match_fields<'a>(&self, line: &'a str) -> Option<SyslogFields<'a>> {
        let caps = self.grammar.captures(line)?;
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        Some(SyslogFields {
            timestamp: field(1),
            pid: field(2),
            tid: field(3),
            level: field(4),
            tag: field(5).trim(),
            message: field(6),
        })
    }

    fn parse_entry(&self, line: &str, sink: &dyn DiagnosticSink) -> Result<SyslogEntry, RecordError> {
        if line.len() > self.max_input_size {
            return Err(RecordError::InputTooLarge {
                size: line.len(),
                max: self.max_input_size,
            });
        }

        let fields = self.match_fields(line).ok_or(RecordError::GrammarMismatch)?;

        let mut name = fields.tag.to_owned();
        let mut message = fields.message.to_owned();
        if name == LOGGER_TAG {
            reinterpret(&mut name, &mut message, line, sink);
        }

        let mut check = SchemaCheck::new();
        let level = check.enum_value("level", fields.level, SYSLOG_LEVELS, SyslogLevel::from_code);
        let pid = parse_integer(&mut check, "meta.pid", fields.pid);
        let tid = parse_integer(&mut check, "meta.tid", fields.tid);

        match (level, pid, tid, check.finish()) {
            (Some(level), Some(pid), Some(tid), Ok(())) => Ok(SyslogEntry {
                level,
                message,
                meta: SyslogMeta {
                    name,
                    tid,
                    pid,
                    time_logged: parse_timestamp(fields.timestamp),
                },
            }),
            (_, _, _, Err(issues)) => {
                let diagnostic = report_failure(sink, LogSource::Syslog, STAGE_SYSLOG, line, &issues);
                Err(RecordError::SchemaValidation(diagnostic.issues))
            }
            _ => Err(RecordError::GrammarMismatch),
        }
    }
}

impl LineParser for SyslogParser {
    fn source(&self) -> LogSource {
        LogSource::Syslog
    }

    fn parse_line(&self, id: RecordId, line: &str, sink: &dyn DiagnosticSink) -> LogRecord {
        match self.parse_entry(line, sink) {
            Ok(entry) => {
                LogRecord::valid(id, LogSource::Syslog, line, StructuredEntry::Syslog(entry))
            }
            Err(err) => LogRecord::invalid(id, LogSource::Syslog, line, err.to_string()),
        }
    }
}

fn parse_integer(check: &mut SchemaCheck, field: &str, digits: &str) -> Option<i64> {
    match digits.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => {
            check.issue(field, format!("Expected integer: {e}"));
            None
        }
    }
}

/// 고정 형식 타임스탬프를 절대 시각으로 변환합니다.
///
/// 문법은 맞지만 달력상 불가능한 값(예: 13월)이면 `None`입니다.
fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(timestamp, error = %e, "syslog timestamp is not a valid instant");
            None
        }
    }
}
