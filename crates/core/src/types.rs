//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 두 가지 장치 로그 형식(Box, Syslog)을 하나의 정규화된 레코드 모델로 통합합니다.
//! 파서는 라인마다 정확히 하나의 [`LogRecord`]를 만들고, 필터/검색 엔진은
//! 이 레코드를 읽기 전용으로 소비합니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 로그 소스
///
/// `Dmesg`는 필터에서 선택 가능한 예약 값이며, 현재 이 값으로 분류되는 파일은 없습니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LogSource {
    /// 라인마다 JSON 객체 하나인 Box 로그
    Box,
    /// 고정 문법의 텍스트 syslog
    Syslog,
    /// 예약됨 (파서 없음)
    Dmesg,
}

impl LogSource {
    /// 문자열에서 소스를 파싱합니다. 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "box" => Some(Self::Box),
            "syslog" => Some(Self::Syslog),
            "dmesg" => Some(Self::Dmesg),
            _ => None,
        }
    }

    /// 소문자 식별자 (레코드 ID, 메트릭 레이블에 사용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Syslog => "syslog",
            Self::Dmesg => "dmesg",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box => write!(f, "Box"),
            Self::Syslog => write!(f, "Syslog"),
            Self::Dmesg => write!(f, "Dmesg"),
        }
    }
}

/// 레코드 고유 식별자
///
/// 배치 ID + 배치 내 파일 순번 + 파일 내 라인 번호로 구성됩니다.
/// 새 배치는 새 UUID를 받으므로 세션 내에서 재사용되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    /// 로드 배치 ID
    pub batch: Uuid,
    /// 배치 내 파일 순번 (제출 순서)
    pub file: usize,
    /// 파일 내 0 기반 라인 번호 (빈 라인 포함)
    pub line: usize,
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.batch.simple(), self.file, self.line)
    }
}

/// Box 로그 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxLevel {
    Verbose,
    Info,
    Warn,
    Error,
}

impl BoxLevel {
    /// 와이어 코드 (`"verbose"`, `"info"`, `"warn"`, `"error"`)에서 변환합니다.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "verbose" => Some(Self::Verbose),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Syslog 로그 레벨 (한 글자 코드)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyslogLevel {
    V,
    D,
    I,
    W,
    E,
}

impl SyslogLevel {
    /// 와이어 코드 (`"V"`, `"D"`, `"I"`, `"W"`, `"E"`)에서 변환합니다.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "V" => Some(Self::V),
            "D" => Some(Self::D),
            "I" => Some(Self::I),
            "W" => Some(Self::W),
            "E" => Some(Self::E),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::V => "V",
            Self::D => "D",
            Self::I => "I",
            Self::W => "W",
            Self::E => "E",
        }
    }
}

/// 소스에 종속된 구체 레벨 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelCode {
    Box(BoxLevel),
    Syslog(SyslogLevel),
}

impl LevelCode {
    /// 표시용 레벨 라벨을 반환합니다.
    ///
    /// Syslog `D`만 "Debug"이고, Box `verbose`와 Syslog `V`는 "Verbose"입니다.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Box(BoxLevel::Verbose) | Self::Syslog(SyslogLevel::V) => "Verbose",
            Self::Syslog(SyslogLevel::D) => "Debug",
            Self::Box(BoxLevel::Info) | Self::Syslog(SyslogLevel::I) => "Info",
            Self::Box(BoxLevel::Warn) | Self::Syslog(SyslogLevel::W) => "Warning",
            Self::Box(BoxLevel::Error) | Self::Syslog(SyslogLevel::E) => "Error",
        }
    }

    /// 와이어 코드 문자열
    pub fn code(&self) -> &'static str {
        match self {
            Self::Box(level) => level.code(),
            Self::Syslog(level) => level.code(),
        }
    }

    /// 이 코드를 포함하는 심각도 필터 라벨
    pub fn severity(&self) -> SeverityLabel {
        match self {
            Self::Box(BoxLevel::Error) | Self::Syslog(SyslogLevel::E) => SeverityLabel::Error,
            Self::Box(BoxLevel::Warn) | Self::Syslog(SyslogLevel::W) => SeverityLabel::Warning,
            Self::Box(BoxLevel::Info) | Self::Syslog(SyslogLevel::I) => SeverityLabel::Info,
            Self::Box(BoxLevel::Verbose) | Self::Syslog(SyslogLevel::V | SyslogLevel::D) => {
                SeverityLabel::Debug
            }
        }
    }
}

impl fmt::Display for LevelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 심각도 필터 라벨
///
/// 사용자가 선택하는 라벨이며, 두 소스 형식의 구체 레벨 코드로 확장됩니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SeverityLabel {
    Error,
    Warning,
    Info,
    Debug,
}

impl SeverityLabel {
    /// 문자열에서 라벨을 파싱합니다. 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" | "e" => Some(Self::Error),
            "warning" | "warn" | "w" => Some(Self::Warning),
            "info" | "i" => Some(Self::Info),
            "debug" | "verbose" | "d" | "v" => Some(Self::Debug),
            _ => None,
        }
    }

    /// 이 라벨이 포함하는 구체 레벨 코드 목록
    pub fn codes(&self) -> &'static [LevelCode] {
        match self {
            Self::Error => &[
                LevelCode::Box(BoxLevel::Error),
                LevelCode::Syslog(SyslogLevel::E),
            ],
            Self::Warning => &[
                LevelCode::Box(BoxLevel::Warn),
                LevelCode::Syslog(SyslogLevel::W),
            ],
            Self::Info => &[
                LevelCode::Box(BoxLevel::Info),
                LevelCode::Syslog(SyslogLevel::I),
            ],
            Self::Debug => &[
                LevelCode::Box(BoxLevel::Verbose),
                LevelCode::Syslog(SyslogLevel::V),
                LevelCode::Syslog(SyslogLevel::D),
            ],
        }
    }
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Info => write!(f, "Info"),
            Self::Debug => write!(f, "Debug"),
        }
    }
}

/// Box 엔트리 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxMeta {
    pub mac_address: String,
    pub name: String,
    pub org_id: String,
    pub pid: i64,
    pub process: String,
    /// `time_logged` 문자열에서 복원한 시각. 해석 불가한 문자열이면 `None`.
    pub time_logged: Option<DateTime<Utc>>,
    pub version: Option<String>,
}

/// 크래시 형태 Box 엔트리에 포함되는 중첩 진단 객체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxCrash {
    pub code: Option<String>,
    pub message: String,
    pub stack: String,
}

/// Box 형식 구조화 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxEntry {
    pub level: BoxLevel,
    pub message: String,
    pub meta: BoxMeta,
    /// 불투명 페이로드 (형식 검증 없음)
    pub payload: Option<serde_json::Value>,
    pub error: Option<BoxCrash>,
}

/// Syslog 엔트리 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyslogMeta {
    pub name: String,
    pub tid: i64,
    pub pid: i64,
    pub time_logged: Option<DateTime<Utc>>,
}

/// Syslog 형식 구조화 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyslogEntry {
    pub level: SyslogLevel,
    pub message: String,
    pub meta: SyslogMeta,
}

/// 소스별 구조화 엔트리 (태그드 유니온)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum StructuredEntry {
    Box(BoxEntry),
    Syslog(SyslogEntry),
}

impl StructuredEntry {
    pub fn level(&self) -> LevelCode {
        match self {
            Self::Box(entry) => LevelCode::Box(entry.level),
            Self::Syslog(entry) => LevelCode::Syslog(entry.level),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Box(entry) => &entry.message,
            Self::Syslog(entry) => &entry.message,
        }
    }

    /// `meta.name` (서비스/태그 이름)
    pub fn name(&self) -> &str {
        match self {
            Self::Box(entry) => &entry.meta.name,
            Self::Syslog(entry) => &entry.meta.name,
        }
    }

    pub fn time_logged(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Box(entry) => entry.meta.time_logged,
            Self::Syslog(entry) => entry.meta.time_logged,
        }
    }
}

/// 레코드 본문: 유효하면 구조화 엔트리, 아니면 진단 문자열
#[derive(Debug, Clone, PartialEq)]
enum RecordBody {
    Valid(StructuredEntry),
    Invalid(String),
}

/// 정규화된 로그 레코드
///
/// 생성 시점에 `id`와 `source`가 확정되며 이후 변경할 수 없습니다.
/// `is_valid()`가 참이면 `parsed()`만, 거짓이면 `error()`만 값을 가집니다.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    id: RecordId,
    source: LogSource,
    raw_line: String,
    body: RecordBody,
}

impl LogRecord {
    /// 유효 레코드를 생성합니다.
    pub fn valid(
        id: RecordId,
        source: LogSource,
        raw_line: impl Into<String>,
        entry: StructuredEntry,
    ) -> Self {
        Self {
            id,
            source,
            raw_line: raw_line.into(),
            body: RecordBody::Valid(entry),
        }
    }

    /// 진단 메시지를 담은 무효 레코드를 생성합니다.
    pub fn invalid(
        id: RecordId,
        source: LogSource,
        raw_line: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source,
            raw_line: raw_line.into(),
            body: RecordBody::Invalid(error.into()),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn source(&self) -> LogSource {
        self.source
    }

    /// 원본 라인 (항상 그대로 보존)
    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.body, RecordBody::Valid(_))
    }

    pub fn parsed(&self) -> Option<&StructuredEntry> {
        match &self.body {
            RecordBody::Valid(entry) => Some(entry),
            RecordBody::Invalid(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.body {
            RecordBody::Valid(_) => None,
            RecordBody::Invalid(error) => Some(error),
        }
    }

    /// 정렬/날짜 필터에 사용하는 절대 시각
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.parsed().and_then(StructuredEntry::time_logged)
    }

    /// 유효 레코드의 구체 레벨 코드
    pub fn level(&self) -> Option<LevelCode> {
        self.parsed().map(StructuredEntry::level)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            RecordBody::Valid(entry) => write!(
                f,
                "[{}] {} {}: {}",
                entry.level().label(),
                self.source,
                entry.name(),
                entry.message(),
            ),
            RecordBody::Invalid(_) => write!(f, "[UNSUPPORTED FORMAT] {}", self.raw_line),
        }
    }
}

/// 직렬화 형태: `{id, source, valid, raw_line, parsed?, error?}`
#[derive(Serialize)]
struct RecordView<'a> {
    id: String,
    source: LogSource,
    valid: bool,
    raw_line: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parsed: Option<&'a StructuredEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for LogRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RecordView {
            id: self.id.to_string(),
            source: self.source,
            valid: self.is_valid(),
            raw_line: &self.raw_line,
            parsed: self.parsed(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn id(line: usize) -> RecordId {
        RecordId {
            batch: Uuid::nil(),
            file: 0,
            line,
        }
    }

    fn syslog_entry() -> StructuredEntry {
        StructuredEntry::Syslog(SyslogEntry {
            level: SyslogLevel::D,
            message: "Scan result ready event".to_owned(),
            meta: SyslogMeta {
                name: "WificondControl".to_owned(),
                tid: 3583,
                pid: 3572,
                time_logged: Utc.with_ymd_and_hms(2025, 3, 13, 7, 30, 42).single(),
            },
        })
    }

    #[test]
    fn valid_record_has_parsed_and_no_error() {
        let record = LogRecord::valid(id(0), LogSource::Syslog, "raw", syslog_entry());
        assert!(record.is_valid());
        assert!(record.parsed().is_some());
        assert!(record.error().is_none());
        assert!(record.instant().is_some());
        assert_eq!(record.level(), Some(LevelCode::Syslog(SyslogLevel::D)));
    }

    #[test]
    fn invalid_record_has_error_and_no_parsed() {
        let record = LogRecord::invalid(id(1), LogSource::Box, "{", "JSON parsing failed");
        assert!(!record.is_valid());
        assert!(record.parsed().is_none());
        assert_eq!(record.error(), Some("JSON parsing failed"));
        assert!(record.instant().is_none());
        assert!(record.level().is_none());
    }

    #[test]
    fn severity_labels_span_both_formats() {
        assert!(
            SeverityLabel::Warning
                .codes()
                .contains(&LevelCode::Box(BoxLevel::Warn))
        );
        assert!(
            SeverityLabel::Warning
                .codes()
                .contains(&LevelCode::Syslog(SyslogLevel::W))
        );
        assert_eq!(SeverityLabel::Debug.codes().len(), 3);
    }

    #[test]
    fn severity_is_inverse_of_codes() {
        for label in [
            SeverityLabel::Error,
            SeverityLabel::Warning,
            SeverityLabel::Info,
            SeverityLabel::Debug,
        ] {
            for code in label.codes() {
                assert_eq!(code.severity(), label);
            }
        }
    }

    #[test]
    fn level_labels() {
        assert_eq!(LevelCode::Syslog(SyslogLevel::D).label(), "Debug");
        assert_eq!(LevelCode::Box(BoxLevel::Verbose).label(), "Verbose");
        assert_eq!(LevelCode::Box(BoxLevel::Warn).label(), "Warning");
    }

    #[test]
    fn source_from_str_loose() {
        assert_eq!(LogSource::from_str_loose("SYSLOG"), Some(LogSource::Syslog));
        assert_eq!(LogSource::from_str_loose("journald"), None);
    }

    #[test]
    fn record_serializes_valid_flag_and_omits_missing_fields() {
        let record = LogRecord::invalid(id(2), LogSource::Box, "oops", "JSON parsing failed");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["source"], "Box");
        assert!(json.get("parsed").is_none());
        assert_eq!(json["error"], "JSON parsing failed");
    }

    #[test]
    fn record_id_display_is_unique_per_line() {
        assert_ne!(id(1).to_string(), id(2).to_string());
    }
}
