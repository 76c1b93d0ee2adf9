//! 로그 파싱 모듈 -- Box(JSON 라인), Syslog(고정 문법) 파서
//!
//! [`ParserRouter`]는 소스 분류 결과에 따라 해당 파서로 파일 내용을 라인 단위로 넘깁니다.
//! 각 파서는 core의 [`LineParser`](logsift_core::pipeline::LineParser) trait을 구현합니다.
//!
//! # 지원 형식
//! - Box: 라인마다 JSON 객체 하나 ([`BoxLogParser`])
//! - Syslog: 고정 문법 텍스트, Logger 태그 재해석 포함 ([`SyslogParser`])
//!
//! # 라인 규칙
//! - 비어 있지 않은 라인마다 정확히 레코드 하나
//! - 공백뿐인 라인은 버림 (라인 번호는 계속 증가)
//!
//! # 사용 예시
//! ```ignore
//! use logsift_pipeline::parser::ParserRouter;
//!
//! let router = ParserRouter::with_defaults()?;
//! let records = router.parse_text(LogSource::Syslog, batch_id, 0, &content, &sink);
//! ```

pub mod box_log;
pub mod logger;
pub(crate) mod schema;
pub mod syslog;

pub use box_log::BoxLogParser;
pub use syslog::SyslogParser;

use metrics::counter;
use uuid::Uuid;

use logsift_core::event::{ValidationDiagnostic, ValidationIssue};
use logsift_core::metrics as m;
use logsift_core::pipeline::{DiagnosticSink, LineParser};
use logsift_core::types::{LogRecord, LogSource, RecordId};

use crate::config::PipelineConfig;
use crate::error::LogPipelineError;

/// 파서 기본 최대 입력 크기 (1MB)
pub(crate) const DEFAULT_MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Box 스키마 검증 단계
pub const STAGE_BOX: &str = "box";
/// Syslog 스키마 검증 단계
pub const STAGE_SYSLOG: &str = "syslog";
/// Logger 메시지 재해석 단계
pub const STAGE_LOGGER: &str = "logger";
/// ReceptionistInternal params 검증 단계
pub const STAGE_RECEPTIONIST_PARAMS: &str = "receptionist_params";

/// 검증 실패를 메트릭에 기록하고 진단 싱크로 보고합니다.
pub(crate) fn report_failure(
    sink: &dyn DiagnosticSink,
    source: LogSource,
    stage: &'static str,
    raw_line: &str,
    issues: &[ValidationIssue],
) -> ValidationDiagnostic {
    counter!(m::VALIDATION_FAILURES_TOTAL, m::LABEL_STAGE => stage).increment(1);
    let diagnostic = ValidationDiagnostic::new(source, stage, raw_line, issues);
    sink.report(diagnostic.clone());
    diagnostic
}

/// 파서 라우터 -- 소스별로 등록된 파서를 선택합니다.
pub struct ParserRouter {
    /// 등록된 파서 목록
    parsers: Vec<Box<dyn LineParser>>,
}

impl ParserRouter {
    /// 빈 라우터를 생성합니다.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// 기본 파서 세트 (Box + Syslog)로 라우터를 생성합니다.
    pub fn with_defaults() -> Result<Self, LogPipelineError> {
        Self::from_config(&PipelineConfig::default())
    }

    /// 설정의 라인 길이 제한을 적용한 기본 파서 세트로 라우터를 생성합니다.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, LogPipelineError> {
        Ok(Self::new()
            .register(Box::new(
                BoxLogParser::new().with_max_input_size(config.max_line_bytes),
            ))
            .register(Box::new(
                SyslogParser::new()?.with_max_input_size(config.max_line_bytes),
            )))
    }

    /// 파서를 등록합니다. 같은 소스의 파서가 이미 있으면 교체합니다.
    pub fn register(mut self, parser: Box<dyn LineParser>) -> Self {
        self.parsers.retain(|p| p.source() != parser.source());
        self.parsers.push(parser);
        self
    }

    /// 소스를 담당하는 파서를 찾습니다.
    pub fn parser_for(&self, source: LogSource) -> Option<&dyn LineParser> {
        self.parsers
            .iter()
            .find(|p| p.source() == source)
            .map(|p| p.as_ref())
    }

    /// 등록된 소스 목록을 반환합니다.
    pub fn registered_sources(&self) -> Vec<LogSource> {
        self.parsers.iter().map(|p| p.source()).collect()
    }

    /// 파일 내용 전체를 라인 단위로 파싱합니다.
    ///
    /// 담당 파서가 없는 소스(예: Dmesg)는 레코드를 만들지 않습니다.
    pub fn parse_text(
        &self,
        source: LogSource,
        batch: Uuid,
        file: usize,
        content: &str,
        sink: &dyn DiagnosticSink,
    ) -> Vec<LogRecord> {
        let Some(parser) = self.parser_for(source) else {
            tracing::debug!(source = source.as_str(), "no parser registered for source");
            return Vec::new();
        };

        let records: Vec<LogRecord> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_no, line)| {
                let id = RecordId {
                    batch,
                    file,
                    line: line_no,
                };
                parser.parse_line(id, line, sink)
            })
            .collect();

        let invalid = records.iter().filter(|r| !r.is_valid()).count();
        let valid = records.len() - invalid;
        counter!(m::RECORDS_PARSED_TOTAL, m::LABEL_SOURCE => source.as_str(), m::LABEL_RESULT => "valid")
            .increment(valid as u64);
        counter!(m::RECORDS_PARSED_TOTAL, m::LABEL_SOURCE => source.as_str(), m::LABEL_RESULT => "invalid")
            .increment(invalid as u64);

        records
    }
}

impl Default for ParserRouter {
    fn default() -> Self {
        Self::new()
    }
}
