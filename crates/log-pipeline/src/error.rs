//! 로그 파이프라인 에러 타입
//!
//! 두 계층의 에러가 있습니다.
//!
//! - [`LogPipelineError`]: 설정, 배치 로딩 등 라인 바깥에서 발생하는 에러.
//!   `From<LogPipelineError> for LogsiftError` 변환이 구현되어 있어
//!   상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//! - [`RecordError`]: 라인 단위 실패. 절대 `Err`로 전파되지 않고
//!   무효 레코드의 진단 문자열이 됩니다.

use logsift_core::error::{LogsiftError, PipelineError};
use logsift_core::event::FlattenedIssues;

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 파일 읽기 실패
    #[error("collector error: {path}: {reason}")]
    Collector {
        /// 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 태스크 join 실패
    #[error("task join error: {0}")]
    Join(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<LogPipelineError> for LogsiftError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Io(e) => LogsiftError::Io(e),
            other => LogsiftError::Pipeline(PipelineError::BatchLoad(other.to_string())),
        }
    }
}

/// 라인 단위 파싱 실패
///
/// `Display` 출력이 그대로 무효 레코드의 `error` 문자열이 됩니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Box 라인이 JSON이 아님
    #[error("JSON parsing failed: {0}")]
    JsonParse(String),

    /// JSON/문법은 맞지만 필드 제약 위반
    #[error("Schema validation failed:\n{}", .0.to_pretty_json())]
    SchemaValidation(FlattenedIssues),

    /// Syslog 라인이 고정 문법과 전혀 맞지 않음
    #[error("Syslog parse failed")]
    GrammarMismatch,

    /// 라인이 설정된 최대 길이를 초과
    #[error("Line too large: {size} bytes (max: {max})")]
    InputTooLarge {
        /// 라인 길이
        size: usize,
        /// 허용 최대 길이
        max: usize,
    },
}
