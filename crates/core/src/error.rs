//! 에러 타입: 도메인별 에러 정의

/// logsift 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogsiftError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 배치 로딩 실패 (태스크 join 실패 등)
    #[error("batch load failed: {0}")]
    BatchLoad(String),

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),
}

/// 파싱 에러
///
/// 라인 단위 파싱 실패는 무효 레코드로 흡수되므로, 이 타입은
/// 라인 바깥의 입력(날짜 범위, 필터 라벨 등) 해석 실패에 사용됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 지원하지 않는 값
    #[error("unsupported value: {0}")]
    Unsupported(String),

    /// 타임스탬프 해석 실패
    #[error("invalid timestamp '{input}': {reason}")]
    Timestamp { input: String, reason: String },
}
