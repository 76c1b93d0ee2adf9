//! 로그 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`LogsiftConfig`](logsift_core::config::LogsiftConfig)를
//! 기반으로 파이프라인 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use logsift_core::config::LogsiftConfig;
//! use logsift_pipeline::config::PipelineConfig;
//!
//! let core_config = LogsiftConfig::default();
//! let config = PipelineConfig::from_core(&core_config);
//! ```

use serde::{Deserialize, Serialize};

use logsift_core::config::LogsiftConfig;

use crate::error::LogPipelineError;
use crate::search::SearchMode;

/// 로그 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 라인 최대 길이 (바이트)
    pub max_line_bytes: usize,
    /// 동시에 읽을 최대 파일 수
    pub max_concurrent_reads: usize,
    /// Box 분류 패턴 (대소문자 무시 부분 문자열)
    pub box_pattern: String,
    /// Syslog 분류 패턴 (대소문자 무시 부분 문자열)
    pub syslog_pattern: String,
    /// 검색 표시 모드 기본값
    pub search_mode: SearchMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 1024 * 1024,
            max_concurrent_reads: 16,
            box_pattern: "box".to_owned(),
            syslog_pattern: "syslog".to_owned(),
            search_mode: SearchMode::Highlight,
        }
    }
}

impl PipelineConfig {
    /// core의 `LogsiftConfig`에서 파이프라인 설정을 생성합니다.
    ///
    /// 알 수 없는 검색 모드 문자열은 기본값(highlight)으로 대체됩니다.
    pub fn from_core(core: &LogsiftConfig) -> Self {
        Self {
            max_line_bytes: core.ingest.max_line_bytes,
            max_concurrent_reads: core.ingest.max_concurrent_reads,
            box_pattern: core.ingest.box_pattern.clone(),
            syslog_pattern: core.ingest.syslog_pattern.clone(),
            search_mode: SearchMode::from_str_loose(&core.search.mode).unwrap_or_default(),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        const MAX_CONCURRENT_READS: usize = 1024;

        if self.max_line_bytes == 0 {
            return Err(LogPipelineError::Config {
                field: "max_line_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        if self.max_concurrent_reads == 0 || self.max_concurrent_reads > MAX_CONCURRENT_READS {
            return Err(LogPipelineError::Config {
                field: "max_concurrent_reads".to_owned(),
                reason: format!("must be 1-{}", MAX_CONCURRENT_READS),
            });
        }

        if self.box_pattern.trim().is_empty() {
            return Err(LogPipelineError::Config {
                field: "box_pattern".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.syslog_pattern.trim().is_empty() {
            return Err(LogPipelineError::Config {
                field: "syslog_pattern".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 라인 최대 길이를 설정합니다.
    pub fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.config.max_line_bytes = bytes;
        self
    }

    /// 동시 읽기 파일 수를 설정합니다.
    pub fn max_concurrent_reads(mut self, reads: usize) -> Self {
        self.config.max_concurrent_reads = reads;
        self
    }

    /// Box 분류 패턴을 설정합니다.
    pub fn box_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.box_pattern = pattern.into();
        self
    }

    /// Syslog 분류 패턴을 설정합니다.
    pub fn syslog_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.syslog_pattern = pattern.into();
        self
    }

    /// 검색 표시 모드를 설정합니다.
    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.config.search_mode = mode;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
