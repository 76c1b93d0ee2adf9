//! 설정 관리: logsift.toml 파싱 및 런타임 설정
//!
//! [`LogsiftConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGSIFT_INGEST_MAX_LINE_BYTES=4096` 형식)
//! 3. 설정 파일 (`logsift.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logsift_core::error::LogsiftError> {
//! use logsift_core::config::LogsiftConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogsiftConfig::load("logsift.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogsiftConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogsiftError};

/// logsift 통합 설정
///
/// `logsift.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsiftConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 파일 수집/파싱 설정
    #[serde(default)]
    pub ingest: IngestConfig,
    /// 검색 설정
    #[serde(default)]
    pub search: SearchConfig,
}

impl LogsiftConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogsiftError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에 환경변수 오버라이드만 적용합니다.
    ///
    /// 파일이 존재하지만 파싱/검증에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LogsiftError> {
        match Self::load(path.as_ref()).await {
            Err(LogsiftError::Config(ConfigError::FileNotFound { path })) => {
                tracing::debug!(path, "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogsiftError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogsiftError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogsiftError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogsiftError> {
        toml::from_str(toml_str).map_err(|e| {
            LogsiftError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGSIFT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGSIFT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGSIFT_GENERAL_LOG_FORMAT");

        // Ingest
        override_usize(
            &mut self.ingest.max_line_bytes,
            "LOGSIFT_INGEST_MAX_LINE_BYTES",
        );
        override_usize(
            &mut self.ingest.max_concurrent_reads,
            "LOGSIFT_INGEST_MAX_CONCURRENT_READS",
        );
        override_string(&mut self.ingest.box_pattern, "LOGSIFT_INGEST_BOX_PATTERN");
        override_string(
            &mut self.ingest.syslog_pattern,
            "LOGSIFT_INGEST_SYSLOG_PATTERN",
        );

        // Search
        override_string(&mut self.search.mode, "LOGSIFT_SEARCH_MODE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogsiftError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.ingest.max_line_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.max_line_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.ingest.max_concurrent_reads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.max_concurrent_reads".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        for (field, pattern) in [
            ("ingest.box_pattern", &self.ingest.box_pattern),
            ("ingest.syslog_pattern", &self.ingest.syslog_pattern),
        ] {
            if pattern.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "pattern must not be empty".to_owned(),
                }
                .into());
            }
        }

        let valid_modes = ["highlight", "only_matching"];
        if !valid_modes.contains(&self.search.mode.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "search.mode".to_owned(),
                reason: format!("must be one of: {}", valid_modes.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 파일 수집/파싱 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 라인 최대 길이 (바이트). 초과한 라인은 무효 레코드가 됩니다.
    pub max_line_bytes: usize,
    /// 동시에 읽을 최대 파일 수
    pub max_concurrent_reads: usize,
    /// Box 로그로 분류할 파일명 부분 문자열 (대소문자 무시)
    pub box_pattern: String,
    /// Syslog로 분류할 파일명 부분 문자열 (대소문자 무시)
    pub syslog_pattern: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 1024 * 1024, // 1MB
            max_concurrent_reads: 16,
            box_pattern: "box".to_owned(),
            syslog_pattern: "syslog".to_owned(),
        }
    }
}

/// 검색 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 기본 표시 모드 (highlight, only_matching)
    pub mode: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: "highlight".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
