//! 소스 분류기 -- 파일 이름만으로 담당 파서를 결정합니다.
//!
//! 대소문자를 무시한 부분 문자열 매칭이며 Box 패턴을 먼저 검사합니다.
//! 따라서 `syslog_box.txt`는 Box로 분류됩니다. 내용은 검사하지 않습니다.

use std::fmt;

use logsift_core::types::LogSource;

use crate::config::PipelineConfig;

/// 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// 해당 소스의 파서가 담당
    Source(LogSource),
    /// 인식 불가 -- 읽지 않고 건너뜀
    Unrecognized,
}

impl Classification {
    pub fn source(&self) -> Option<LogSource> {
        match self {
            Self::Source(source) => Some(*source),
            Self::Unrecognized => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(source) => write!(f, "{source}"),
            Self::Unrecognized => write!(f, "Unrecognized"),
        }
    }
}

/// 파일 이름 기반 소스 분류기
#[derive(Debug, Clone)]
pub struct SourceClassifier {
    box_pattern: String,
    syslog_pattern: String,
}

impl SourceClassifier {
    /// 패턴으로 분류기를 생성합니다. 패턴은 소문자로 정규화됩니다.
    pub fn new(box_pattern: &str, syslog_pattern: &str) -> Self {
        Self {
            box_pattern: box_pattern.to_lowercase(),
            syslog_pattern: syslog_pattern.to_lowercase(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.box_pattern, &config.syslog_pattern)
    }

    /// 파일 이름을 분류합니다.
    pub fn classify(&self, file_name: &str) -> Classification {
        let name = file_name.to_lowercase();
        if name.contains(&self.box_pattern) {
            Classification::Source(LogSource::Box)
        } else if name.contains(&self.syslog_pattern) {
            Classification::Source(LogSource::Syslog)
        } else {
            Classification::Unrecognized
        }
    }
}

impl Default for SourceClassifier {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_substring() {
        let classifier = SourceClassifier::default();
        assert_eq!(
            classifier.classify("box-2025-03-13.log"),
            Classification::Source(LogSource::Box)
        );
        assert_eq!(
            classifier.classify("device_syslog.txt"),
            Classification::Source(LogSource::Syslog)
        );
        assert_eq!(classifier.classify("dmesg.txt"), Classification::Unrecognized);
    }

    #[test]
    fn classification_is_case_insensitive() {
        let classifier = SourceClassifier::default();
        assert_eq!(classifier.classify("BOX.LOG").source(), Some(LogSource::Box));
        assert_eq!(classifier.classify("SysLog.txt").source(), Some(LogSource::Syslog));
    }

    #[test]
    fn box_pattern_wins_when_both_match() {
        let classifier = SourceClassifier::default();
        assert_eq!(classifier.classify("syslog_box.txt").source(), Some(LogSource::Box));
    }

    #[test]
    fn custom_patterns() {
        let classifier = SourceClassifier::new("Crate", "logcat");
        assert_eq!(classifier.classify("my_crate.log").source(), Some(LogSource::Box));
        assert_eq!(classifier.classify("logcat.txt").source(), Some(LogSource::Syslog));
        assert_eq!(classifier.classify("box.log"), Classification::Unrecognized);
    }
}
