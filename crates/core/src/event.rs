//! 진단 이벤트: 검증 실패를 개발자용 로그 싱크로 전달하는 단위
//!
//! 파서는 스키마 검증이 실패할 때마다 [`ValidationDiagnostic`]을 만들어
//! [`DiagnosticSink`](crate::pipeline::DiagnosticSink)로 보냅니다.
//! 싱크 전달은 권고 사항이며 파이프라인 진행을 막지 않습니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::LogSource;

/// 단일 검증 이슈: 필드 경로와 문제 설명
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 점 표기 필드 경로 (예: `meta.pid`). 빈 문자열이면 객체 전체에 대한 이슈입니다.
    pub path: String,
    /// 문제 설명
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// 평탄화된 이슈 목록
///
/// 객체 전체에 대한 이슈는 `form_errors`, 필드 이슈는 경로별로 `field_errors`에 모읍니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedIssues {
    #[serde(rename = "formErrors")]
    pub form_errors: Vec<String>,
    #[serde(rename = "fieldErrors")]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FlattenedIssues {
    /// 이슈 목록을 평탄화합니다.
    pub fn from_issues(issues: &[ValidationIssue]) -> Self {
        let mut flattened = Self::default();
        for issue in issues {
            if issue.path.is_empty() {
                flattened.form_errors.push(issue.message.clone());
            } else {
                flattened
                    .field_errors
                    .entry(issue.path.clone())
                    .or_default()
                    .push(issue.message.clone());
            }
        }
        flattened
    }

    /// 레코드 에러 문자열에 삽입할 JSON 표현 (들여쓰기 2칸)
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// 검증 실패 진단 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDiagnostic {
    /// 레코드를 만든 소스 형식
    pub source: LogSource,
    /// 검증 단계 이름 (예: `box`, `syslog`, `logger`, `receptionist_params`)
    pub stage: String,
    /// 원본 라인
    pub raw_line: String,
    /// 평탄화된 이슈
    pub issues: FlattenedIssues,
}

impl ValidationDiagnostic {
    pub fn new(
        source: LogSource,
        stage: impl Into<String>,
        raw_line: impl Into<String>,
        issues: &[ValidationIssue],
    ) -> Self {
        Self {
            source,
            stage: stage.into(),
            raw_line: raw_line.into(),
            issues: FlattenedIssues::from_issues(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_groups_by_path() {
        let issues = vec![
            ValidationIssue::new("meta.pid", "Required"),
            ValidationIssue::new("meta.pid", "Expected integer"),
            ValidationIssue::new("level", "Invalid enum value"),
            ValidationIssue::new("", "Expected object"),
        ];
        let flat = FlattenedIssues::from_issues(&issues);
        assert_eq!(flat.form_errors, vec!["Expected object".to_owned()]);
        assert_eq!(flat.field_errors["meta.pid"].len(), 2);
        assert_eq!(flat.field_errors["level"], vec!["Invalid enum value".to_owned()]);
    }

    #[test]
    fn flattened_json_uses_camel_case_keys() {
        let flat = FlattenedIssues::from_issues(&[ValidationIssue::new("message", "Required")]);
        let json = flat.to_pretty_json();
        assert!(json.contains("\"fieldErrors\""));
        assert!(json.contains("\"formErrors\""));
        assert!(json.contains("\"message\""));
    }

    #[test]
    fn issue_display() {
        assert_eq!(
            ValidationIssue::new("meta.name", "Required").to_string(),
            "meta.name: Required"
        );
        assert_eq!(ValidationIssue::new("", "Expected object").to_string(), "Expected object");
    }
}
