//! Logger 태그 재해석
//!
//! 태그가 `Logger`인 syslog 라인의 메시지는 다른 서비스가 남긴 JSON 로그입니다.
//! 이 JSON을 검증하여 후보 레코드의 `meta.name`과 `message`를 내부 값으로 덮어씁니다.
//!
//! 1. 메시지를 JSON으로 파싱하고 Logger 스키마로 검증
//!    (`{meta:{name, box_guid?, org_id?, mac_address?}, level, message, params?}`)
//! 2. 내부 이름이 `ReceptionistInternal`이면 `params`에서 선택 필드 `type`을 추출하여
//!    메시지 뒤에 `" " + type`을 붙임
//!
//! 두 단계의 실패는 진단 싱크에 보고될 뿐 레코드 에러가 되지 않습니다.
//! 2단계가 실패해도 1단계에서 덮어쓴 값은 그대로 남습니다.

use serde_json::Value;

use logsift_core::event::ValidationIssue;
use logsift_core::pipeline::DiagnosticSink;
use logsift_core::types::LogSource;

use super::schema::SchemaCheck;
use super::{STAGE_LOGGER, STAGE_RECEPTIONIST_PARAMS, report_failure};

/// 재해석 대상 태그
pub const LOGGER_TAG: &str = "Logger";

/// `params.type`을 메시지에 덧붙이는 내부 서비스 이름
pub const RECEPTIONIST_INTERNAL: &str = "ReceptionistInternal";

const LOGGER_LEVELS: &[&str] = &["debug", "info", "warn", "error"];

/// 재해석 실패 -- 항상 복구되며 진단 싱크로만 전달됩니다.
#[derive(Debug, thiserror::Error)]
pub(crate) enum EmbeddedReinterpretationError {
    /// 메시지가 JSON이 아님
    #[error("embedded message is not JSON: {0}")]
    InvalidJson(String),

    /// Logger 스키마 위반
    #[error("embedded logger entry failed validation")]
    Logger(Vec<ValidationIssue>),

    /// ReceptionistInternal params 스키마 위반
    #[error("receptionist params failed validation")]
    ReceptionistParams(Vec<ValidationIssue>),
}

impl EmbeddedReinterpretationError {
    fn stage(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) | Self::Logger(_) => STAGE_LOGGER,
            Self::ReceptionistParams(_) => STAGE_RECEPTIONIST_PARAMS,
        }
    }

    fn issues(&self) -> Vec<ValidationIssue> {
        match self {
            Self::InvalidJson(reason) => {
                vec![ValidationIssue::new("", format!("Invalid JSON: {reason}"))]
            }
            Self::Logger(issues) | Self::ReceptionistParams(issues) => issues.clone(),
        }
    }
}

/// Logger 메시지를 재해석하여 `name`과 `message`를 갱신합니다.
///
/// 실패하면 경고 로그와 진단을 남기고 그때까지의 값을 유지합니다.
pub(crate) fn reinterpret(
    name: &mut String,
    message: &mut String,
    raw_line: &str,
    sink: &dyn DiagnosticSink,
) {
    if let Err(e) = try_reinterpret(name, message) {
        tracing::warn!(error = %e, stage = e.stage(), "logger message re-interpretation failed");
        report_failure(sink, LogSource::Syslog, e.stage(), raw_line, &e.issues());
    }
}

fn try_reinterpret(
    name: &mut String,
    message: &mut String,
) -> Result<(), EmbeddedReinterpretationError> {
    let value: Value = serde_json::from_str(message)
        .map_err(|e| EmbeddedReinterpretationError::InvalidJson(e.to_string()))?;

    let (inner_name, inner_message, params) =
        validate_logger(&value).map_err(EmbeddedReinterpretationError::Logger)?;

    *name = inner_name;
    *message = inner_message;

    if name.as_str() == RECEPTIONIST_INTERNAL {
        let kind = receptionist_type(params)
            .map_err(EmbeddedReinterpretationError::ReceptionistParams)?;
        if let Some(kind) = kind {
            message.push(' ');
            message.push_str(&kind);
        }
    }

    Ok(())
}

/// Logger 스키마 검증. 성공하면 `(meta.name, message, params)`를 반환합니다.
fn validate_logger(
    value: &Value,
) -> Result<(String, String, Option<&Value>), Vec<ValidationIssue>> {
    let mut check = SchemaCheck::new();

    let Some(obj) = check.object(value, "") else {
        return Err(check.finish().err().unwrap_or_default());
    };

    let name = check.required_object(obj, "", "meta").and_then(|meta| {
        for key in ["box_guid", "org_id", "mac_address"] {
            let _ = check.optional_str(meta, "meta", key);
        }
        check.required_str(meta, "meta", "name")
    });
    let _level = check.required_enum(obj, "", "level", LOGGER_LEVELS, |s| {
        LOGGER_LEVELS.contains(&s).then_some(())
    });
    let message = check.required_str(obj, "", "message");

    match (name, message, check.finish()) {
        (Some(name), Some(message), Ok(())) => {
            Ok((name.to_owned(), message.to_owned(), obj.get("params")))
        }
        (_, _, Err(issues)) => Err(issues),
        _ => Err(vec![ValidationIssue::new("", "Invalid input")]),
    }
}

/// ReceptionistInternal `params` 검증. 성공하면 선택 필드 `type`을 반환합니다.
fn receptionist_type(params: Option<&Value>) -> Result<Option<String>, Vec<ValidationIssue>> {
    let mut check = SchemaCheck::new();

    let Some(params) = params else {
        check.issue("", "Required");
        return Err(check.finish().err().unwrap_or_default());
    };

    let kind = check
        .object(params, "")
        .and_then(|obj| check.optional_str(obj, "", "type").ok().flatten())
        .map(str::to_owned);

    check.finish().map(|()| kind)
}
