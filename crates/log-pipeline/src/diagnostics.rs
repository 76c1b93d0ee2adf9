//! 진단 싱크 구현
//!
//! - [`TracingDiagnosticSink`]: 검증 실패를 구조화된 `warn!` 이벤트로 기록 (기본값)
//! - [`CollectingSink`]: 진단을 메모리에 모음 (테스트, `--show-errors` 출력)

use std::sync::Mutex;

use logsift_core::event::ValidationDiagnostic;
use logsift_core::pipeline::DiagnosticSink;

/// 검증 실패를 tracing 경고 이벤트로 기록하는 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn report(&self, diagnostic: ValidationDiagnostic) {
        tracing::warn!(
            source = diagnostic.source.as_str(),
            stage = %diagnostic.stage,
            raw_line = %diagnostic.raw_line,
            issues = %diagnostic.issues.to_pretty_json(),
            "validation failed"
        );
    }
}

/// 진단을 메모리에 모으는 싱크
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<ValidationDiagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 모인 진단을 꺼내고 비웁니다.
    pub fn take(&self) -> Vec<ValidationDiagnostic> {
        match self.diagnostics.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        match self.diagnostics.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: ValidationDiagnostic) {
        match self.diagnostics.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_core::event::ValidationIssue;
    use logsift_core::types::LogSource;

    fn diagnostic() -> ValidationDiagnostic {
        ValidationDiagnostic::new(
            LogSource::Box,
            "box",
            "{}",
            &[ValidationIssue::new("message", "Required")],
        )
    }

    #[test]
    fn collecting_sink_accumulates_and_drains() {
        let sink = CollectingSink::new();
        sink.report(diagnostic());
        sink.report(diagnostic());
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn tracing_sink_does_not_panic() {
        TracingDiagnosticSink.report(diagnostic());
    }
}
