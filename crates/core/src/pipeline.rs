//! 파이프라인 trait: 모듈 확장 포인트 정의

use crate::event::ValidationDiagnostic;
use crate::types::{LogRecord, LogSource, RecordId};

/// 라인 파서 trait
///
/// 새로운 로그 형식을 지원하려면 이 trait을 구현합니다.
/// 구현체는 입력 라인 하나에 대해 항상 레코드 하나를 반환해야 하며,
/// 실패는 무효 레코드로 표현합니다.
pub trait LineParser: Send + Sync {
    /// 이 파서가 담당하는 소스
    fn source(&self) -> LogSource;

    /// 한 라인을 파싱하여 레코드를 만듭니다.
    fn parse_line(&self, id: RecordId, line: &str, sink: &dyn DiagnosticSink) -> LogRecord;
}

/// 검증 실패 진단을 받는 싱크
///
/// 진단 전달은 권고 사항이며, 구현체는 패닉하거나 블록해서는 안 됩니다.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: ValidationDiagnostic);
}

/// 진단을 버리는 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: ValidationDiagnostic) {}
}
