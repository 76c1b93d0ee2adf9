//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파이프라인은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않은 경우 기록은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logsift_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use logsift_core::metrics;
//! use metrics::counter;
//!
//! counter!(logsift_core::metrics::FILES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 로그 소스 레이블 키 (box, syslog)
pub const LABEL_SOURCE: &str = "source";

/// 결과 레이블 키 (valid, invalid)
pub const LABEL_RESULT: &str = "result";

/// 검증 단계 레이블 키 (box, syslog, logger, receptionist_params)
pub const LABEL_STAGE: &str = "stage";

// ─── Ingest 메트릭 ─────────────────────────────────────────────────

/// 파싱된 레코드 수 (counter, label: source, result)
pub const RECORDS_PARSED_TOTAL: &str = "logsift_records_parsed_total";

/// 스키마 검증 실패 수 (counter, label: stage)
pub const VALIDATION_FAILURES_TOTAL: &str = "logsift_validation_failures_total";

/// 성공적으로 읽은 파일 수 (counter)
pub const FILES_READ_TOTAL: &str = "logsift_files_read_total";

/// 읽기 실패한 파일 수 (counter)
pub const FILES_FAILED_TOTAL: &str = "logsift_files_failed_total";

/// 분류되지 않아 건너뛴 파일 수 (counter)
pub const FILES_SKIPPED_TOTAL: &str = "logsift_files_skipped_total";

/// 배치 로딩 시간 (histogram, 초)
pub const BATCH_LOAD_DURATION_SECONDS: &str = "logsift_batch_load_duration_seconds";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        RECORDS_PARSED_TOTAL,
        "Total log records produced by the parsers"
    );
    describe_counter!(
        VALIDATION_FAILURES_TOTAL,
        "Total schema validation failures reported to the diagnostic sink"
    );
    describe_counter!(FILES_READ_TOTAL, "Total log files read successfully");
    describe_counter!(FILES_FAILED_TOTAL, "Total log files that failed to read");
    describe_counter!(
        FILES_SKIPPED_TOTAL,
        "Total files skipped because their name matched no known source"
    );
    describe_histogram!(
        BATCH_LOAD_DURATION_SECONDS,
        "Time to read, parse and merge one file batch"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        RECORDS_PARSED_TOTAL,
        VALIDATION_FAILURES_TOTAL,
        FILES_READ_TOTAL,
        FILES_FAILED_TOTAL,
        FILES_SKIPPED_TOTAL,
        BATCH_LOAD_DURATION_SECONDS,
    ];

    #[test]
    fn all_metrics_start_with_logsift_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("logsift_"),
                "Metric '{}' does not start with 'logsift_' prefix",
                name
            );
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_SOURCE, LABEL_RESULT, LABEL_STAGE] {
            assert_eq!(label.to_lowercase(), label);
        }
    }
}
