//! 병합 정렬 -- 파일별 레코드 목록을 하나의 시간순 목록으로 합칩니다.
//!
//! 제출 순서대로 이어 붙인 뒤 시각 기준으로 안정 정렬합니다.
//! 시각이 없는 레코드(무효 레코드, 해석 불가 타임스탬프)는 가장 이른 시각으로 취급되어
//! 앞쪽에 모입니다. 같은 시각은 입력 순서를 유지합니다.

use logsift_core::types::LogRecord;

/// 파일별 레코드 목록을 병합합니다.
pub fn merge_sorted<I>(files: I) -> Vec<LogRecord>
where
    I: IntoIterator<Item = Vec<LogRecord>>,
{
    let mut merged: Vec<LogRecord> = files.into_iter().flatten().collect();
    // Option 순서상 None < Some 이므로 시각 없는 레코드가 먼저 옵니다.
    merged.sort_by_key(LogRecord::instant);
    merged
}
