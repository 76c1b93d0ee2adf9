//! 세션 상태 -- 현재 레코드 집합, 필터 상태, 계산된 뷰, 매치 커서
//!
//! [`PipelineState`]는 한 세션의 유일한 쓰기 주체입니다.
//! 새 배치를 게시하면 이전 레코드 집합 전체를 교체하며, 게시된 레코드는 변경하지 않습니다.
//! 필터/검색어/데이터가 바뀔 때마다 뷰를 다시 계산하고 커서를 첫 매치로 되돌립니다.

use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use logsift_core::types::{LogRecord, LogSource, SeverityLabel};

use crate::pipeline::{Batch, BatchReport};
use crate::search::{DateRange, FilterOutcome, FilterState, MatchCursor, SearchMode, evaluate};

/// 표시 계층에 넘기는 뷰 스냅샷
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot<'a> {
    /// 보이는 레코드 (병합 순서)
    pub visible: Vec<&'a LogRecord>,
    /// `visible` 안에서 매치 위치 (하이라이트 모드에서만)
    pub match_indexes: &'a [usize],
    /// 현재 매치 커서
    pub match_index: usize,
    pub match_count: usize,
}

/// 세션 상태
#[derive(Debug, Clone)]
pub struct PipelineState {
    batch_id: Option<Uuid>,
    records: Vec<LogRecord>,
    report: BatchReport,
    filter: FilterState,
    outcome: FilterOutcome,
    cursor: MatchCursor,
}

impl PipelineState {
    /// 빈 상태를 생성합니다.
    pub fn new(mode: SearchMode) -> Self {
        Self {
            batch_id: None,
            records: Vec::new(),
            report: BatchReport::default(),
            filter: FilterState::with_mode(mode),
            outcome: FilterOutcome::default(),
            cursor: MatchCursor::default(),
        }
    }

    /// 배치를 게시하여 현재 레코드 집합을 교체합니다.
    ///
    /// 읽은 파일이 하나도 없는 배치는 무시하고 `false`를 반환합니다.
    pub fn publish(&mut self, batch: Batch) -> bool {
        if batch.is_empty_load() {
            tracing::info!(
                files_failed = batch.report.files_failed,
                files_skipped = batch.report.files_skipped,
                "no files read, keeping current record set"
            );
            return false;
        }

        self.batch_id = Some(batch.id);
        self.records = batch.records;
        self.report = batch.report;
        self.recompute();
        true
    }

    pub fn batch_id(&self) -> Option<Uuid> {
        self.batch_id
    }

    /// 현재 레코드 집합 전체 (병합 순서)
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// 마지막으로 게시된 배치 요약
    pub fn report(&self) -> &BatchReport {
        &self.report
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// 필터 상태 전체를 교체합니다.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.recompute();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.filter.mode = mode;
        self.recompute();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.filter.date_range = range;
        self.recompute();
    }

    pub fn set_sources(&mut self, sources: impl IntoIterator<Item = LogSource>) {
        self.filter.sources = sources.into_iter().collect::<BTreeSet<_>>();
        self.recompute();
    }

    pub fn set_severities(&mut self, severities: impl IntoIterator<Item = SeverityLabel>) {
        self.filter.severities = severities.into_iter().collect::<BTreeSet<_>>();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.outcome = evaluate(&self.records, &self.filter);
        self.cursor.reset(self.outcome.match_indexes.len());
        tracing::debug!(
            visible = self.outcome.visible.len(),
            matches = self.outcome.match_count,
            "view recomputed"
        );
    }

    /// 다음 매치로 이동하고 해당 레코드의 `visible` 위치를 반환합니다.
    pub fn next_match(&mut self) -> Option<usize> {
        self.cursor.next();
        self.current_match()
    }

    /// 이전 매치로 이동하고 해당 레코드의 `visible` 위치를 반환합니다.
    pub fn previous_match(&mut self) -> Option<usize> {
        self.cursor.previous();
        self.current_match()
    }

    /// 현재 매치 레코드의 `visible` 위치
    pub fn current_match(&self) -> Option<usize> {
        self.cursor
            .current()
            .and_then(|i| self.outcome.match_indexes.get(i).copied())
    }

    pub fn cursor(&self) -> MatchCursor {
        self.cursor
    }

    /// 보이는 레코드 수
    pub fn visible_len(&self) -> usize {
        self.outcome.visible.len()
    }

    /// 현재 뷰 스냅샷
    pub fn view(&self) -> ViewSnapshot<'_> {
        ViewSnapshot {
            visible: self
                .outcome
                .visible
                .iter()
                .filter_map(|&i| self.records.get(i))
                .collect(),
            match_indexes: &self.outcome.match_indexes,
            match_index: self.cursor.position(),
            match_count: self.outcome.match_count,
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(SearchMode::default())
    }
}
