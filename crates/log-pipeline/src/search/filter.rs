//! 필터 & 매치 엔진
//!
//! 병합된 레코드 목록에 소스/날짜/심각도 필터와 검색을 적용하여
//! 보이는 레코드 목록과 매치 위치 목록을 계산합니다.
//!
//! # 평가 순서
//! 1. 소스 필터 (선택 집합이 비어 있으면 통과)
//! 2. 날짜 필터 (어느 한쪽 경계라도 있으면 시각 없는 레코드는 제외)
//! 3. 심각도 필터 (활성화되면 무효 레코드는 제외)
//! 4. 검색 (표시 모드에 따라 분기)
//!
//! 결과는 원본 레코드 슬라이스에 대한 인덱스로 표현되며, 레코드 자체는 변경하지 않습니다.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logsift_core::types::{LevelCode, LogRecord, LogSource, SeverityLabel};

use super::SearchMode;
use super::tokenizer::tokenize;

/// 포함 날짜 범위. 비어 있는 경계는 그쪽으로 무제한입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// 어느 한쪽 경계라도 설정되어 있는지
    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// 시각이 범위 안에 있는지 확인합니다. 시각이 없으면 범위 밖입니다.
    pub fn contains(&self, instant: Option<DateTime<Utc>>) -> bool {
        let Some(instant) = instant else {
            return false;
        };
        self.start.is_none_or(|start| instant >= start)
            && self.end.is_none_or(|end| instant <= end)
    }
}

/// 파싱된 검색어
///
/// 대소문자를 무시하고 원본 라인에 항목 중 **하나라도** 포함되면 매치입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
    lowered: Vec<String>,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Self {
        let terms = tokenize(query);
        let lowered = terms.iter().map(|t| t.to_lowercase()).collect();
        Self { terms, lowered }
    }

    /// 토큰화된 검색 항목
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// 검색 항목이 없으면 검색이 비활성입니다.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, haystack: &str) -> bool {
        if self.lowered.is_empty() {
            return false;
        }
        let haystack = haystack.to_lowercase();
        self.lowered.iter().any(|term| haystack.contains(term.as_str()))
    }
}

/// 필터/검색 상태
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub date_range: DateRange,
    /// 선택된 소스 (비어 있으면 전체)
    pub sources: BTreeSet<LogSource>,
    /// 선택된 심각도 라벨 (비어 있으면 전체)
    pub severities: BTreeSet<SeverityLabel>,
    /// 자유 입력 검색어
    pub query: String,
    pub mode: SearchMode,
}

impl FilterState {
    /// 지정한 표시 모드의 빈 필터 상태
    pub fn with_mode(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// 필터 평가 결과
///
/// `visible`은 레코드 슬라이스 인덱스, `match_indexes`는 `visible` 안에서의 위치입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub visible: Vec<usize>,
    /// 하이라이트 모드에서만 채워집니다. 항상 오름차순입니다.
    pub match_indexes: Vec<usize>,
    pub match_count: usize,
}

/// 필터 & 매치 엔진
pub struct FilterEngine<'a> {
    state: &'a FilterState,
    query: SearchQuery,
    severity_codes: HashSet<LevelCode>,
}

impl<'a> FilterEngine<'a> {
    pub fn new(state: &'a FilterState) -> Self {
        let severity_codes = state
            .severities
            .iter()
            .flat_map(|label| label.codes().iter().copied())
            .collect();

        Self {
            state,
            query: SearchQuery::parse(&state.query),
            severity_codes,
        }
    }

    /// 검색을 제외한 필터(소스/날짜/심각도)를 통과하는지 확인합니다.
    pub fn passes_filters(&self, record: &LogRecord) -> bool {
        if !self.state.sources.is_empty() && !self.state.sources.contains(&record.source()) {
            return false;
        }

        if self.state.date_range.is_active() && !self.state.date_range.contains(record.instant())
        {
            return false;
        }

        if !self.severity_codes.is_empty() {
            match record.level() {
                Some(code) if self.severity_codes.contains(&code) => {}
                _ => return false,
            }
        }

        true
    }

    /// 레코드 목록을 평가합니다.
    pub fn evaluate(&self, records: &[LogRecord]) -> FilterOutcome {
        let filtered = records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.passes_filters(record));

        if self.query.is_empty() {
            let visible: Vec<usize> = filtered.map(|(i, _)| i).collect();
            return FilterOutcome {
                visible,
                match_indexes: Vec::new(),
                match_count: 0,
            };
        }

        match self.state.mode {
            SearchMode::OnlyMatching => {
                let visible: Vec<usize> = filtered
                    .filter(|(_, record)| self.query.matches(record.raw_line()))
                    .map(|(i, _)| i)
                    .collect();
                let match_count = visible.len();
                FilterOutcome {
                    visible,
                    match_indexes: Vec::new(),
                    match_count,
                }
            }
            SearchMode::Highlight => {
                let mut visible = Vec::new();
                let mut match_indexes = Vec::new();
                for (i, record) in filtered {
                    if self.query.matches(record.raw_line()) {
                        match_indexes.push(visible.len());
                    }
                    visible.push(i);
                }
                let match_count = match_indexes.len();
                FilterOutcome {
                    visible,
                    match_indexes,
                    match_count,
                }
            }
        }
    }
}

/// 필터 상태를 레코드 목록에 적용합니다.
pub fn evaluate(records: &[LogRecord], state: &FilterState) -> FilterOutcome {
    FilterEngine::new(state).evaluate(records)
}
