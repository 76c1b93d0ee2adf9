#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`classifier`]: 파일 이름 기반 소스 분류
//! - [`parser`]: Box(JSON 라인), Syslog(고정 문법 + Logger 재해석) 파서와 라우터
//! - [`merge`]: 파일별 레코드의 시간순 안정 병합
//! - [`search`]: 검색어 토크나이저, 필터 & 매치 엔진, 매치 커서
//! - [`collector`]: 디스크 배치 수집 (파일당 tokio 태스크)
//! - [`pipeline`]: 전체 흐름 오케스트레이션과 배치 요약
//! - [`state`]: 세션 상태 (레코드 집합, 필터, 뷰, 커서)
//! - [`annotate`]: 표시용 태그 도출
//! - [`diagnostics`]: 진단 싱크 구현
//! - [`config`]: 파이프라인 설정 (core 설정 기반)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! files -> SourceClassifier -> ParserRouter -> merge_sorted -> PipelineState -> FilterEngine
//!              |                   |                                              |
//!        box / syslog        Box / Syslog                          visible + match indexes
//! ```

pub mod annotate;
pub mod classifier;
pub mod collector;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod merge;
pub mod parser;
pub mod pipeline;
pub mod search;
pub mod state;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{Batch, BatchReport, LogPipeline, LogPipelineBuilder};

// 상태
pub use state::{PipelineState, ViewSnapshot};

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::{LogPipelineError, RecordError};

// 분류/파서
pub use classifier::{Classification, SourceClassifier};
pub use parser::{BoxLogParser, ParserRouter, SyslogParser};

// 검색
pub use search::{DateRange, FilterState, MatchCursor, SearchMode, tokenize};

// 수집기
pub use collector::{FileCollector, SourceFile};

// 진단
pub use diagnostics::{CollectingSink, TracingDiagnosticSink};

// 병합
pub use merge::merge_sorted;
