//! 파이프라인 오케스트레이션 -- 분류/파싱/병합 정렬의 전체 흐름을 관리합니다.
//!
//! # 내부 아키텍처
//! ```text
//! paths -> expand -> FileCollector (파일당 tokio 태스크, 전체 대기)
//!                         |
//!   (name, content) -> SourceClassifier -> ParserRouter -> merge_sorted -> Batch
//! ```
//!
//! 배치는 모든 파일이 성공하거나 실패한 뒤에 한 번만 만들어집니다.
//! 라인 단위 실패는 무효 레코드가, 파일 단위 실패는 0개의 레코드가 됩니다.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::Serialize;
use uuid::Uuid;

use logsift_core::metrics as m;
use logsift_core::pipeline::DiagnosticSink;
use logsift_core::types::LogRecord;

use crate::classifier::{Classification, SourceClassifier};
use crate::collector::{FileCollector, FileOutcome, SourceFile, expand_paths};
use crate::config::PipelineConfig;
use crate::diagnostics::TracingDiagnosticSink;
use crate::error::LogPipelineError;
use crate::merge::merge_sorted;
use crate::parser::ParserRouter;

/// 배치 처리 결과 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// 읽고 파싱한 파일 수
    pub files_read: usize,
    /// 읽기 실패한 파일 수
    pub files_failed: usize,
    /// 인식되지 않아 건너뛴 파일 수
    pub files_skipped: usize,
    /// 전체 레코드 수
    pub records: usize,
    /// 무효 레코드 수
    pub invalid_records: usize,
}

/// 한 번의 로드로 만들어진 레코드 집합
#[derive(Debug, Clone)]
pub struct Batch {
    /// 배치 ID (레코드 ID에 포함)
    pub id: Uuid,
    /// 시간순으로 병합된 레코드
    pub records: Vec<LogRecord>,
    pub report: BatchReport,
}

impl Batch {
    /// 실제로 읽은 파일이 하나도 없으면 게시할 필요가 없습니다.
    pub fn is_empty_load(&self) -> bool {
        self.report.files_read == 0
    }
}

/// 로그 파이프라인
///
/// # 사용 예시
/// ```ignore
/// use logsift_pipeline::LogPipelineBuilder;
///
/// let pipeline = LogPipelineBuilder::new().config(config).build()?;
/// let batch = pipeline.load_paths(&paths).await;
/// state.publish(batch);
/// ```
pub struct LogPipeline {
    config: PipelineConfig,
    classifier: SourceClassifier,
    router: ParserRouter,
    collector: FileCollector,
    sink: Arc<dyn DiagnosticSink>,
}

impl LogPipeline {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 파일 이름 분류기
    pub fn classifier(&self) -> &SourceClassifier {
        &self.classifier
    }

    /// 메모리에 있는 (이름, 내용) 목록을 하나의 배치로 처리합니다.
    pub fn ingest(&self, files: Vec<SourceFile>) -> Batch {
        let started = Instant::now();
        let outcomes = files.into_iter().map(FileOutcome::Read).collect();
        let batch = self.build_batch(outcomes);
        histogram!(m::BATCH_LOAD_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        batch
    }

    /// 디스크의 경로 목록을 하나의 배치로 읽고 처리합니다.
    ///
    /// 디렉터리는 한 단계만 펼칩니다. 파일 읽기는 동시에 진행되며,
    /// 모든 파일이 끝난 뒤에 병합합니다.
    pub async fn load_paths(&self, paths: &[PathBuf]) -> Batch {
        let started = Instant::now();
        let expanded = expand_paths(paths).await;
        tracing::debug!(requested = paths.len(), files = expanded.len(), "loading batch");

        let outcomes = self.collector.collect(expanded).await;
        let batch = self.build_batch(outcomes);
        histogram!(m::BATCH_LOAD_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        batch
    }

    fn build_batch(&self, outcomes: Vec<FileOutcome>) -> Batch {
        let id = Uuid::new_v4();
        let mut report = BatchReport::default();
        let mut per_file = Vec::with_capacity(outcomes.len());

        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                FileOutcome::Read(file) => match self.classifier.classify(&file.name) {
                    Classification::Source(source) => {
                        let records = self.router.parse_text(
                            source,
                            id,
                            index,
                            &file.content,
                            self.sink.as_ref(),
                        );
                        tracing::debug!(
                            file = %file.name,
                            source = source.as_str(),
                            records = records.len(),
                            "file parsed"
                        );
                        report.files_read += 1;
                        per_file.push(records);
                    }
                    Classification::Unrecognized => {
                        tracing::debug!(file = %file.name, "skipping unrecognized file");
                        report.files_skipped += 1;
                    }
                },
                FileOutcome::Failed { .. } => report.files_failed += 1,
                FileOutcome::Skipped { .. } => report.files_skipped += 1,
            }
        }

        let records = merge_sorted(per_file);
        report.records = records.len();
        report.invalid_records = records.iter().filter(|r| !r.is_valid()).count();

        counter!(m::FILES_READ_TOTAL).increment(report.files_read as u64);
        counter!(m::FILES_FAILED_TOTAL).increment(report.files_failed as u64);
        counter!(m::FILES_SKIPPED_TOTAL).increment(report.files_skipped as u64);

        tracing::info!(
            batch = %id.simple(),
            files_read = report.files_read,
            files_failed = report.files_failed,
            files_skipped = report.files_skipped,
            records = report.records,
            invalid = report.invalid_records,
            "batch loaded"
        );

        Batch {
            id,
            records,
            report,
        }
    }
}

/// 로그 파이프라인 빌더
pub struct LogPipelineBuilder {
    config: PipelineConfig,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl LogPipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            sink: None,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 검증 실패 진단 싱크를 지정합니다.
    ///
    /// 설정하지 않으면 [`TracingDiagnosticSink`]를 사용합니다.
    pub fn diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 파이프라인을 빌드합니다.
    pub fn build(self) -> Result<LogPipeline, LogPipelineError> {
        self.config.validate()?;

        let router = ParserRouter::from_config(&self.config)?;
        let classifier = SourceClassifier::from_config(&self.config);
        let collector = FileCollector::from_config(&self.config);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingDiagnosticSink));

        Ok(LogPipeline {
            config: self.config,
            classifier,
            router,
            collector,
            sink,
        })
    }
}

impl Default for LogPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    const BOX_LINE: &str = r#"{"level":"warn","message":"late","meta":{"mac_address":"m","name":"manager","org_id":"o","pid":1,"process":"box","time_logged":"2025-03-13T07:30:43Z"}}"#;
    const SYSLOG_LINE: &str = "2025-03-13 07:30:42.035 +0000  3572  3583  D   WificondControl: Scan result ready event";

    #[test]
    fn builder_creates_pipeline() {
        let pipeline = LogPipelineBuilder::new().build().unwrap();
        assert_eq!(pipeline.config().max_concurrent_reads, 16);
    }

    #[test]
    fn builder_with_invalid_config_fails() {
        let config = PipelineConfig {
            max_line_bytes: 0,
            ..Default::default()
        };
        assert!(LogPipelineBuilder::new().config(config).build().is_err());
    }

    #[test]
    fn ingest_merges_and_reports() {
        let sink = Arc::new(CollectingSink::new());
        let pipeline = LogPipelineBuilder::new()
            .diagnostic_sink(sink.clone())
            .build()
            .unwrap();

        let batch = pipeline.ingest(vec![
            SourceFile::new("box.log", format!("{BOX_LINE}\n{{\"level\":1}}\n")),
            SourceFile::new("notes.txt", "ignored"),
            SourceFile::new("syslog.txt", format!("\n{SYSLOG_LINE}\n")),
        ]);

        assert_eq!(batch.report.files_read, 2);
        assert_eq!(batch.report.files_skipped, 1);
        assert_eq!(batch.report.records, 3);
        assert_eq!(batch.report.invalid_records, 1);

        // 무효 레코드(시각 없음)가 먼저, 이후 시간순
        assert!(!batch.records[0].is_valid());
        assert_eq!(batch.records[1].raw_line(), SYSLOG_LINE);
        assert_eq!(batch.records[2].raw_line(), BOX_LINE);
        assert!(batch.records.iter().all(|r| r.id().batch == batch.id));
        assert_eq!(batch.records[1].id().file, 2);
        assert_eq!(batch.records[1].id().line, 1);

        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn ingest_without_recognized_files_is_empty_load() {
        let pipeline = LogPipelineBuilder::new().build().unwrap();
        let batch = pipeline.ingest(vec![SourceFile::new("dmesg.txt", "x")]);
        assert!(batch.is_empty_load());
        assert!(batch.records.is_empty());
    }

    #[test]
    fn each_batch_gets_a_new_id() {
        let pipeline = LogPipelineBuilder::new().build().unwrap();
        let a = pipeline.ingest(vec![SourceFile::new("syslog", SYSLOG_LINE)]);
        let b = pipeline.ingest(vec![SourceFile::new("syslog", SYSLOG_LINE)]);
        assert_ne!(a.id, b.id);
        assert_ne!(a.records[0].id(), b.records[0].id());
    }

    #[tokio::test]
    async fn load_paths_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("syslog.txt"), SYSLOG_LINE).unwrap();

        let pipeline = LogPipelineBuilder::new().build().unwrap();
        let batch = pipeline
            .load_paths(&[dir.path().to_path_buf(), dir.path().join("gone_box.log")])
            .await;

        assert_eq!(batch.report.files_read, 1);
        assert_eq!(batch.report.files_failed, 1);
        assert_eq!(batch.records.len(), 1);
    }
}
