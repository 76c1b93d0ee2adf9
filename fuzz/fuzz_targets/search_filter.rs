#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use logsift_core::types::{LogSource, SeverityLabel};
use logsift_pipeline::{FilterState, LogPipelineBuilder, SearchMode, SourceFile};
use logsift_pipeline::search::evaluate;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    syslog: String,
    box_log: String,
    query: String,
    only_matching: bool,
    severities: Vec<u8>,
    sources: Vec<u8>,
}

const SEVERITIES: [SeverityLabel; 4] = [
    SeverityLabel::Error,
    SeverityLabel::Warning,
    SeverityLabel::Info,
    SeverityLabel::Debug,
];

const SOURCES: [LogSource; 3] = [LogSource::Box, LogSource::Syslog, LogSource::Dmesg];

fuzz_target!(|input: FuzzInput| {
    let Ok(pipeline) = LogPipelineBuilder::new().build() else {
        return;
    };
    let batch = pipeline.ingest(vec![
        SourceFile::new("syslog.txt", input.syslog),
        SourceFile::new("box.log", input.box_log),
    ]);

    let mode = if input.only_matching {
        SearchMode::OnlyMatching
    } else {
        SearchMode::Highlight
    };
    let mut state = FilterState::with_mode(mode);
    state.query = input.query;
    state.severities = input
        .severities
        .iter()
        .map(|i| SEVERITIES[usize::from(*i) % SEVERITIES.len()])
        .collect();
    state.sources = input
        .sources
        .iter()
        .map(|i| SOURCES[usize::from(*i) % SOURCES.len()])
        .collect();

    let outcome = evaluate(&batch.records, &state);

    // 보이는 인덱스는 증가 순서이고 매치 위치는 보이는 목록 안에 있어야 한다
    assert!(outcome.visible.windows(2).all(|w| w[0] < w[1]));
    assert!(outcome.visible.iter().all(|&i| i < batch.records.len()));
    assert!(outcome.match_indexes.iter().all(|&i| i < outcome.visible.len()));
});
